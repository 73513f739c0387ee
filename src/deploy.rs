//! Upload and deploy collaborators.
//!
//! The archive is uploaded through a presigned PUT, then the hosting service is
//! told to deploy it and answers with the base URL routes are served from.

use serde::{Deserialize, Serialize};

use crate::classify::Route;
use crate::config::DeployConfig;
use crate::error::{CompilerError, ErrorKind};

#[derive(Debug, Clone, Deserialize)]
pub struct UploadTicket {
    #[serde(rename = "putURL")]
    pub put_url: String,
    #[serde(rename = "getURL")]
    pub get_url: String,
}

#[derive(Debug, Clone, Serialize)]
struct DeployRequest<'a> {
    path: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct DeployResponse {
    url: String,
}

pub struct DeployClient {
    client: reqwest::Client,
    config: DeployConfig,
}

fn fetch_error(step: &str, detail: impl std::fmt::Display) -> CompilerError {
    CompilerError::detached(ErrorKind::FetchFailure, &format!("{} failed: {}", step, detail))
}

impl DeployClient {
    pub fn new(config: DeployConfig) -> Result<Self, CompilerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| fetch_error("HTTP client setup", e))?;
        Ok(Self { client, config })
    }

    /// Upload the archive and return the URL it can be retrieved from.
    pub async fn upload(&self, archive: Vec<u8>) -> Result<String, CompilerError> {
        tracing::info!("Requesting upload slot from {}", self.config.upload_url);
        let response = self
            .client
            .post(&self.config.upload_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await
            .map_err(|e| fetch_error("Upload request", e))?;
        if !response.status().is_success() {
            return Err(fetch_error("Upload request", response.status()));
        }
        let ticket: UploadTicket = response
            .json()
            .await
            .map_err(|e| fetch_error("Upload request", e))?;

        tracing::info!("Uploading {} bytes", archive.len());
        let put = self
            .client
            .put(&ticket.put_url)
            .body(archive)
            .send()
            .await
            .map_err(|e| fetch_error("Archive upload", e))?;
        if !put.status().is_success() {
            return Err(fetch_error("Archive upload", put.status()));
        }

        Ok(ticket.get_url)
    }

    /// Ask the hosting service to deploy an uploaded archive. Returns the base URL.
    pub async fn deploy(&self, archive_url: &str) -> Result<String, CompilerError> {
        let request = DeployRequest {
            path: archive_key(archive_url),
        };
        tracing::info!("Deploying {} via {}", request.path, self.config.deploy_url);
        let response = self
            .client
            .post(&self.config.deploy_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| fetch_error("Deploy", e))?;
        if !response.status().is_success() {
            return Err(fetch_error("Deploy", response.status()));
        }
        let body: DeployResponse = response
            .json()
            .await
            .map_err(|e| fetch_error("Deploy", e))?;
        Ok(body.url)
    }
}

/// Last `/`-separated segment of the uploaded archive URL.
pub fn archive_key(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Public address of every route under a deployed base URL.
pub fn route_urls(base: &str, routes: &[Route]) -> Vec<String> {
    routes
        .iter()
        .map(|route| format!("{}/{}", base, route.path))
        .collect()
}

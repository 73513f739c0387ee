//! Package source fetching
//!
//! The bundle assembler vendors every non-relative dependency by asking a
//! `PackageSource` for its published source text.

use std::collections::HashMap;

use crate::config::DeployConfig;
use crate::error::{CompilerError, ErrorKind};

#[allow(async_fn_in_trait)]
pub trait PackageSource {
    /// Fetch the source text of a bare package specifier.
    async fn fetch(&self, package: &str) -> Result<String, CompilerError>;
}

/// Fetches packages from an unpkg-style mirror over HTTP.
pub struct UnpkgRegistry {
    client: reqwest::Client,
    config: DeployConfig,
}

impl UnpkgRegistry {
    pub fn new(config: DeployConfig) -> Result<Self, CompilerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                CompilerError::detached(
                    ErrorKind::FetchFailure,
                    &format!("Failed to create HTTP client: {}", e),
                )
            })?;
        Ok(Self { client, config })
    }
}

impl PackageSource for UnpkgRegistry {
    async fn fetch(&self, package: &str) -> Result<String, CompilerError> {
        let url = self.config.package_url(package);
        tracing::debug!("Fetching package {} from {}", package, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            CompilerError::detached(
                ErrorKind::FetchFailure,
                &format!("Failed to fetch package `{}`: {}", package, e),
            )
        })?;

        if !response.status().is_success() {
            return Err(CompilerError::detached(
                ErrorKind::FetchFailure,
                &format!(
                    "Failed to fetch package `{}`: HTTP {}",
                    package,
                    response.status()
                ),
            ));
        }

        let text = response.text().await.map_err(|e| {
            CompilerError::detached(
                ErrorKind::FetchFailure,
                &format!("Failed to read package `{}`: {}", package, e),
            )
        })?;
        tracing::debug!("Fetched package {} ({} bytes)", package, text.len());
        Ok(text)
    }
}

/// In-memory package source, for offline builds and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPackages {
    packages: HashMap<String, String>,
}

impl StaticPackages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, package: &str, source: &str) -> Self {
        self.packages.insert(package.to_string(), source.to_string());
        self
    }
}

impl PackageSource for StaticPackages {
    async fn fetch(&self, package: &str) -> Result<String, CompilerError> {
        self.packages.get(package).cloned().ok_or_else(|| {
            CompilerError::detached(
                ErrorKind::FetchFailure,
                &format!("Failed to fetch package `{}`: not found", package),
            )
        })
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "https://abstra-uploads.herokuapp.com/function/upload";
pub const DEFAULT_DEPLOY_URL: &str = "https://abstra-functions.herokuapp.com/cli";
pub const DEFAULT_REGISTRY_URL: &str = "https://unpkg.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Endpoints of the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployConfig {
    pub upload_url: String,
    pub deploy_url: String,
    /// unpkg-style mirror; packages are fetched from `<registry_url>/<package>`.
    pub registry_url: String,
    pub timeout_ms: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            deploy_url: DEFAULT_DEPLOY_URL.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl DeployConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// URL a package's published source is fetched from.
    pub fn package_url(&self, package: &str) -> String {
        format!("{}/{}", self.registry_url.trim_end_matches('/'), package)
    }
}

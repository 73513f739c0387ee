use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use function_bundler::deploy::{route_urls, DeployClient};
use function_bundler::{build_bundle, DeployConfig, UnpkgRegistry};
use tracing_subscriber::EnvFilter;

/// Compile a module of exported functions and deploy it as serverless routes.
#[derive(Debug, Parser)]
#[command(name = "function-bundler", version, about)]
struct Cli {
    /// Module source file
    file: PathBuf,

    /// Also write the archive to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Build the archive without uploading or deploying it
    #[arg(long)]
    no_deploy: bool,

    #[arg(long, env = "FUNCTION_BUNDLER_UPLOAD_URL", default_value = function_bundler::config::DEFAULT_UPLOAD_URL)]
    upload_url: String,

    #[arg(long, env = "FUNCTION_BUNDLER_DEPLOY_URL", default_value = function_bundler::config::DEFAULT_DEPLOY_URL)]
    deploy_url: String,

    #[arg(long, env = "FUNCTION_BUNDLER_REGISTRY_URL", default_value = function_bundler::config::DEFAULT_REGISTRY_URL)]
    registry_url: String,

    #[arg(long, env = "FUNCTION_BUNDLER_TIMEOUT_MS", default_value_t = function_bundler::config::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
}

impl Cli {
    fn config(&self) -> DeployConfig {
        DeployConfig {
            upload_url: self.upload_url.clone(),
            deploy_url: self.deploy_url.clone(),
            registry_url: self.registry_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let source = tokio::fs::read_to_string(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;

    let registry = UnpkgRegistry::new(config.clone())?;
    let bundle = build_bundle(&source, &registry).await?;
    tracing::info!(
        "Built {} route(s), {} archive entries, sha256 {}",
        bundle.routes.len(),
        bundle.entries.len(),
        bundle.digest()
    );

    if let Some(output) = &cli.output {
        tokio::fs::write(output, &bundle.archive)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        tracing::info!("Archive written to {}", output.display());
    }

    if cli.no_deploy {
        return Ok(());
    }

    let client = DeployClient::new(config)?;
    let archive_url = client.upload(bundle.archive).await?;
    let base = client.deploy(&archive_url).await?;

    println!("Your functions will be available in a few seconds in:");
    for url in route_urls(&base, &bundle.routes) {
        println!("{}", url);
    }

    Ok(())
}

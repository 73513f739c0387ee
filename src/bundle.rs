//! Bundle Assembler
//!
//! Packages the dispatcher as `index.js` and vendors every non-relative
//! dependency as `<package>.js` next to it.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::classify::{DependencyImport, Route};
use crate::error::CompilerError;
use crate::registry::PackageSource;

pub const ENTRY_FILE: &str = "index.js";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(skip)]
    pub archive: Vec<u8>,
    /// Entry names in archive order.
    pub entries: Vec<String>,
    pub routes: Vec<Route>,
}

impl Bundle {
    /// SHA-256 of the archive bytes, hex encoded.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.archive);
        format!("{:x}", hasher.finalize())
    }
}

/// Archive entry name for a vendored package.
pub fn package_entry_name(package: &str) -> String {
    format!("{}.js", package)
}

/// Packages to vendor, in first-import order, each listed once.
pub fn vendored_packages(imports: &[DependencyImport]) -> Vec<&str> {
    let mut seen = HashSet::new();
    imports
        .iter()
        .filter(|import| !import.is_relative())
        .map(|import| import.package.as_str())
        .filter(|package| seen.insert(*package))
        .collect()
}

/// Assemble the archive. All package fetches run concurrently; the first
/// failure aborts the assembly and no archive is produced.
pub async fn assemble_bundle<S: PackageSource>(
    document: &str,
    imports: &[DependencyImport],
    routes: Vec<Route>,
    packages: &S,
) -> Result<Bundle, CompilerError> {
    let names = vendored_packages(imports);
    let sources = try_join_all(names.iter().map(|name| packages.fetch(name))).await?;

    let mut files = Vec::with_capacity(names.len() + 1);
    files.push((ENTRY_FILE.to_string(), document.as_bytes()));
    for (name, source) in names.iter().zip(sources.iter()) {
        files.push((package_entry_name(name), source.as_bytes()));
    }

    let archive = write_archive(&files)?;
    Ok(Bundle {
        archive,
        entries: files.into_iter().map(|(name, _)| name).collect(),
        routes,
    })
}

/// Write entries into a zip container with fixed timestamps, so the same
/// entries always produce the same bytes.
fn write_archive(files: &[(String, &[u8])]) -> Result<Vec<u8>, CompilerError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(contents)?;
    }
    Ok(zip.finish()?.into_inner())
}

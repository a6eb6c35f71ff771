// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest v2.

use serde::Deserialize;
use tracing::info;

use crate::core::downloader::Fetcher;
use crate::core::error::{BundlerError, BundlerResult};

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type", default)]
    pub version_type: String,
    pub url: String,
    pub sha1: String,
}

impl VersionManifest {
    /// Fetch the version manifest from `url`.
    pub async fn fetch<F: Fetcher + ?Sized>(fetcher: &F, url: &str) -> BundlerResult<Self> {
        info!("Fetching Minecraft version manifest from {}", url);

        let raw = fetcher.fetch_text(url).await?;
        let manifest: VersionManifest = serde_json::from_str(&raw)?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Like [`find_version`](Self::find_version) but a missing ID is an error.
    pub fn require_version(&self, id: &str) -> BundlerResult<&VersionEntry> {
        self.find_version(id)
            .ok_or_else(|| BundlerError::VersionNotFound(id.to_string()))
    }
}

use std::path::{Path, PathBuf};

use crate::core::rules::Environment;
use crate::core::version::VERSION_MANIFEST_URL;

pub const DEFAULT_GAME_VERSION: &str = "1.21.1";

/// Everything one bundle run needs to know.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Manifest version ID to bundle.
    pub version: String,
    pub manifest_url: String,
    /// Scratch dir for downloads; reused across runs as a cache.
    pub build_dir: PathBuf,
    /// Output dir; wiped at the start of the output phase.
    pub dist_dir: PathBuf,
    /// Holds `default_config.json` and launch script templates.
    pub artifacts_dir: PathBuf,
    pub env: Environment,
}

impl BundleConfig {
    pub fn new(version: impl Into<String>, env: Environment) -> Self {
        Self {
            version: version.into(),
            manifest_url: VERSION_MANIFEST_URL.to_string(),
            build_dir: PathBuf::from(".build"),
            dist_dir: PathBuf::from("dist"),
            artifacts_dir: PathBuf::from("artifacts"),
            env,
        }
    }

    /// Place build, dist and artifacts dirs under `root`.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.build_dir = root.join(".build");
        self.dist_dir = root.join("dist");
        self.artifacts_dir = root.join("artifacts");
        self
    }

    pub fn version_json_path(&self) -> PathBuf {
        self.build_dir.join("vm.json")
    }

    pub fn client_jar_path(&self) -> PathBuf {
        self.build_dir.join("client.jar")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.build_dir.join("downloads")
    }

    pub fn defaults_path(&self) -> PathBuf {
        self.artifacts_dir.join("default_config.json")
    }
}

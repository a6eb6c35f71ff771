//! Command line interface.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::core::bundle::{BundleConfig, BundleOutcome, BundlePipeline, DEFAULT_GAME_VERSION};
use crate::core::downloader::Downloader;
use crate::core::error::BundlerResult;
use crate::core::rules::{Arch, Environment, OsName};
use crate::core::version::VERSION_MANIFEST_URL;

/// Bundle a Minecraft client into a single runnable jar plus launch script
#[derive(Parser, Debug)]
#[command(name = "mc-bundler", disable_version_flag = true)]
pub struct Args {
    /// The Minecraft version to bundle
    #[arg(long = "version", value_name = "ID", default_value = DEFAULT_GAME_VERSION)]
    pub game_version: String,

    /// Version manifest to resolve the version against
    #[arg(long, env = "MC_BUNDLER_MANIFEST_URL", default_value = VERSION_MANIFEST_URL)]
    pub manifest_url: String,

    /// Download cache and merge workspace
    #[arg(long, env = "MC_BUNDLER_BUILD_DIR", default_value = ".build")]
    pub build_dir: PathBuf,

    /// Output directory (replaced on every run)
    #[arg(long, env = "MC_BUNDLER_DIST_DIR", default_value = "dist")]
    pub dist_dir: PathBuf,

    /// Directory with default_config.json and launch script templates
    #[arg(long, env = "MC_BUNDLER_ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Bundle for this OS instead of the host (windows, linux, osx)
    #[arg(long, value_name = "OS")]
    pub os: Option<OsName>,

    /// Bundle for this architecture instead of the host (x64, x86)
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<Arch>,
}

impl Args {
    pub fn into_config(self) -> BundleConfig {
        let env = Environment::detect_with(self.os, self.arch);
        let mut config = BundleConfig::new(self.game_version, env);
        config.manifest_url = self.manifest_url;
        config.build_dir = self.build_dir;
        config.dist_dir = self.dist_dir;
        config.artifacts_dir = self.artifacts_dir;
        config
    }
}

/// Run one bundle with the real downloader.
pub async fn run(args: Args) -> BundlerResult<BundleOutcome> {
    let config = args.into_config();
    let downloader = Downloader::new()?;
    let outcome = BundlePipeline::new(&downloader, &config).run().await?;

    for warning in &outcome.merge.warnings {
        warn!(
            "Merged without {:?} ({:?}: {})",
            warning.source, warning.issue, warning.detail
        );
    }
    if !outcome.failed_libraries.is_empty() {
        warn!(
            "Bundle is missing {} libraries: {}",
            outcome.failed_libraries.len(),
            outcome.failed_libraries.join(", ")
        );
    }
    info!("Bundle ready in {:?}", config.dist_dir);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_layout() {
        let args = Args::try_parse_from(["mc-bundler"]).unwrap();
        let config = args.into_config();
        assert_eq!(config.version, "1.21.1");
        assert_eq!(config.build_dir, PathBuf::from(".build"));
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.env, Environment::detect());
    }

    #[test]
    fn version_flag_selects_the_game_version() {
        let args = Args::try_parse_from(["mc-bundler", "--version", "1.20.4"]).unwrap();
        assert_eq!(args.game_version, "1.20.4");
    }

    #[test]
    fn platform_overrides_are_parsed() {
        let args =
            Args::try_parse_from(["mc-bundler", "--os", "macos", "--arch", "x86"]).unwrap();
        let config = args.into_config();
        assert_eq!(config.env, Environment::new(OsName::Osx, Arch::X86));
    }

    #[test]
    fn unknown_os_is_rejected() {
        assert!(Args::try_parse_from(["mc-bundler", "--os", "beos"]).is_err());
    }
}

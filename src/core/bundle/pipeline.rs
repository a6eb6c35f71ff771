// ─── Bundle Pipeline ───
// Manifest → version JSON → verified downloads → merged jar → dist output.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::core::archive::{merge_into_jar, MergeReport};
use crate::core::downloader::{sha1_file, Fetcher};
use crate::core::error::{BundlerError, BundlerResult};
use crate::core::launch::{
    resolve_arguments, write_launch_script, LaunchDefaults, ScriptKind, ScriptVars,
};
use crate::core::report::{host_platform, machine_fingerprint, BuildInfo};
use crate::core::version::{VersionJson, VersionManifest};

use super::config::BundleConfig;

const DEFAULT_MAIN_CLASS: &str = "net.minecraft.client.main.Main";

/// What a finished run produced.
#[derive(Debug)]
pub struct BundleOutcome {
    pub client_jar: PathBuf,
    pub launch_script: Option<PathBuf>,
    pub build_info: PathBuf,
    pub merge: MergeReport,
    /// Libraries that could not be downloaded and verified.
    pub failed_libraries: Vec<String>,
    pub elapsed: Duration,
}

pub struct BundlePipeline<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a BundleConfig,
}

impl<'a, F: Fetcher + ?Sized> BundlePipeline<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a BundleConfig) -> Self {
        Self { fetcher, config }
    }

    pub async fn run(&self) -> BundlerResult<BundleOutcome> {
        let start = Instant::now();
        let config = self.config;
        info!(
            "Bundling Minecraft {} for {}/{}",
            config.version, config.env.os, config.env.arch
        );

        let downloads_dir = config.downloads_dir();
        tokio::fs::create_dir_all(&downloads_dir)
            .await
            .map_err(BundlerError::io(&downloads_dir))?;

        // 1. Resolve the version through the manifest
        let manifest = VersionManifest::fetch(self.fetcher, &config.manifest_url).await?;
        let entry = manifest.require_version(&config.version)?;

        // 2. Fetch and parse the version JSON
        let version_json_path = config.version_json_path();
        self.require_verified(&entry.url, &version_json_path, &entry.sha1)
            .await?;
        let version = VersionJson::load(&version_json_path).await?;

        // 3. Client jar
        let client = version.client_download()?;
        let client_jar = config.client_jar_path();
        self.require_verified(&client.url, &client_jar, &client.sha1)
            .await?;

        // 4. Libraries for this platform
        let (library_jars, failed_libraries) =
            self.download_libraries(&version, &downloads_dir).await;

        // 5. Merge libraries into the client jar
        let merge = {
            let target = client_jar.clone();
            tokio::task::spawn_blocking(move || merge_into_jar(&target, &library_jars))
                .await
                .map_err(|e| BundlerError::Other(format!("Task join error: {}", e)))??
        };

        // 6. Fresh dist dir with the merged jar
        let dist_client = self.prepare_dist(&client_jar).await?;

        // 7. Arguments and launch script
        let defaults = LaunchDefaults::load_or_builtin(&config.defaults_path()).await?;
        let defaults = match &version.asset_index {
            Some(index) => defaults.with_fallback("assets_index_name", &index.id),
            None => defaults,
        };
        let args = resolve_arguments(
            &version.game_args(),
            &version.jvm_args(&config.env),
            &defaults,
            &config.version,
        );
        debug!("Launcher args: {}", args.game);
        debug!("JVM args: {}", args.jvm);

        let launch_script = match ScriptKind::for_os(config.env.os) {
            Some(kind) => {
                let vars = ScriptVars {
                    launcher_args: &args.game,
                    jvm_args: &args.jvm,
                    main_class: version.main_class.as_deref().unwrap_or(DEFAULT_MAIN_CLASS),
                    version: &config.version,
                };
                Some(
                    write_launch_script(kind, &config.artifacts_dir, &config.dist_dir, &vars)
                        .await?,
                )
            }
            None => {
                warn!("No launch script template for OS {}", config.env.os);
                None
            }
        };

        // 8. Build report
        let build_info_path = config.dist_dir.join("build_info.txt");
        let report = BuildInfo {
            version: config.version.clone(),
            jvm_args: args.jvm,
            launcher_args: args.game,
            client_sha1: sha1_file(&client_jar).await?,
            machine_fingerprint: tokio::task::spawn_blocking(machine_fingerprint)
                .await
                .map_err(|e| BundlerError::Other(format!("Task join error: {}", e)))?,
            os: host_platform(),
            built_at: Local::now(),
        };
        report.write_to(&build_info_path).await?;

        let elapsed = start.elapsed();
        info!("Finished in {:.2} seconds", elapsed.as_secs_f64());

        Ok(BundleOutcome {
            client_jar: dist_client,
            launch_script,
            build_info: build_info_path,
            merge,
            failed_libraries,
            elapsed,
        })
    }

    async fn require_verified(&self, url: &str, dest: &Path, sha1: &str) -> BundlerResult<()> {
        if self.fetcher.download_and_verify(url, dest, sha1).await {
            Ok(())
        } else {
            Err(BundlerError::VerificationFailed {
                url: url.to_string(),
                path: dest.to_path_buf(),
            })
        }
    }

    /// Download every applicable library in manifest order.
    ///
    /// Returns the verified jar paths (merge order) and the names of
    /// libraries that failed; unverified files never reach the merge.
    async fn download_libraries(
        &self,
        version: &VersionJson,
        downloads_dir: &Path,
    ) -> (Vec<PathBuf>, Vec<String>) {
        let mut jars = Vec::new();
        let mut failed = Vec::new();

        for lib in version.applicable_libraries(&self.config.env) {
            let Some(artifact) = lib.artifact() else {
                debug!("Library {} has no artifact download, skipping", lib.name);
                continue;
            };

            let dest = downloads_dir.join(artifact.local_file_name());
            if self
                .fetcher
                .download_and_verify(&artifact.url, &dest, &artifact.sha1)
                .await
            {
                jars.push(dest);
            } else {
                warn!("Library {} could not be verified, leaving it out", lib.name);
                failed.push(lib.name.clone());
            }
        }

        info!(
            "Processed {} libraries ({} ready, {} failed)",
            version.libraries.len(),
            jars.len(),
            failed.len()
        );
        (jars, failed)
    }

    async fn prepare_dist(&self, client_jar: &Path) -> BundlerResult<PathBuf> {
        let dist = &self.config.dist_dir;
        if dist.exists() {
            tokio::fs::remove_dir_all(dist)
                .await
                .map_err(BundlerError::io(dist))?;
        }
        tokio::fs::create_dir_all(dist)
            .await
            .map_err(BundlerError::io(dist))?;

        let dest = dist.join("client.jar");
        tokio::fs::copy(client_jar, &dest)
            .await
            .map_err(BundlerError::io(&dest))?;
        Ok(dest)
    }
}

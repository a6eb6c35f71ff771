// ─── Version File ───
// Parses a Mojang version JSON and selects libraries and arguments for an
// `Environment`.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{BundlerError, BundlerResult};
use crate::core::rules::{present_rules, Applicability, Environment, Rules};

/// The parts of a Mojang version JSON the bundler consumes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    pub id: Option<String>,
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub sha1: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndexInfo {
    pub id: String,
}

// ─── Arguments ───

#[derive(Debug, Default, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Argument>,
    #[serde(default)]
    pub jvm: Vec<Argument>,
}

/// One entry of `arguments.game` / `arguments.jvm`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),
    Conditional(ConditionalArgument),
    /// Anything else; never emitted.
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionalArgument {
    #[serde(default, deserialize_with = "present_rules")]
    pub rules: Option<Rules>,
    pub value: ArgumentValue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    One(String),
    Many(Vec<String>),
}

impl ArgumentValue {
    pub fn values(&self) -> &[String] {
        match self {
            ArgumentValue::One(s) => std::slice::from_ref(s),
            ArgumentValue::Many(v) => v,
        }
    }
}

impl Applicability for ConditionalArgument {
    fn rules(&self) -> Option<&Rules> {
        self.rules.as_ref()
    }
}

// ─── Library Entry with Rules ───

#[derive(Debug, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default, deserialize_with = "present_rules")]
    pub rules: Option<Rules>,
}

#[derive(Debug, Deserialize)]
pub struct LibraryDownloads {
    pub artifact: Option<LibDownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibDownloadArtifact {
    pub path: String,
    pub sha1: String,
    pub url: String,
}

impl LibDownloadArtifact {
    /// Flat file name for the download cache: the maven path with `/`
    /// replaced by `_`.
    pub fn local_file_name(&self) -> String {
        self.path.replace('/', "_")
    }
}

impl LibraryEntry {
    pub fn artifact(&self) -> Option<&LibDownloadArtifact> {
        self.downloads.as_ref()?.artifact.as_ref()
    }
}

impl Applicability for LibraryEntry {
    fn rules(&self) -> Option<&Rules> {
        self.rules.as_ref()
    }
}

impl VersionJson {
    /// Read and parse a version JSON from disk.
    pub async fn load(path: &Path) -> BundlerResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(BundlerError::io(path))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The client jar download, required for a bundle.
    pub fn client_download(&self) -> BundlerResult<&DownloadArtifact> {
        self.downloads
            .as_ref()
            .and_then(|d| d.client.as_ref())
            .ok_or_else(|| {
                BundlerError::MissingClientDownload(self.id.clone().unwrap_or_default())
            })
    }

    /// Libraries whose rules allow `env`, in manifest order.
    pub fn applicable_libraries<'a>(
        &'a self,
        env: &'a Environment,
    ) -> impl Iterator<Item = &'a LibraryEntry> + 'a {
        self.libraries.iter().filter(move |lib| {
            let keep = lib.is_applicable(env);
            if !keep {
                debug!("Skipping library (OS rule): {}", lib.name);
            }
            keep
        })
    }

    /// Game arguments: plain strings only.
    ///
    /// Conditional game arguments are gated on launcher features (demo mode,
    /// custom resolution, quick play) and are never emitted.
    pub fn game_args(&self) -> Vec<String> {
        match &self.arguments {
            Some(args) => args
                .game
                .iter()
                .filter_map(|arg| match arg {
                    Argument::Plain(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            None => self
                .minecraft_arguments
                .as_deref()
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }

    /// JVM arguments applicable to `env`.
    ///
    /// `-cp` and `${classpath}` are dropped; the launch script supplies the
    /// classpath itself.
    pub fn jvm_args(&self, env: &Environment) -> Vec<String> {
        let Some(args) = &self.arguments else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for arg in &args.jvm {
            match arg {
                Argument::Plain(s) => {
                    if s == "-cp" || s == "${classpath}" {
                        continue;
                    }
                    out.push(s.clone());
                }
                Argument::Conditional(cond) => {
                    if cond.is_applicable(env) {
                        out.extend(cond.value.values().iter().cloned());
                    }
                }
                Argument::Unrecognized(raw) => debug!("Ignoring JVM argument {}", raw),
            }
        }
        out
    }
}

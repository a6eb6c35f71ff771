// ─── Launch Arguments ───
// Placeholder substitution for game and JVM argument strings.

use std::path::Path;

use tracing::{debug, info};

use crate::core::error::{BundlerError, BundlerResult};

const BUILTIN_DEFAULTS: &str = include_str!("../../../artifacts/default_config.json");

/// Placeholder values from `default_config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchDefaults {
    entries: Vec<(String, String)>,
}

impl LaunchDefaults {
    /// Parse a flat JSON object of string values. Substitution follows the
    /// key order of the file.
    pub fn from_json_str(raw: &str) -> BundlerResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let obj = value
            .as_object()
            .ok_or_else(|| BundlerError::Config("default config must be a JSON object".into()))?;

        let mut entries = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            let value = value.as_str().ok_or_else(|| {
                BundlerError::Config(format!("default config value for '{key}' must be a string"))
            })?;
            entries.push((key.clone(), value.to_string()));
        }
        Ok(Self { entries })
    }

    /// Defaults shipped inside the binary.
    pub fn builtin() -> BundlerResult<Self> {
        Self::from_json_str(BUILTIN_DEFAULTS)
    }

    /// Read `path`, falling back to [`builtin`](Self::builtin) when it does
    /// not exist.
    pub async fn load_or_builtin(path: &Path) -> BundlerResult<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => {
                info!("Loaded launch defaults from {:?}", path);
                Self::from_json_str(&raw)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{:?} not found, using built-in launch defaults", path);
                Self::builtin()
            }
            Err(e) => Err(BundlerError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Add `key` unless the config already defines it.
    pub fn with_fallback(mut self, key: &str, value: &str) -> Self {
        if self.get(key).is_none() {
            self.entries.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Replace every `${key}` with `"value"`.
    fn apply(&self, text: &str) -> String {
        self.entries.iter().fold(text.to_string(), |acc, (key, value)| {
            acc.replace(&format!("${{{key}}}"), &quoted(value))
        })
    }
}

/// Space-joined argument strings ready for a launch script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArgs {
    pub game: String,
    pub jvm: String,
}

/// Join and substitute game and JVM arguments.
///
/// Every argument is followed by a single space. Placeholders from
/// `defaults` are substituted first, then `${version_name}`. Unknown
/// placeholders are left as they are.
pub fn resolve_arguments(
    game: &[String],
    jvm: &[String],
    defaults: &LaunchDefaults,
    version_name: &str,
) -> ResolvedArgs {
    let game = defaults
        .apply(&join_args(game))
        .replace("${version_name}", &quoted(version_name));
    let jvm = defaults.apply(&join_args(jvm));

    ResolvedArgs { game, jvm }
}

fn join_args(args: &[String]) -> String {
    args.iter().fold(String::new(), |mut acc, arg| {
        acc.push_str(arg);
        acc.push(' ');
        acc
    })
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

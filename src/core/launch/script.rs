// ─── Launch Script ───
// Renders the per-platform start script shipped next to client.jar.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::error::{BundlerError, BundlerResult};
use crate::core::rules::OsName;

/// Which start script a bundle gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Windows,
    MacOs,
    Linux,
}

impl ScriptKind {
    /// `None` for hosts no script exists for.
    pub fn for_os(os: OsName) -> Option<Self> {
        match os {
            OsName::Windows => Some(ScriptKind::Windows),
            OsName::Osx => Some(ScriptKind::MacOs),
            OsName::Linux => Some(ScriptKind::Linux),
            OsName::Unknown => None,
        }
    }

    /// Template name under the artifacts dir, and output name under dist.
    pub fn file_name(&self) -> &'static str {
        match self {
            ScriptKind::Windows => "windows.bat",
            ScriptKind::MacOs => "macos",
            ScriptKind::Linux => "linux",
        }
    }

    fn builtin_template(&self) -> &'static str {
        match self {
            ScriptKind::Windows => include_str!("../../../artifacts/windows.bat"),
            ScriptKind::MacOs => include_str!("../../../artifacts/macos"),
            ScriptKind::Linux => include_str!("../../../artifacts/linux"),
        }
    }
}

/// Values available to script templates.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptVars<'a> {
    #[serde(rename = "LAUNCHER_ARGS")]
    pub launcher_args: &'a str,
    #[serde(rename = "JVM_ARGS")]
    pub jvm_args: &'a str,
    #[serde(rename = "MAIN_CLASS")]
    pub main_class: &'a str,
    #[serde(rename = "VERSION")]
    pub version: &'a str,
}

/// Render `template` with `{{LAUNCHER_ARGS}}`-style variables.
///
/// Output is not HTML-escaped; argument strings carry literal quotes.
pub fn render_launch_script(template: &str, vars: &ScriptVars<'_>) -> BundlerResult<String> {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    Ok(hb.render_template(template, vars)?)
}

/// Render the script for `kind` into `dist_dir`.
///
/// The template is read from `artifacts_dir` when present there, otherwise
/// the built-in one is used. Unix scripts are marked executable.
pub async fn write_launch_script(
    kind: ScriptKind,
    artifacts_dir: &Path,
    dist_dir: &Path,
    vars: &ScriptVars<'_>,
) -> BundlerResult<PathBuf> {
    let template_path = artifacts_dir.join(kind.file_name());
    let template = match tokio::fs::read_to_string(&template_path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{:?} not found, using built-in template", template_path);
            kind.builtin_template().to_string()
        }
        Err(e) => {
            return Err(BundlerError::Io {
                path: template_path,
                source: e,
            })
        }
    };

    let rendered = render_launch_script(&template, vars)?;
    let dest = dist_dir.join(kind.file_name());
    tokio::fs::write(&dest, rendered)
        .await
        .map_err(BundlerError::io(&dest))?;

    if kind != ScriptKind::Windows {
        make_executable(&dest).await?;
    }

    info!("Wrote launch script {:?}", dest);
    Ok(dest)
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> BundlerResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(BundlerError::io(path))
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> BundlerResult<()> {
    Ok(())
}

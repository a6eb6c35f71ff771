// ─── Build Report ───
// `build_info.txt`: what was bundled, its hash, and where it was built.

use std::path::Path;

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use sysinfo::Networks;
use tracing::{debug, info};

use crate::core::error::{BundlerError, BundlerResult};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: String,
    pub jvm_args: String,
    pub launcher_args: String,
    /// Hex SHA-1 of the merged client jar.
    pub client_sha1: String,
    /// Hex SHA-256 of the build host's MAC address, if one was found.
    pub machine_fingerprint: Option<String>,
    /// Lowercase kernel name of the build host (`linux`, `darwin`, `windows`).
    pub os: String,
    pub built_at: DateTime<Local>,
}

impl BuildInfo {
    pub fn render(&self) -> String {
        let fingerprint = self.machine_fingerprint.as_deref().unwrap_or("unknown");
        format!(
            "Version: {}\nJVM Args: {}\nLauncher Args: {}\nSHA1: {}\nMAC Address: {}\nOS: {}\nDate: {}\n",
            self.version,
            self.jvm_args,
            self.launcher_args,
            self.client_sha1,
            fingerprint,
            self.os,
            self.built_at.format(DATE_FORMAT),
        )
    }

    pub async fn write_to(&self, path: &Path) -> BundlerResult<()> {
        tokio::fs::write(path, self.render())
            .await
            .map_err(BundlerError::io(path))?;
        info!("Wrote build info to {:?}", path);
        Ok(())
    }
}

/// Kernel name of the machine running the build. This is the host, not the
/// bundle's target environment.
pub fn host_platform() -> String {
    match std::env::consts::OS {
        "macos" => "darwin".to_string(),
        other => other.to_string(),
    }
}

/// SHA-256 over the MAC address written as a 48-bit decimal integer.
pub fn fingerprint_mac(mac: [u8; 6]) -> String {
    let value = mac.iter().fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    hex::encode(Sha256::digest(value.to_string().as_bytes()))
}

/// Fingerprint of the first interface (by name) with a non-zero MAC.
pub fn machine_fingerprint() -> Option<String> {
    let networks = Networks::new_with_refreshed_list();
    let mut interfaces: Vec<_> = networks
        .list()
        .iter()
        .map(|(name, data)| (name.clone(), data.mac_address().0))
        .filter(|(_, mac)| mac.iter().any(|b| *b != 0))
        .collect();
    interfaces.sort_by(|a, b| a.0.cmp(&b.0));

    let (name, mac) = interfaces.into_iter().next()?;
    debug!("Using MAC address of interface {} for fingerprint", name);
    Some(fingerprint_mac(mac))
}

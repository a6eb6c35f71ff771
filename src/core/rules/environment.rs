// ─── Host Environment ───
// Platform + architecture identifiers used by manifest OS rules.

use std::fmt;
use std::str::FromStr;

/// Mojang OS name. Anything that is not Windows, macOS or Linux maps to
/// `Unknown`, which no manifest rule names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsName {
    Windows,
    Linux,
    Osx,
    Unknown,
}

impl OsName {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Linux => "linux",
            OsName::Osx => "osx",
            OsName::Unknown => "unknown",
        }
    }

    fn host() -> Self {
        if cfg!(target_os = "windows") {
            OsName::Windows
        } else if cfg!(target_os = "macos") {
            OsName::Osx
        } else if cfg!(target_os = "linux") {
            OsName::Linux
        } else {
            OsName::Unknown
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" => Ok(OsName::Windows),
            "linux" => Ok(OsName::Linux),
            "osx" | "macos" | "darwin" => Ok(OsName::Osx),
            other => Err(format!(
                "unknown OS '{other}' (expected windows, linux or osx)"
            )),
        }
    }
}

/// Architecture as Mojang rules spell it. Derived from pointer width only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    X86,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::X86 => "x86",
        }
    }

    fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            Arch::X64
        } else {
            Arch::X86
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x64" | "64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "x86" | "32" | "i686" => Ok(Arch::X86),
            other => Err(format!("unknown arch '{other}' (expected x64 or x86)")),
        }
    }
}

/// The platform rules are evaluated against.
///
/// Built once at startup and passed by reference; tests construct arbitrary
/// values instead of depending on the build host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub os: OsName,
    pub arch: Arch,
}

impl Environment {
    pub fn new(os: OsName, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Environment of the running binary.
    pub fn detect() -> Self {
        Self::new(OsName::host(), Arch::host())
    }

    /// Host environment with optional per-field overrides.
    pub fn detect_with(os: Option<OsName>, arch: Option<Arch>) -> Self {
        let host = Self::detect();
        Self::new(os.unwrap_or(host.os), arch.unwrap_or(host.arch))
    }
}

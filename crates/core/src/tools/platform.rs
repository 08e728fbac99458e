//! Host platform identification.
//!
//! Identifiers are accepted in both Node style (`Windows_NT`, `Darwin`, `x64`)
//! and Rust style (`windows`, `macos`, `aarch64`) so the same table works for
//! values reported by a runner and values taken from `std::env::consts`.

/// Platform identifier combining OS and architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Get the current platform.
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: Os::current(),
            arch: Arch::current(),
        }
    }

    /// Parse from string like "darwin-arm64".
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (os, arch) = s.split_once('-')?;
        if os.is_empty() || arch.is_empty() || arch.contains('-') {
            return None;
        }
        Some(Self {
            os: Os::parse(os),
            arch: Arch::parse(arch),
        })
    }

    /// Executable file name for `tool` on this platform.
    #[must_use]
    pub fn executable_name(&self, tool: &str) -> String {
        format!("{tool}{}", self.os.executable_extension())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Operating system.
///
/// Unrecognized systems are kept as [`Os::Other`] rather than rejected; they
/// are treated like Windows when picking an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    Other(String),
}

impl Os {
    /// Get the current OS.
    #[must_use]
    pub fn current() -> Self {
        Self::parse(std::env::consts::OS)
    }

    /// Parse from string. Never fails.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "linux" => Self::Linux,
            "darwin" | "macos" | "osx" => Self::Darwin,
            other if other.starts_with("win") => Self::Windows,
            _ => Self::Other(s.to_string()),
        }
    }

    /// File extension for executables, including the dot.
    #[must_use]
    pub fn executable_extension(&self) -> &'static str {
        match self {
            Self::Linux | Self::Darwin => "",
            Self::Windows | Self::Other(_) => ".exe",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Darwin => write!(f, "darwin"),
            Self::Windows => write!(f, "windows"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    Arm64,
    X86_64,
    Other(String),
}

impl Arch {
    /// Get the current architecture.
    #[must_use]
    pub fn current() -> Self {
        Self::parse(std::env::consts::ARCH)
    }

    /// Parse from string. Never fails.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "arm64" | "aarch64" => Self::Arm64,
            "x86_64" | "amd64" | "x64" => Self::X86_64,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arm64 => write!(f, "arm64"),
            Self::X86_64 => write!(f, "x64"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

//! Host platform detection.
//!
//! Every platform-dependent decision in the crate is a pure function of the
//! [`HostPlatform`] captured once at process start, so tests can simulate any
//! host by constructing the value directly.

use std::fmt;

/// Operating system families the fetch and compile tables are keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsFamily {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    MacOs,
    /// Linux distributions.
    Linux,
    /// Anything else, keeping the detected name for diagnostics.
    Other(String),
}

impl OsFamily {
    /// Classify an operating system name.
    ///
    /// Accepts the values of `std::env::consts::OS` as well as the
    /// `uname`-style spellings (`Darwin`, `Linux`, `Windows`), ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use vendorkit::platform::OsFamily;
    ///
    /// assert_eq!(OsFamily::from_name("Darwin"), OsFamily::MacOs);
    /// assert_eq!(OsFamily::from_name("linux"), OsFamily::Linux);
    /// assert!(matches!(OsFamily::from_name("plan9"), OsFamily::Other(_)));
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "windows" => Self::Windows,
            "macos" | "darwin" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Other(name.to_owned()),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("Windows"),
            Self::MacOs => f.write_str("macOS"),
            Self::Linux => f.write_str("Linux"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// The operating system and CPU architecture of the build host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    os: OsFamily,
    arch: String,
}

impl HostPlatform {
    /// Create a platform from explicit parts.
    #[must_use]
    pub fn new(os: OsFamily, arch: impl Into<String>) -> Self {
        Self {
            os,
            arch: arch.into(),
        }
    }

    /// Detect the platform this process is running on.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(
            OsFamily::from_name(std::env::consts::OS),
            std::env::consts::ARCH,
        )
    }

    /// The operating system family.
    #[must_use]
    pub fn os(&self) -> &OsFamily {
        &self.os
    }

    /// The raw architecture string.
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Whether the CPU is an ARM variant.
    #[must_use]
    pub fn is_arm(&self) -> bool {
        let arch = self.arch.to_ascii_lowercase();
        arch.contains("arm") || arch == "aarch64"
    }

    /// The SDL Windows development package library subdirectory for this CPU.
    #[must_use]
    pub fn windows_lib_subdir(&self) -> &'static str {
        if self.is_arm() { "arm64" } else { "x64" }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.os, self.arch)
    }
}

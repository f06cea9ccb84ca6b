//! Vendored dependency descriptions.
//!
//! A [`DependencySpec`] says where a dependency lives on disk, which archive to
//! fetch for each operating system, and how to flatten the archive root once
//! it is unpacked. Specs are plain immutable values built once from
//! [`crate::config::ProjectConfig`] and passed to the fetcher.

use crate::archive::ArchiveFormat;
use crate::platform::OsFamily;
use camino::Utf8PathBuf;
use std::fmt;

/// A semantic name for a vendored dependency (for example `sdl`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyName(String);

impl DependencyName {
    /// Create a new dependency name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DependencyName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A downloadable archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    /// Absolute download URL.
    pub url: String,
    /// Compression format of the archive.
    pub format: ArchiveFormat,
}

impl ArchiveSource {
    /// Create an archive source.
    #[must_use]
    pub fn new(url: impl Into<String>, format: ArchiveFormat) -> Self {
        Self {
            url: url.into(),
            format,
        }
    }

    /// The file name the archive is saved under, taken from the last URL
    /// path segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use vendorkit::archive::ArchiveFormat;
    /// use vendorkit::dependency::ArchiveSource;
    ///
    /// let source = ArchiveSource::new(
    ///     "https://example.test/archive/refs/tags/v1.92.1.tar.gz",
    ///     ArchiveFormat::TarGz,
    /// );
    /// assert_eq!(source.file_name(), "v1.92.1.tar.gz");
    /// ```
    #[must_use]
    pub fn file_name(&self) -> &str {
        let trimmed = self.url.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

/// How a dependency is obtained on a given operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// Download and unpack an archive.
    Download(ArchiveSource),
    /// The operator installs the dependency by hand; `hint` says how.
    ManualInstall {
        /// Instruction printed instead of downloading.
        hint: String,
    },
}

/// Per-OS fetch plans with an optional catch-all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    entries: Vec<(OsFamily, FetchPlan)>,
    fallback: Option<FetchPlan>,
}

impl SourceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plan for one operating system.
    #[must_use]
    pub fn with(mut self, os: OsFamily, plan: FetchPlan) -> Self {
        self.entries.push((os, plan));
        self
    }

    /// Use `plan` for every operating system without its own entry.
    #[must_use]
    pub fn otherwise(mut self, plan: FetchPlan) -> Self {
        self.fallback = Some(plan);
        self
    }

    /// Look up the plan for `os`.
    ///
    /// Returns `None` when the table has neither an entry nor a fallback.
    #[must_use]
    pub fn resolve(&self, os: &OsFamily) -> Option<&FetchPlan> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == os)
            .map(|(_, plan)| plan)
            .or(self.fallback.as_ref())
    }
}

/// The folder an archive unpacks into, relative to the vendor directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NestedRoot {
    /// A folder with exactly this name.
    Exact(String),
    /// The first folder whose name starts with this prefix.
    Prefix(String),
}

/// When and how to flatten a dependency's archive root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRule {
    /// The nested folder to flatten.
    pub root: NestedRoot,
    /// Restrict the rule to one OS; `None` applies everywhere.
    pub only_on: Option<OsFamily>,
}

impl LayoutRule {
    /// Whether the rule runs on `os`.
    #[must_use]
    pub fn applies_to(&self, os: &OsFamily) -> bool {
        self.only_on.as_ref().is_none_or(|only| only == os)
    }
}

/// Everything the fetcher needs to know about one dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Dependency identifier used in messages and errors.
    pub name: DependencyName,
    /// Pinned version string.
    pub version: String,
    /// Vendor directory the dependency is unpacked into.
    pub target_dir: Utf8PathBuf,
    /// Where to get the dependency on each OS.
    pub sources: SourceTable,
    /// Optional archive-root flattening rule.
    pub layout: Option<LayoutRule>,
}

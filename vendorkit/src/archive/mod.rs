//! Archive retrieval and unpacking for vendored dependencies.
//!
//! # Sub-modules
//!
//! - [`download`] - Download trait and HTTP implementation.
//! - [`extraction`] - Zip and gzip-tar extraction with path traversal
//!   protection.

pub mod download;
pub mod extraction;

use std::fmt;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// A `.zip` archive.
    Zip,
    /// A gzip-compressed tarball (`.tar.gz`).
    TarGz,
}

impl ArchiveFormat {
    /// The conventional file extension, without a leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

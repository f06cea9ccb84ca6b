//! Error types for the vendorkit CLI.
//!
//! Each variant carries enough context (dependency, path, exit code, captured
//! diagnostics) for the caller to report the failure and decide whether to
//! abort. Every variant is fatal to the run; non-fatal conditions such as a
//! failed runtime-library copy are reported through dedicated outcome types
//! instead.

use crate::archive::download::DownloadError;
use crate::archive::extraction::ExtractionError;
use crate::dependency::DependencyName;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching vendors or building the app.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The host operating system has no archive for this dependency.
    #[error("unsupported OS {os} for dependency {dependency}")]
    UnsupportedFetchPlatform {
        /// Dependency whose source table had no entry.
        dependency: DependencyName,
        /// Detected operating system.
        os: String,
    },

    /// The host platform has no link profile.
    #[error("no link profile for {os} on {arch}; cannot assemble compiler flags")]
    UnsupportedBuildPlatform {
        /// Detected operating system.
        os: String,
        /// Detected CPU architecture.
        arch: String,
    },

    /// Retrieving a dependency archive failed.
    #[error("failed to download {dependency}: {source}")]
    Download {
        /// Dependency being fetched.
        dependency: DependencyName,
        /// The underlying download failure.
        #[source]
        source: DownloadError,
    },

    /// Unpacking a dependency archive failed.
    #[error("failed to extract {dependency}: {source}")]
    Extraction {
        /// Dependency being extracted.
        dependency: DependencyName,
        /// The underlying extraction failure.
        #[source]
        source: ExtractionError,
    },

    /// The compiler exited with a non-zero status.
    #[error("{program} failed ({}): {stderr}", exit_code_text(*.code))]
    CompilerFailed {
        /// Compiler program name.
        program: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured compiler diagnostics.
        stderr: String,
    },

    /// The settings file could not be read or parsed.
    #[error("invalid settings file {path}: {reason}")]
    InvalidSettings {
        /// Path to the settings file.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A filesystem or process operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_text(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_owned(),
        |code| format!("exit code {code}"),
    )
}

/// Result type alias using [`BuildError`].
pub type Result<T> = std::result::Result<T, BuildError>;

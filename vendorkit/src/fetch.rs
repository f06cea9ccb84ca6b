//! Dependency fetching.
//!
//! A vendor directory that exists and has at least one entry is taken as
//! already set up; nothing about its contents or version is checked. A
//! directory left half-populated by an interrupted extraction is therefore
//! also treated as set up on the next run. Delete the directory to force a
//! fresh download.

use crate::archive::download::{ArchiveDownloader, HttpDownloader};
use crate::archive::extraction::{ArchiveExtractor, FormatExtractor};
use crate::dependency::{ArchiveSource, DependencySpec, FetchPlan};
use crate::error::{BuildError, Result};
use crate::layout::flatten_nested_root;
use crate::output::{setup_banner, setup_complete_message, skip_message, write_stderr_line};
use crate::platform::HostPlatform;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io::Write;

/// What [`ensure_dependency`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The vendor directory already had content; nothing was downloaded.
    AlreadyPresent,
    /// The archive was downloaded and unpacked.
    Fetched {
        /// Nested archive root that was flattened, if any.
        flattened: Option<Utf8PathBuf>,
    },
    /// The operator has to install the dependency by hand.
    ManualInstall {
        /// The instruction that was printed.
        hint: String,
    },
}

/// The network and archive collaborators used to fetch dependencies.
pub struct Fetcher<'a> {
    downloader: &'a dyn ArchiveDownloader,
    extractor: &'a dyn ArchiveExtractor,
}

impl<'a> Fetcher<'a> {
    /// Create a fetcher from explicit collaborators.
    #[must_use]
    pub fn new(downloader: &'a dyn ArchiveDownloader, extractor: &'a dyn ArchiveExtractor) -> Self {
        Self {
            downloader,
            extractor,
        }
    }
}

impl Fetcher<'static> {
    /// A fetcher using `ureq` downloads and the format-dispatching extractor.
    #[must_use]
    pub fn system() -> Self {
        Self::new(&HttpDownloader, &FormatExtractor)
    }
}

/// Whether `dir` exists and contains at least one entry.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be listed.
pub fn is_populated(dir: &Utf8Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    Ok(dir.read_dir_utf8()?.next().is_some())
}

/// Ensure the dependency described by `spec` is present in its vendor
/// directory.
///
/// # Errors
///
/// Returns [`BuildError::UnsupportedFetchPlatform`] when the host OS has no
/// fetch plan, [`BuildError::Download`] or [`BuildError::Extraction`] when
/// retrieving the archive fails, and [`BuildError::Io`] on filesystem errors.
pub fn ensure_dependency(
    spec: &DependencySpec,
    platform: &HostPlatform,
    fetcher: &Fetcher<'_>,
    stderr: &mut dyn Write,
) -> Result<FetchOutcome> {
    write_stderr_line(stderr, setup_banner(&spec.name));

    if is_populated(&spec.target_dir)? {
        write_stderr_line(stderr, skip_message(&spec.target_dir));
        return Ok(FetchOutcome::AlreadyPresent);
    }

    let plan = spec.sources.resolve(platform.os()).ok_or_else(|| {
        BuildError::UnsupportedFetchPlatform {
            dependency: spec.name.clone(),
            os: platform.os().to_string(),
        }
    })?;

    let source = match plan {
        FetchPlan::Download(source) => source,
        FetchPlan::ManualInstall { hint } => {
            info!("{} is installed manually on {platform}", spec.name);
            write_stderr_line(stderr, hint);
            return Ok(FetchOutcome::ManualInstall { hint: hint.clone() });
        }
    };

    std::fs::create_dir_all(&spec.target_dir)?;
    download_and_extract(spec, source, fetcher, stderr)?;

    let flattened = match &spec.layout {
        Some(rule) if rule.applies_to(platform.os()) => {
            flatten_nested_root(&spec.target_dir, &rule.root)?
        }
        _ => None,
    };

    write_stderr_line(stderr, setup_complete_message(&spec.name, &spec.target_dir));
    Ok(FetchOutcome::Fetched { flattened })
}

/// Download the archive into the vendor directory, unpack it there, and
/// delete it.
fn download_and_extract(
    spec: &DependencySpec,
    source: &ArchiveSource,
    fetcher: &Fetcher<'_>,
    stderr: &mut dyn Write,
) -> Result<()> {
    let archive_path = spec.target_dir.join(source.file_name());

    write_stderr_line(stderr, format!("Downloading {}...", source.url));
    fetcher
        .downloader
        .download(&source.url, archive_path.as_std_path())
        .map_err(|source| BuildError::Download {
            dependency: spec.name.clone(),
            source,
        })?;

    write_stderr_line(stderr, format!("Extracting {archive_path}..."));
    let entries = fetcher
        .extractor
        .extract(
            archive_path.as_std_path(),
            source.format,
            spec.target_dir.as_std_path(),
        )
        .map_err(|source| BuildError::Extraction {
            dependency: spec.name.clone(),
            source,
        })?;
    debug!("extracted {} entries for {}", entries.len(), spec.name);

    std::fs::remove_file(&archive_path)?;
    write_stderr_line(stderr, "Done.");
    Ok(())
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;

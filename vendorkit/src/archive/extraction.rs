//! Archive extraction for downloaded dependency archives.
//!
//! Unpacks `.zip` and `.tar.gz` archives in place with path traversal
//! protection to prevent zip-slip attacks. Tar symlink entries cannot be used
//! to redirect later entries outside the destination.

use super::ArchiveFormat;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting dependency archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use vendorkit::archive::extraction::FormatExtractor;
///
/// let extractor = FormatExtractor;
/// // Use extractor.extract(archive_path, format, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the archive-relative paths of the extracted entries.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry attempts to
    /// escape the destination directory, [`ExtractionError::EmptyArchive`] if
    /// the archive has no entries, and [`ExtractionError::Io`] or
    /// [`ExtractionError::Zip`] on read failures.
    fn extract(
        &self,
        archive_path: &Path,
        format: ArchiveFormat,
        dest_dir: &Path,
    ) -> Result<Vec<String>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip container could not be read.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no entries.
    #[error("archive contains no entries")]
    EmptyArchive,
}

/// Default extractor dispatching on [`ArchiveFormat`] to the `zip` crate or
/// to `tar` over a `flate2` gzip decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatExtractor;

impl ArchiveExtractor for FormatExtractor {
    fn extract(
        &self,
        archive_path: &Path,
        format: ArchiveFormat,
        dest_dir: &Path,
    ) -> Result<Vec<String>, ExtractionError> {
        log::debug!(
            "extracting {} ({format}) into {}",
            archive_path.display(),
            dest_dir.display()
        );
        let extracted = match format {
            ArchiveFormat::Zip => extract_zip(archive_path, dest_dir)?,
            ArchiveFormat::TarGz => extract_tar_gz(archive_path, dest_dir)?,
        };

        if extracted.is_empty() {
            return Err(ExtractionError::EmptyArchive);
        }

        Ok(extracted)
    }
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<Vec<String>, ExtractionError> {
    let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;
    let mut extracted = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let entry_path = PathBuf::from(entry.name());
        validate_entry_path(&entry_path)?;

        let dest_path = dest_dir.join(&entry_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
        } else {
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut output = File::create(&dest_path)?;
            std::io::copy(&mut entry, &mut output)?;
            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&dest_path, std::fs::Permissions::from_mode(mode))?;
            }
        }

        extracted.push(entry_path.to_string_lossy().into_owned());
    }

    Ok(extracted)
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<Vec<String>, ExtractionError> {
    let decoder = GzDecoder::new(File::open(archive_path)?);
    let mut archive = tar::Archive::new(decoder);
    let mut extracted = Vec::new();

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        // GitHub tag tarballs open with a pax global header carrying the
        // commit id.
        let kind = entry.header().entry_type();
        if kind.is_pax_global_extensions() || kind.is_pax_local_extensions() {
            continue;
        }

        let entry_path = entry.path()?.into_owned();
        validate_entry_path(&entry_path)?;

        // `unpack_in` also refuses to write through a symlink unpacked by an
        // earlier entry that points outside `dest_dir`.
        if !entry.unpack_in(dest_dir)? {
            return Err(ExtractionError::PathTraversal {
                path: entry_path.display().to_string(),
            });
        }

        extracted.push(entry_path.to_string_lossy().into_owned());
    }

    Ok(extracted)
}

/// Validate that an entry path does not escape the destination directory
/// via `..` components, roots, or drive prefixes.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.is_absolute()
        || path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

//! Unit tests for dependency fetching.

use super::*;
use crate::archive::ArchiveFormat;
use crate::archive::download::{DownloadError, MockArchiveDownloader};
use crate::archive::extraction::{ExtractionError, MockArchiveExtractor};
use crate::config::{imgui_spec, sdl_spec};
use crate::platform::OsFamily;
use rstest::rstest;
use std::path::Path;

const FAKE_ARCHIVE: &[u8] = b"fake archive content";

fn vendor_root() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
    (temp, path)
}

fn linux() -> HostPlatform {
    HostPlatform::new(OsFamily::Linux, "x86_64")
}

fn writing_downloader() -> MockArchiveDownloader {
    let mut downloader = MockArchiveDownloader::new();
    downloader
        .expect_download()
        .times(1)
        .returning(|_url, dest| std::fs::write(dest, FAKE_ARCHIVE).map_err(DownloadError::Io));
    downloader
}

/// An extractor that unpacks `files` beneath `root` in the destination.
fn unpacking_extractor(root: &'static str, files: &'static [&'static str]) -> MockArchiveExtractor {
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .times(1)
        .returning(move |_archive, _format, dest: &Path| {
            let mut extracted = Vec::new();
            for file in files {
                let relative = format!("{root}/{file}");
                let path = dest.join(&relative);
                std::fs::create_dir_all(path.parent().expect("parent")).map_err(ExtractionError::Io)?;
                std::fs::write(&path, b"source").map_err(ExtractionError::Io)?;
                extracted.push(relative);
            }
            Ok(extracted)
        });
    extractor
}

#[test]
fn populated_directory_skips_network() {
    let (_temp, root) = vendor_root();
    let spec = imgui_spec("v1.92.1", &root.join("imgui"));
    std::fs::create_dir_all(&spec.target_dir).expect("create vendor dir");
    std::fs::write(spec.target_dir.join("imgui.h"), b"// stale").expect("write");

    let mut downloader = MockArchiveDownloader::new();
    downloader.expect_download().never();
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();
    let fetcher = Fetcher::new(&downloader, &extractor);

    let mut stderr = Vec::new();
    let outcome = ensure_dependency(&spec, &linux(), &fetcher, &mut stderr).expect("fetch");

    assert_eq!(outcome, FetchOutcome::AlreadyPresent);
    let text = String::from_utf8(stderr).expect("UTF-8");
    assert!(text.contains("Skipping download"), "stderr: {text}");
}

#[test]
fn fresh_directory_is_fetched_and_flattened() {
    let (_temp, root) = vendor_root();
    let spec = imgui_spec("v1.92.1", &root.join("imgui"));

    let mut downloader = MockArchiveDownloader::new();
    downloader
        .expect_download()
        .withf(|url, dest| {
            url == "https://github.com/ocornut/imgui/archive/refs/tags/v1.92.1.tar.gz"
                && dest.ends_with("imgui/v1.92.1.tar.gz")
        })
        .times(1)
        .returning(|_url, dest| std::fs::write(dest, FAKE_ARCHIVE).map_err(DownloadError::Io));
    let extractor = unpacking_extractor(
        "imgui-1.92.1",
        &["imgui.cpp", "imgui.h", "backends/imgui_impl_sdl3.cpp"],
    );
    let fetcher = Fetcher::new(&downloader, &extractor);

    let mut stderr = Vec::new();
    let outcome = ensure_dependency(&spec, &linux(), &fetcher, &mut stderr).expect("fetch");

    assert_eq!(
        outcome,
        FetchOutcome::Fetched {
            flattened: Some(spec.target_dir.join("imgui-1.92.1")),
        }
    );
    assert!(is_populated(&spec.target_dir).expect("list"));
    assert!(spec.target_dir.join("imgui.cpp").is_file());
    assert!(spec.target_dir.join("backends/imgui_impl_sdl3.cpp").is_file());
    assert!(!spec.target_dir.join("imgui-1.92.1").exists());
    assert!(!spec.target_dir.join("v1.92.1.tar.gz").exists());
}

#[test]
fn windows_sdl_zip_is_flattened_by_prefix() {
    let (_temp, root) = vendor_root();
    let spec = sdl_spec("3.2.18", &root.join("sdl"));
    let downloader = writing_downloader();
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .withf(|archive, format, _dest| {
            *format == ArchiveFormat::Zip && archive.ends_with("SDL3-devel-3.2.18-VC.zip")
        })
        .times(1)
        .returning(|_archive, _format, dest| {
            let dll = dest.join("SDL3-3.2.18/lib/arm64/SDL3.dll");
            std::fs::create_dir_all(dll.parent().expect("parent")).map_err(ExtractionError::Io)?;
            std::fs::write(&dll, b"MZ").map_err(ExtractionError::Io)?;
            Ok(vec!["SDL3-3.2.18/lib/arm64/SDL3.dll".to_owned()])
        });
    let fetcher = Fetcher::new(&downloader, &extractor);
    let platform = HostPlatform::new(OsFamily::Windows, "ARM64");

    let mut stderr = Vec::new();
    ensure_dependency(&spec, &platform, &fetcher, &mut stderr).expect("fetch");

    assert!(spec.target_dir.join("lib/arm64/SDL3.dll").is_file());
    assert!(!spec.target_dir.join("SDL3-3.2.18").exists());
}

#[test]
fn linux_sdl_tarball_keeps_its_root() {
    let (_temp, root) = vendor_root();
    let spec = sdl_spec("3.2.18", &root.join("sdl"));
    let downloader = writing_downloader();
    let extractor = unpacking_extractor("SDL3-3.2.18", &["CMakeLists.txt"]);
    let fetcher = Fetcher::new(&downloader, &extractor);

    let mut stderr = Vec::new();
    let outcome = ensure_dependency(&spec, &linux(), &fetcher, &mut stderr).expect("fetch");

    assert_eq!(outcome, FetchOutcome::Fetched { flattened: None });
    assert!(spec.target_dir.join("SDL3-3.2.18/CMakeLists.txt").is_file());
}

#[rstest]
#[case::freebsd("freebsd")]
#[case::haiku("haiku")]
fn unsupported_os_fails_without_creating_vendor_dir(#[case] os: &str) {
    let (_temp, root) = vendor_root();
    let spec = sdl_spec("3.2.18", &root.join("sdl"));
    let mut downloader = MockArchiveDownloader::new();
    downloader.expect_download().never();
    let extractor = MockArchiveExtractor::new();
    let fetcher = Fetcher::new(&downloader, &extractor);
    let platform = HostPlatform::new(OsFamily::from_name(os), "x86_64");

    let mut stderr = Vec::new();
    let err = ensure_dependency(&spec, &platform, &fetcher, &mut stderr)
        .expect_err("unsupported platform");

    match err {
        BuildError::UnsupportedFetchPlatform {
            dependency,
            os: reported,
        } => {
            assert_eq!(dependency.as_str(), "sdl");
            assert_eq!(reported, os);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!is_populated(&spec.target_dir).expect("list"));
}

#[test]
fn macos_sdl_prints_homebrew_hint() {
    let (_temp, root) = vendor_root();
    let spec = sdl_spec("3.2.18", &root.join("sdl"));
    let mut downloader = MockArchiveDownloader::new();
    downloader.expect_download().never();
    let extractor = MockArchiveExtractor::new();
    let fetcher = Fetcher::new(&downloader, &extractor);
    let platform = HostPlatform::new(OsFamily::MacOs, "aarch64");

    let mut stderr = Vec::new();
    let outcome = ensure_dependency(&spec, &platform, &fetcher, &mut stderr).expect("fetch");

    assert!(matches!(outcome, FetchOutcome::ManualInstall { .. }));
    let text = String::from_utf8(stderr).expect("UTF-8");
    assert!(text.contains("brew install sdl3"), "stderr: {text}");
}

#[test]
fn download_failure_names_dependency() {
    let (_temp, root) = vendor_root();
    let spec = imgui_spec("v1.92.1", &root.join("imgui"));
    let mut downloader = MockArchiveDownloader::new();
    downloader.expect_download().returning(|url, _dest| {
        Err(DownloadError::NotFound {
            url: url.to_owned(),
        })
    });
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().never();
    let fetcher = Fetcher::new(&downloader, &extractor);

    let mut stderr = Vec::new();
    let err = ensure_dependency(&spec, &linux(), &fetcher, &mut stderr).expect_err("404");

    assert!(matches!(
        err,
        BuildError::Download {
            source: DownloadError::NotFound { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("imgui"));
}

#[test]
fn interrupted_extraction_is_mistaken_for_complete_setup() {
    let (_temp, root) = vendor_root();
    let spec = imgui_spec("v1.92.1", &root.join("imgui"));
    let downloader = writing_downloader();
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .times(1)
        .returning(|_archive, _format, dest| {
            std::fs::write(dest.join("imgui.h"), b"// partial").map_err(ExtractionError::Io)?;
            Err(ExtractionError::Io(std::io::Error::other("connection reset")))
        });
    let fetcher = Fetcher::new(&downloader, &extractor);

    let mut stderr = Vec::new();
    let err = ensure_dependency(&spec, &linux(), &fetcher, &mut stderr).expect_err("interrupted");
    assert!(matches!(err, BuildError::Extraction { .. }));

    // The leftover archive and partial header make the next run skip the fetch.
    let mut idle_downloader = MockArchiveDownloader::new();
    idle_downloader.expect_download().never();
    let idle_extractor = MockArchiveExtractor::new();
    let retry = Fetcher::new(&idle_downloader, &idle_extractor);
    let outcome = ensure_dependency(&spec, &linux(), &retry, &mut stderr).expect("second run");

    assert_eq!(outcome, FetchOutcome::AlreadyPresent);
    assert!(!spec.target_dir.join("imgui.cpp").exists());
}

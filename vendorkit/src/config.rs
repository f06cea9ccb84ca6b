//! Project configuration.
//!
//! Pinned versions, vendor locations, and compiler settings live in
//! [`BuildSettings`], which may be overridden from an optional
//! `vendorkit.toml` in the working directory. [`ProjectConfig::from_settings`]
//! turns the settings into the immutable dependency specs and compile
//! configuration threaded through the pipeline.

use crate::archive::ArchiveFormat;
use crate::dependency::{
    ArchiveSource, DependencyName, DependencySpec, FetchPlan, LayoutRule, NestedRoot, SourceTable,
};
use crate::error::{BuildError, Result};
use crate::platform::OsFamily;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Name of the optional settings file.
pub const SETTINGS_FILE: &str = "vendorkit.toml";

/// Pinned SDL release.
pub const DEFAULT_SDL_VERSION: &str = "3.2.18";

/// Pinned Dear ImGui tag.
pub const DEFAULT_IMGUI_VERSION: &str = "v1.92.1";

const SDL_RELEASES: &str = "https://github.com/libsdl-org/SDL/releases/download";
const IMGUI_REPO: &str = "https://github.com/ocornut/imgui";
const SDL_MACOS_HINT: &str =
    "DMG installer not yet supported. Please install via Homebrew: `brew install sdl3`";

/// User-tunable settings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSettings {
    /// SDL release version, without the `release-` prefix.
    pub sdl_version: String,
    /// Dear ImGui git tag, usually with a leading `v`.
    pub imgui_version: String,
    /// Root of the vendor directories.
    pub vendor_dir: Utf8PathBuf,
    /// Directory receiving the executable.
    pub output_dir: Utf8PathBuf,
    /// C++ compiler program.
    pub compiler: String,
    /// The application's own translation unit.
    pub app_source: Utf8PathBuf,
    /// Executable name passed to `-o`, without extension.
    pub executable_name: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            sdl_version: DEFAULT_SDL_VERSION.to_owned(),
            imgui_version: DEFAULT_IMGUI_VERSION.to_owned(),
            vendor_dir: Utf8PathBuf::from("vendors"),
            output_dir: Utf8PathBuf::from("build"),
            compiler: "g++".to_owned(),
            app_source: Utf8PathBuf::from("src/main.cpp"),
            executable_name: "app".to_owned(),
        }
    }
}

impl BuildSettings {
    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidSettings`] if the file exists but cannot
    /// be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{path} not found; using built-in settings");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| BuildError::InvalidSettings {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Self::parse(&contents).map_err(|reason| BuildError::InvalidSettings {
            path: path.to_owned(),
            reason,
        })
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the parser's message on malformed input or unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use vendorkit::config::BuildSettings;
    ///
    /// let settings = BuildSettings::parse("sdl_version = \"3.2.20\"").unwrap();
    /// assert_eq!(settings.sdl_version, "3.2.20");
    /// assert_eq!(settings.imgui_version, "v1.92.1");
    /// ```
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        toml::from_str(contents).map_err(|e| e.to_string())
    }
}

/// Compiler invocation settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompileConfig {
    /// Compiler program.
    pub compiler: String,
    /// Language standard flag.
    pub language_standard: String,
    /// Optimisation flag.
    pub optimisation: String,
    /// Application sources compiled ahead of the ImGui sources.
    pub app_sources: Vec<Utf8PathBuf>,
    /// ImGui vendor directory.
    pub imgui_dir: Utf8PathBuf,
    /// SDL vendor directory.
    pub sdl_dir: Utf8PathBuf,
    /// Output directory.
    pub output_dir: Utf8PathBuf,
    /// Executable name without extension.
    pub executable_name: String,
}

/// ImGui core translation units, relative to the ImGui vendor directory.
const IMGUI_SOURCES: &[&str] = &[
    "imgui.cpp",
    "imgui_draw.cpp",
    "imgui_widgets.cpp",
    "imgui_tables.cpp",
    "backends/imgui_impl_sdl3.cpp",
    "backends/imgui_impl_sdlrenderer3.cpp",
];

impl CompileConfig {
    /// All translation units, application sources first.
    #[must_use]
    pub fn source_files(&self) -> Vec<Utf8PathBuf> {
        self.app_sources
            .iter()
            .cloned()
            .chain(IMGUI_SOURCES.iter().map(|file| self.imgui_dir.join(file)))
            .collect()
    }

    /// Include search path flags for both vendor directories.
    #[must_use]
    pub fn include_flags(&self) -> Vec<String> {
        vec![
            format!("-I{}", self.imgui_dir),
            format!("-I{}", self.imgui_dir.join("backends")),
            format!("-I{}", self.sdl_dir.join("include")),
        ]
    }

    /// Path passed to the compiler's `-o` flag.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        self.output_dir.join(&self.executable_name)
    }
}

/// The full, immutable configuration for one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    /// SDL3 dependency.
    pub sdl: DependencySpec,
    /// Dear ImGui dependency.
    pub imgui: DependencySpec,
    /// Compiler settings.
    pub compile: CompileConfig,
}

impl ProjectConfig {
    /// Build the configuration from settings.
    #[must_use]
    pub fn from_settings(settings: &BuildSettings) -> Self {
        let sdl = sdl_spec(&settings.sdl_version, &settings.vendor_dir.join("sdl"));
        let imgui = imgui_spec(&settings.imgui_version, &settings.vendor_dir.join("imgui"));
        let compile = CompileConfig {
            compiler: settings.compiler.clone(),
            language_standard: "-std=c++17".to_owned(),
            optimisation: "-O2".to_owned(),
            app_sources: vec![settings.app_source.clone()],
            imgui_dir: imgui.target_dir.clone(),
            sdl_dir: sdl.target_dir.clone(),
            output_dir: settings.output_dir.clone(),
            executable_name: settings.executable_name.clone(),
        };
        Self {
            sdl,
            imgui,
            compile,
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::from_settings(&BuildSettings::default())
    }
}

/// SDL3: the Visual C++ development zip on Windows, the source tarball on
/// Linux, and a Homebrew hint on macOS.
#[must_use]
pub fn sdl_spec(version: &str, target_dir: &Utf8Path) -> DependencySpec {
    let release = format!("{SDL_RELEASES}/release-{version}");
    let sources = SourceTable::new()
        .with(
            OsFamily::Windows,
            FetchPlan::Download(ArchiveSource::new(
                format!("{release}/SDL3-devel-{version}-VC.zip"),
                ArchiveFormat::Zip,
            )),
        )
        .with(
            OsFamily::MacOs,
            FetchPlan::ManualInstall {
                hint: SDL_MACOS_HINT.to_owned(),
            },
        )
        .with(
            OsFamily::Linux,
            FetchPlan::Download(ArchiveSource::new(
                format!("{release}/SDL3-{version}.tar.gz"),
                ArchiveFormat::TarGz,
            )),
        );

    DependencySpec {
        name: DependencyName::from("sdl"),
        version: version.to_owned(),
        target_dir: target_dir.to_owned(),
        sources,
        layout: Some(LayoutRule {
            root: NestedRoot::Prefix("SDL3".to_owned()),
            only_on: Some(OsFamily::Windows),
        }),
    }
}

/// Dear ImGui: the tag archive from GitHub, zip on Windows and tarball
/// everywhere else.
#[must_use]
pub fn imgui_spec(version: &str, target_dir: &Utf8Path) -> DependencySpec {
    let tag = format!("{IMGUI_REPO}/archive/refs/tags/{version}");
    let sources = SourceTable::new()
        .with(
            OsFamily::Windows,
            FetchPlan::Download(ArchiveSource::new(format!("{tag}.zip"), ArchiveFormat::Zip)),
        )
        .otherwise(FetchPlan::Download(ArchiveSource::new(
            format!("{tag}.tar.gz"),
            ArchiveFormat::TarGz,
        )));

    DependencySpec {
        name: DependencyName::from("imgui"),
        version: version.to_owned(),
        target_dir: target_dir.to_owned(),
        sources,
        layout: Some(LayoutRule {
            root: NestedRoot::Exact(format!(
                "imgui-{}",
                version.strip_prefix('v').unwrap_or(version)
            )),
            only_on: None,
        }),
    }
}

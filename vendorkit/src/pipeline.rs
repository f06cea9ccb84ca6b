//! The fetch-then-build sequence.
//!
//! Runs SDL setup, ImGui setup, and the compiler strictly in that order. The
//! first error stops the run.

use crate::compile::{BuildOutput, Compiler};
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::fetch::{FetchOutcome, Fetcher, ensure_dependency};
use crate::platform::HostPlatform;
use std::io::Write;

/// Collaborators with side effects outside the filesystem.
pub struct Collaborators<'a> {
    /// Archive download and extraction.
    pub fetcher: Fetcher<'a>,
    /// Runs the compiler.
    pub executor: &'a dyn CommandExecutor,
}

/// Everything the run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// What happened to SDL.
    pub sdl: FetchOutcome,
    /// What happened to Dear ImGui.
    pub imgui: FetchOutcome,
    /// The compiler run.
    pub build: BuildOutput,
}

/// Fetch both dependencies, then build the application.
///
/// # Errors
///
/// Propagates the first fetch or build error.
pub fn run_pipeline(
    config: &ProjectConfig,
    platform: &HostPlatform,
    collaborators: &Collaborators<'_>,
    stderr: &mut dyn Write,
) -> Result<BuildReport> {
    log::info!("building for {platform}");

    let sdl = ensure_dependency(&config.sdl, platform, &collaborators.fetcher, stderr)?;
    let imgui = ensure_dependency(&config.imgui, platform, &collaborators.fetcher, stderr)?;
    let build = Compiler::new(&config.compile, collaborators.executor).build(platform, stderr)?;

    Ok(BuildReport { sdl, imgui, build })
}

//! Compiler invocation.
//!
//! Platform-specific link flags come from a lookup over
//! `(OsFamily, architecture)`; hosts without an entry get no profile and the
//! build is refused rather than attempted with empty flags.

use crate::config::CompileConfig;
use crate::error::{BuildError, Result};
use crate::exec::CommandExecutor;
use crate::output::{build_complete_message, write_stderr_line};
use crate::platform::{HostPlatform, OsFamily};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use std::io::Write;

/// Homebrew prefix on Apple silicon.
const HOMEBREW_PREFIX: &str = "/opt/homebrew";

/// SDL runtime library shipped in the Windows development package.
const SDL_RUNTIME_LIBRARY: &str = "SDL3.dll";

/// Link flags and runtime requirements for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkProfile {
    /// Flags appended after the include flags.
    pub flags: Vec<String>,
    /// Shared library that must sit next to the executable at run time.
    pub runtime_library: Option<Utf8PathBuf>,
}

/// Look up the link profile for `platform`.
///
/// Returns `None` for hosts with no known profile.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use vendorkit::compile::link_profile;
/// use vendorkit::platform::{HostPlatform, OsFamily};
///
/// let linux = HostPlatform::new(OsFamily::Linux, "x86_64");
/// let profile = link_profile(&linux, Utf8Path::new("vendors/sdl")).unwrap();
/// assert_eq!(profile.flags, ["-lSDL3", "-lGL"]);
/// ```
#[must_use]
pub fn link_profile(platform: &HostPlatform, sdl_dir: &Utf8Path) -> Option<LinkProfile> {
    match platform.os() {
        OsFamily::Linux => Some(LinkProfile {
            flags: owned(&["-lSDL3", "-lGL"]),
            runtime_library: None,
        }),
        OsFamily::MacOs => Some(LinkProfile {
            flags: vec![
                format!("-L{HOMEBREW_PREFIX}/lib"),
                format!("-I{HOMEBREW_PREFIX}/include"),
                "-lSDL3".to_owned(),
                "-framework".to_owned(),
                "OpenGL".to_owned(),
            ],
            runtime_library: None,
        }),
        OsFamily::Windows => {
            let lib_dir = sdl_dir.join("lib").join(platform.windows_lib_subdir());
            Some(LinkProfile {
                flags: vec![
                    format!("-L{lib_dir}"),
                    "-lSDL3".to_owned(),
                    "-lopengl32".to_owned(),
                ],
                runtime_library: Some(lib_dir.join(SDL_RUNTIME_LIBRARY)),
            })
        }
        OsFamily::Other(_) => None,
    }
}

fn owned(flags: &[&str]) -> Vec<String> {
    flags.iter().map(|&flag| flag.to_owned()).collect()
}

/// A fully assembled compiler command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    /// Compiler program.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
}

impl CompileCommand {
    /// Assemble `<compiler> <std> <opt> <sources> <includes> <link flags> -o <output>`.
    #[must_use]
    pub fn assemble(config: &CompileConfig, profile: &LinkProfile) -> Self {
        let mut args = vec![config.language_standard.clone(), config.optimisation.clone()];
        args.extend(config.source_files().into_iter().map(Utf8PathBuf::into_string));
        args.extend(config.include_flags());
        args.extend(profile.flags.iter().cloned());
        args.push("-o".to_owned());
        args.push(config.output_path().into_string());
        Self {
            program: config.compiler.clone(),
            args,
        }
    }

    /// The command as a single space-separated line.
    #[must_use]
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Where the compiler writes the executable on `os`.
#[must_use]
pub fn executable_path(config: &CompileConfig, os: &OsFamily) -> Utf8PathBuf {
    let output = config.output_path();
    match os {
        OsFamily::Windows => output.with_extension("exe"),
        _ => output,
    }
}

/// Outcome of copying the runtime library next to the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCopy {
    /// The platform needs no runtime library.
    NotRequired,
    /// The library was copied.
    Copied {
        /// Library in the vendor directory.
        source: Utf8PathBuf,
        /// Copy next to the executable.
        destination: Utf8PathBuf,
    },
    /// The library does not exist in the vendor directory.
    SourceMissing {
        /// Expected library path.
        source: Utf8PathBuf,
    },
    /// Copying failed for another reason.
    Failed {
        /// Library in the vendor directory.
        source: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },
}

/// Copy `source` into `output_dir`.
///
/// Failures are reported through the returned [`RuntimeCopy`]; they never
/// abort the build.
#[must_use]
pub fn copy_runtime_library(source: &Utf8Path, output_dir: &Utf8Path) -> RuntimeCopy {
    let Some(file_name) = source.file_name() else {
        return RuntimeCopy::Failed {
            source: source.to_owned(),
            reason: "runtime library path has no file name".to_owned(),
        };
    };
    let destination = output_dir.join(file_name);
    match std::fs::copy(source, &destination) {
        Ok(bytes) => {
            debug!("copied {bytes} bytes from {source} to {destination}");
            RuntimeCopy::Copied {
                source: source.to_owned(),
                destination,
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => RuntimeCopy::SourceMissing {
            source: source.to_owned(),
        },
        Err(e) => RuntimeCopy::Failed {
            source: source.to_owned(),
            reason: e.to_string(),
        },
    }
}

/// The result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// The command that was run.
    pub command: CompileCommand,
    /// Path of the produced executable.
    pub executable: Utf8PathBuf,
    /// What happened to the runtime library.
    pub runtime: RuntimeCopy,
}

/// Runs the compiler for a given configuration.
pub struct Compiler<'a> {
    config: &'a CompileConfig,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Compiler<'a> {
    /// Create a compiler driver.
    #[must_use]
    pub fn new(config: &'a CompileConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self { config, executor }
    }

    /// Compile and link the application for `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedBuildPlatform`] when the platform has
    /// no link profile, [`BuildError::CompilerFailed`] when the compiler exits
    /// unsuccessfully, and [`BuildError::Io`] when the output directory cannot
    /// be created or the compiler cannot be spawned.
    pub fn build(&self, platform: &HostPlatform, stderr: &mut dyn Write) -> Result<BuildOutput> {
        let profile = link_profile(platform, &self.config.sdl_dir).ok_or_else(|| {
            BuildError::UnsupportedBuildPlatform {
                os: platform.os().to_string(),
                arch: platform.arch().to_owned(),
            }
        })?;

        std::fs::create_dir_all(&self.config.output_dir)?;

        let command = CompileCommand::assemble(self.config, &profile);
        write_stderr_line(stderr, "Building:");
        write_stderr_line(stderr, command.display_line());

        let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
        let output = self.executor.run(&command.program, &args)?;
        forward_output(&output.stdout, stderr);
        if !output.status.success() {
            return Err(BuildError::CompilerFailed {
                program: command.program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        forward_output(&output.stderr, stderr);

        let executable = executable_path(self.config, platform.os());
        write_stderr_line(stderr, build_complete_message(&executable));

        let runtime = profile.runtime_library.as_deref().map_or(
            RuntimeCopy::NotRequired,
            |library| copy_runtime_library(library, &self.config.output_dir),
        );
        report_runtime_copy(&runtime, stderr);

        Ok(BuildOutput {
            command,
            executable,
            runtime,
        })
    }
}

/// Pass captured compiler output through. Diagnostics from a failed run
/// travel in [`BuildError::CompilerFailed`] instead.
fn forward_output(captured: &[u8], stderr: &mut dyn Write) {
    let lossy = String::from_utf8_lossy(captured);
    let text = lossy.trim();
    if !text.is_empty() {
        write_stderr_line(stderr, text);
    }
}

fn report_runtime_copy(runtime: &RuntimeCopy, stderr: &mut dyn Write) {
    match runtime {
        RuntimeCopy::NotRequired => {}
        RuntimeCopy::Copied {
            source,
            destination,
        } => {
            info!("runtime library {source} copied to {destination}");
            write_stderr_line(stderr, format!("Copied {source} to {destination}"));
        }
        RuntimeCopy::SourceMissing { source } => {
            warn!("runtime library {source} not found");
            write_stderr_line(
                stderr,
                format!("Warning: {source} not found; the app may fail to start"),
            );
        }
        RuntimeCopy::Failed { source, reason } => {
            warn!("copying runtime library {source} failed: {reason}");
            write_stderr_line(
                stderr,
                format!("Warning: unexpected error copying {source}: {reason}"),
            );
        }
    }
}

#[cfg(test)]
#[path = "compile_tests.rs"]
mod tests;

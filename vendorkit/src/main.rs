//! vendorkit CLI entrypoint.
//!
//! Fetches SDL3 and Dear ImGui into `vendors/` when missing, then compiles
//! the GUI app into `build/`.

use camino::Utf8Path;
use clap::Parser;
use std::io::Write;
use vendorkit::cli::Cli;
use vendorkit::config::{BuildSettings, ProjectConfig, SETTINGS_FILE};
use vendorkit::error::Result;
use vendorkit::exec::SystemCommandExecutor;
use vendorkit::fetch::Fetcher;
use vendorkit::output::write_stderr_line;
use vendorkit::pipeline::{Collaborators, run_pipeline};
use vendorkit::platform::HostPlatform;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let Cli {} = Cli::parse();

    let mut stderr = std::io::stderr();
    let run_result = run(&mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(stderr: &mut dyn Write) -> Result<()> {
    let settings = BuildSettings::load(Utf8Path::new(SETTINGS_FILE))?;
    let config = ProjectConfig::from_settings(&settings);
    let platform = HostPlatform::detect();

    let executor = SystemCommandExecutor;
    let collaborators = Collaborators {
        fetcher: Fetcher::system(),
        executor: &executor,
    };

    run_pipeline(&config, &platform, &collaborators, stderr)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendorkit::error::BuildError;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = BuildError::CompilerFailed {
            program: "g++".to_owned(),
            code: Some(1),
            stderr: "undefined reference to `SDL_Init'".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("g++ failed (exit code 1)"));
        assert!(stderr_text.contains("SDL_Init"));
    }
}

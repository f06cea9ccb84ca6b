//! User-facing progress messages.
//!
//! Progress goes to a caller-supplied writer as plain lines so the binary can
//! target stderr and tests can capture a `Vec<u8>`.

use crate::dependency::DependencyName;
use camino::Utf8Path;
use std::io::Write;

/// Write a single line, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Banner printed when a dependency's setup starts.
#[must_use]
pub fn setup_banner(name: &DependencyName) -> String {
    format!("--- Beginning {name} setup ---")
}

/// Message printed when a vendor directory already has content.
#[must_use]
pub fn skip_message(target_dir: &Utf8Path) -> String {
    format!("{target_dir} already exists. Skipping download.")
}

/// Message printed after a dependency has been unpacked.
#[must_use]
pub fn setup_complete_message(name: &DependencyName, target_dir: &Utf8Path) -> String {
    format!("{name} setup complete in {target_dir}")
}

/// Message printed after a successful compile.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use vendorkit::output::build_complete_message;
///
/// let message = build_complete_message(Utf8Path::new("build/app"));
/// assert_eq!(message, "Build complete: run `build/app`");
/// ```
#[must_use]
pub fn build_complete_message(executable: &Utf8Path) -> String {
    format!("Build complete: run `{executable}`")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "Downloading");
        assert_eq!(buffer, b"Downloading\n");
    }

    #[test]
    fn banner_names_dependency() {
        assert_eq!(
            setup_banner(&DependencyName::from("imgui")),
            "--- Beginning imgui setup ---"
        );
    }
}

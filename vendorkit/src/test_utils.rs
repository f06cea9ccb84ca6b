//! Shared test utilities for the vendorkit crate.

use crate::error::Result;
use crate::exec::CommandExecutor;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// A command invocation captured by [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The program that was run.
    pub cmd: String,
    /// The arguments it was given.
    pub args: Vec<String>,
}

impl RecordedCall {
    /// The value following `-o`, if any.
    #[must_use]
    pub fn output_arg(&self) -> Option<&str> {
        self.args
            .iter()
            .skip_while(|arg| arg.as_str() != "-o")
            .nth(1)
            .map(String::as_str)
    }
}

/// A `CommandExecutor` that records every invocation and replays queued
/// outputs in order.
///
/// When a queued output is successful and the call carries `-o <path>`, an
/// empty file is written at `<path>` so callers observe the artefact a real
/// compiler would leave behind.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    outputs: RefCell<VecDeque<Output>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl RecordingExecutor {
    /// Creates an executor that replays `outputs`.
    #[must_use]
    pub fn new(outputs: Vec<Output>) -> Self {
        Self {
            outputs: RefCell::new(outputs.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Returns the recorded invocations.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let call = RecordedCall {
            cmd: cmd.to_owned(),
            args: args.iter().map(|&arg| arg.to_owned()).collect(),
        };
        let output = self
            .outputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| std::io::Error::other(format!("unexpected invocation of {cmd}")))?;

        if output.status.success() {
            if let Some(path) = call.output_arg() {
                std::fs::write(path, b"")?;
            }
        }

        self.calls.borrow_mut().push(call);
        Ok(output)
    }
}

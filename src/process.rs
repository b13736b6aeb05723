//! Helpers for running the external tools with the stdio wiring each stage
//! needs.
//!
//! Every stage runs exactly one tool and blocks until it exits; there is no
//! timeout and no retry. Stderr is always inherited so the tool's own
//! diagnostics reach the user verbatim.

use std::io::Write;
use std::process::{Command, ExitStatus, Output, Stdio};

use tracing::debug;

/// Run `cmd` to completion, capturing stdout in full.
///
/// Stdin and stderr are inherited from the current process.
pub fn run_capturing_stdout(mut cmd: Command) -> std::io::Result<Output> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    debug!(?cmd, "spawning child process");
    let child = cmd.spawn()?;
    let output = child.wait_with_output()?;
    debug!(
        exit_code = ?output.status.code(),
        stdout_bytes = output.stdout.len(),
        "command finished"
    );
    Ok(output)
}

/// Run `cmd` to completion, feeding `input` on stdin.
///
/// Stdout and stderr are inherited so the tool's progress is visible.
pub fn run_with_stdin(mut cmd: Command, input: &[u8]) -> std::io::Result<ExitStatus> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    debug!(?cmd, input_bytes = input.len(), "spawning child process");
    let mut child = cmd.spawn()?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| std::io::Error::other("stdin was not piped"))?;
    if let Err(err) = stdin.write_all(input) {
        // A child that exits without draining stdin closes the pipe; its
        // exit status, not the write error, classifies the failure.
        if err.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(err);
        }
        debug!("child closed stdin before reading all input");
    }
    // Close stdin so the child sees EOF.
    drop(stdin);

    let status = child.wait()?;
    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}

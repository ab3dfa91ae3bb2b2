/// Synchronous external-program execution with typed failures.
///
/// Every helper blocks until the child exits. No timeout is applied.
use std::ffi::OsStr;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::errors::{DeployerError, Result};

fn display_name(program: &OsStr) -> String {
    program.to_string_lossy().into_owned()
}

fn spawn_error(program: &OsStr, source: std::io::Error) -> DeployerError {
    DeployerError::Spawn {
        program: display_name(program),
        source,
    }
}

fn check_status(program: &OsStr, status: std::process::ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(DeployerError::CommandFailed {
            program: display_name(program),
            status,
        })
    }
}

/// Run a program with inherited stdio.
///
/// # Errors
///
/// Returns `Spawn` if the program cannot be started, `CommandFailed` on a
/// non-zero exit.
pub fn run<I, S>(program: &OsStr, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!(program = %program.to_string_lossy(), "running");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| spawn_error(program, e))?;
    check_status(program, status)
}

/// Run a program, feed `input` to its stdin, and let it write to our stdout.
///
/// A child that exits before draining its input is not an error by itself;
/// only the exit status decides.
///
/// # Errors
///
/// Returns `Spawn` if the program cannot be started or its stdin cannot be
/// written, `CommandFailed` on a non-zero exit.
pub fn run_with_input<I, S>(program: &OsStr, args: I, input: &[u8]) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    debug!(program = %program.to_string_lossy(), bytes = input.len(), "running with stdin");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(program, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(input) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("child closed stdin early");
            }
            Err(e) => {
                // Reap the child before reporting so it does not linger.
                let _ = child.kill();
                let _ = child.wait();
                return Err(spawn_error(program, e));
            }
        }
        // stdin drops here, sending EOF.
    }

    let status = child.wait().map_err(|e| spawn_error(program, e))?;
    check_status(program, status)
}

/// Run a program and capture its stdout as (lossy) UTF-8.
///
/// # Errors
///
/// Returns `Spawn` if the program cannot be started, `CommandFailed` on a
/// non-zero exit.
pub fn capture<I, S>(program: &OsStr, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| spawn_error(program, e))?;
    check_status(program, output.status)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

//! # Shell Executor
//!
//! Every external program `dev` touches (package managers, `tar`, `go`,
//! `sudo`, ...) is run through the [`Shell`] trait. The system implementation
//! captures stdout/stderr and enforces an optional per-command deadline; tests
//! substitute a scripted fake.
//!
//! A non-zero exit status is *not* an error here: callers inspect the
//! [`CommandResult`]. The only errors are failing to start the process and
//! the OS failing to report on one that did start.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use colored::Colorize;
use thiserror::Error;

use crate::log_debug;
use crate::schemas::command::{CommandResult, CommandSpec};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("failed while waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Runs commands and resolves programs on PATH.
pub trait Shell {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult, ShellError>;

    /// Full path of `program` if it resolves on PATH.
    fn which(&self, program: &str) -> Option<PathBuf>;

    fn command_exists(&self, program: &str) -> bool {
        self.which(program).is_some()
    }
}

/// The real thing: `std::process::Command` plus the `which` crate.
#[derive(Debug, Default)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult, ShellError> {
        log_debug!("[Shell] Executing: {}", spec.to_string().cyan());

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ShellError::Spawn {
                command: spec.to_string(),
                source,
            })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = match spec.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit),
            None => child.wait().map(Some),
        }
        .map_err(|source| ShellError::Wait {
            command: spec.to_string(),
            source,
        })?;

        let Some(status) = status else {
            let limit = spec.timeout.unwrap_or_default();
            log_debug!("[Shell] `{}` killed after {}s", spec, limit.as_secs());
            settle(&[&stdout, &stderr]);
            let note = format!("timed out after {}s", limit.as_secs());
            let stderr = collect(stderr);
            return Ok(CommandResult {
                exit_code: -1,
                stdout: collect(stdout),
                stderr: if stderr.trim().is_empty() {
                    note
                } else {
                    format!("{}\n{note}", stderr.trim_end())
                },
                timed_out: true,
            });
        };

        let result = CommandResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: finish(stdout),
            stderr: finish(stderr),
            timed_out: false,
        };
        log_debug!("[Shell] `{}` exited with {}", spec, result.exit_code);
        Ok(result)
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

// Polls the child until it exits or the deadline passes. `None` means the
// child was killed.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Output of one pipe, filled in by a reader thread as it arrives.
struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
    reader: JoinHandle<()>,
}

impl Capture {
    fn text(&self) -> String {
        Self::text_of(&self.buffer)
    }

    fn text_of(buffer: &Mutex<Vec<u8>>) -> String {
        let bytes = match buffer.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> Capture {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buffer);
    let reader = thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(n) => match sink.lock() {
                    Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                    Err(_) => break,
                },
            }
        }
    });
    Capture { buffer, reader }
}

// Waits for the reader to hit EOF, then returns everything it read.
fn finish(capture: Option<Capture>) -> String {
    capture
        .map(|Capture { buffer, reader }| {
            let _ = reader.join();
            Capture::text_of(&buffer)
        })
        .unwrap_or_default()
}

// Whatever has been read so far. A reader still blocked on a pipe held open
// by a grandchild (e.g. apt under sudo) is left to exit on its own.
fn collect(capture: Option<Capture>) -> String {
    match capture {
        Some(c) if c.reader.is_finished() => finish(Some(c)),
        Some(c) => c.text(),
        None => String::new(),
    }
}

// Gives the readers a moment to pick up output written just before the kill.
fn settle(captures: &[&Option<Capture>]) {
    let deadline = Instant::now() + DRAIN_GRACE;
    while Instant::now() < deadline
        && captures
            .iter()
            .any(|c| c.as_ref().is_some_and(|c| !c.reader.is_finished()))
    {
        thread::sleep(POLL_INTERVAL / 4);
    }
}

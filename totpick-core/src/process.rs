//! External tool invocation
//!
//! Collaborators that answer on stdout (gpg, oathtool, fzf) go through
//! [`run_tool`], which feeds stdin from a separate thread while the output
//! is collected. Clipboard and input tools go through [`run_tool_status`]:
//! wl-copy and xclip leave a child behind that owns the selection, so
//! nothing may wait for their output pipes to close.

use std::io::{self, Write};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};

/// Captured result of an external tool run
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, `None` when the tool was killed by a signal
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Stderr with surrounding whitespace removed, or a generic message
    /// naming the exit status when the tool printed nothing
    pub fn diagnostic(&self, tool: &str) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("{} failed with {}", tool, self.status)
        } else {
            stderr.to_string()
        }
    }
}

fn stdin_for(input: Option<&[u8]>) -> Stdio {
    if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    }
}

/// Write `bytes` and close the pipe
///
/// A tool that exits without reading all of its input is not an error
/// here; its exit status tells what happened.
fn feed(mut stdin: ChildStdin, bytes: &[u8]) -> io::Result<()> {
    match stdin.write_all(bytes) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("Tool closed stdin early");
            Ok(())
        }
        result => result,
    }
}

/// Run `command`, writing `input` to its stdin when given
///
/// Stdout and stderr are captured unless `inherit_stderr` is set, in which
/// case stderr goes to the terminal (fzf draws its UI there).
pub fn run_tool(
    command: &mut Command,
    input: Option<&[u8]>,
    inherit_stderr: bool,
) -> io::Result<ToolOutput> {
    command
        .stdin(stdin_for(input))
        .stdout(Stdio::piped())
        .stderr(if inherit_stderr {
            Stdio::inherit()
        } else {
            Stdio::piped()
        });

    let mut child = command.spawn()?;
    tracing::debug!("Spawned {:?} with PID {}", command.get_program(), child.id());

    let stdin = child.stdin.take();
    let (written, output) = std::thread::scope(|scope| {
        let writer = match (input, stdin) {
            (Some(bytes), Some(pipe)) => Some(scope.spawn(move || feed(pipe, bytes))),
            _ => None,
        };
        let output = child.wait_with_output();
        let written = match writer {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))
            }),
            None => Ok(()),
        };
        (written, output)
    });

    let output = output?;
    // The tool's own verdict wins over a failed write
    if output.status.success() {
        written?;
    }

    Ok(ToolOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run `command` for its exit status only
///
/// Stdout is discarded and stderr is inherited, so diagnostics end up on the
/// terminal or in the launcher log. Returns as soon as the tool itself exits,
/// even when a forked child of it keeps running.
pub fn run_tool_status(command: &mut Command, input: Option<&[u8]>) -> io::Result<ToolOutput> {
    command
        .stdin(stdin_for(input))
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());

    let mut child = command.spawn()?;
    tracing::debug!("Spawned {:?} with PID {}", command.get_program(), child.id());

    let written = match (input, child.stdin.take()) {
        (Some(bytes), Some(pipe)) => feed(pipe, bytes),
        _ => Ok(()),
    };
    let status = child.wait()?;
    if status.success() {
        written?;
    }

    Ok(ToolOutput {
        status,
        stdout: Vec::new(),
        stderr: String::new(),
    })
}

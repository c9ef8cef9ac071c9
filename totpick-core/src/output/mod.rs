//! Code delivery
//!
//! Decides whether the code is printed, copied to the clipboard, typed into
//! the focused window, or both of the latter, and runs the matching tools
//! for Wayland (wl-copy, ydotool) or X11 (xclip, xdotool).

use crate::config::Config;
use crate::error::OutputError;
use crate::process::run_tool_status;
use crate::session::DisplayServer;
use crate::types::TotpToken;
use std::io::Write;
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How the code reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Print the code on stdout
    Stdout,
    /// Clipboard and/or auto-type on a graphical display
    Desktop {
        display: DisplayServer,
        clipboard: bool,
        autopaste: bool,
        delay: Duration,
    },
}

impl Delivery {
    /// Choose the delivery path
    ///
    /// Stdout wins when there is no display, when both clipboard and
    /// autopaste are off, or when printing was requested explicitly.
    pub fn plan(display: Option<DisplayServer>, config: &Config, force_print: bool) -> Self {
        match display {
            Some(display)
                if !force_print && (config.autoclipboard || config.autopaste) =>
            {
                Self::Desktop {
                    display,
                    clipboard: config.autoclipboard,
                    autopaste: config.autopaste,
                    delay: config.autopaste_delay,
                }
            }
            _ => Self::Stdout,
        }
    }

    /// Deliver `token`; `out` receives the code in [`Delivery::Stdout`] mode
    ///
    /// Clipboard and autopaste are attempted independently. Failures are
    /// logged as they happen and reported together afterwards.
    pub fn deliver<W: Write>(&self, token: &TotpToken, out: &mut W) -> Result<(), OutputError> {
        let (display, clipboard, autopaste, delay) = match *self {
            Self::Stdout => {
                writeln!(out, "{}", token.expose())
                    .and_then(|_| out.flush())
                    .map_err(|e| OutputError::Write {
                        message: e.to_string(),
                    })?;
                return Ok(());
            }
            Self::Desktop {
                display,
                clipboard,
                autopaste,
                delay,
            } => (display, clipboard, autopaste, delay),
        };

        let mut failures = Vec::new();

        if clipboard {
            match copy_to_clipboard(display, token) {
                Ok(()) => info!("Code copied to clipboard"),
                Err(e) => {
                    warn!("Clipboard copy failed: {}", e);
                    failures.push(e.to_string());
                }
            }
        }

        if autopaste {
            match type_code(display, token, delay) {
                Ok(()) => info!("Code typed into focused window"),
                Err(e) => {
                    warn!("Autopaste failed: {}", e);
                    failures.push(e.to_string());
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(OutputError::Delivery(failures))
        }
    }
}

/// Clipboard tool reading the code from stdin
pub fn clipboard_command(display: DisplayServer) -> Command {
    match display {
        DisplayServer::Wayland => Command::new("wl-copy"),
        DisplayServer::X11 => {
            let mut command = Command::new("xclip");
            command.args(["-selection", "clipboard"]);
            command
        }
    }
}

/// Input simulator command typing `text`
pub fn type_command(display: DisplayServer, text: &str) -> Command {
    let mut command = match display {
        DisplayServer::Wayland => Command::new("ydotool"),
        DisplayServer::X11 => Command::new("xdotool"),
    };
    command.arg("type").arg(text);
    command
}

/// Input simulator command pressing Enter
pub fn enter_command(display: DisplayServer) -> Command {
    match display {
        DisplayServer::Wayland => {
            // KEY_ENTER (28) down, then up
            let mut command = Command::new("ydotool");
            command.args(["key", "28:1", "28:0"]);
            command
        }
        DisplayServer::X11 => {
            let mut command = Command::new("xdotool");
            command.args(["key", "Return"]);
            command
        }
    }
}

fn run_checked(mut command: Command, input: Option<&[u8]>) -> Result<(), OutputError> {
    let tool = command.get_program().to_string_lossy().to_string();
    let output = run_tool_status(&mut command, input).map_err(|e| OutputError::Spawn {
        tool: tool.clone(),
        message: e.to_string(),
    })?;

    if output.success() {
        Ok(())
    } else {
        Err(OutputError::ToolFailed {
            message: output.diagnostic(&tool),
            code: output.code(),
            tool,
        })
    }
}

fn copy_to_clipboard(display: DisplayServer, token: &TotpToken) -> Result<(), OutputError> {
    let command = clipboard_command(display);
    debug!("Copying code with {:?}", command.get_program());
    run_checked(command, Some(token.expose().as_bytes()))
}

fn type_code(display: DisplayServer, token: &TotpToken, delay: Duration) -> Result<(), OutputError> {
    run_checked(type_command(display, token.expose()), None)?;
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
    run_checked(enter_command(display), None)
}

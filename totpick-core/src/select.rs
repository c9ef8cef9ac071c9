//! Entry selection through fzf

use crate::error::SelectError;
use crate::process::run_tool;
use std::process::Command;

pub const FZF: &str = "fzf";

/// Turn raw picker output into an entry name
///
/// Only the trailing newline is stripped; entry names may legitimately
/// contain inner or leading spaces.
pub fn normalize_selection(raw: &str) -> Result<String, SelectError> {
    let name = raw.trim_end_matches(['\n', '\r']);
    if name.trim().is_empty() {
        Err(SelectError::EmptyName)
    } else {
        Ok(name.to_string())
    }
}

/// Let the user pick one of `names` with fzf
///
/// A cancelled picker (non-zero exit, 130 on Esc) is reported with fzf's
/// exit code.
pub fn pick(names: &[String]) -> Result<String, SelectError> {
    let mut input = names.join("\n");
    input.push('\n');

    let output = run_tool(
        Command::new(FZF).args(["--prompt", "totp> ", "--no-multi"]),
        Some(input.as_bytes()),
        true,
    )
    .map_err(|e| SelectError::Spawn {
        tool: FZF.to_string(),
        message: e.to_string(),
    })?;

    if !output.success() {
        return Err(SelectError::Picker {
            code: output.code(),
        });
    }

    normalize_selection(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_selection() {
        assert_eq!(normalize_selection("github\n").unwrap(), "github");
        assert_eq!(normalize_selection("My Bank\r\n").unwrap(), "My Bank");
        assert_eq!(normalize_selection("\n"), Err(SelectError::EmptyName));
        assert_eq!(normalize_selection(""), Err(SelectError::EmptyName));
    }
}

//! `--check`: report the resolved configuration and which external tools
//! are installed.

use colored::Colorize;
use totpick_core::config::env_file::load_config;
use totpick_core::config::Overrides;
use totpick_core::error::TotpickError;
use totpick_core::otp::Generator;
use totpick_core::session::{DisplayServer, Session};

use crate::daemon::launcher_log_path;

/// External tools and what they are needed for
const TOOLS: &[(&str, &str)] = &[
    ("gpg", "decrypting the secret store"),
    ("oathtool", "generating codes (built-in fallback otherwise)"),
    ("fzf", "picking entries in a terminal"),
    ("rofi", "picking entries on the desktop"),
    ("wl-copy", "clipboard on Wayland"),
    ("ydotool", "autopaste on Wayland"),
    ("xclip", "clipboard on X11"),
    ("xdotool", "autopaste on X11"),
];

fn mark(ok: bool) -> colored::ColoredString {
    if ok {
        "✓".green()
    } else {
        "✗".red()
    }
}

pub fn run_check(overrides: &Overrides) -> Result<(), TotpickError> {
    let config = load_config(overrides)?;
    let session = Session::detect();

    println!("{}", "Configuration".bold());
    println!("  config dir:    {}", config.config_dir.display());
    println!(
        "  secret store:  {} {}",
        mark(config.store_path.is_file()),
        config.store_path.display()
    );
    println!(
        "  encryption:    {}",
        if config.encryption { "gpg" } else { "disabled" }
    );
    println!("  name cache:    {}", config.cache_dir.display());
    println!("  launcher log:  {}", launcher_log_path(&config).display());
    println!("  generator:     {:?}", Generator::resolve(config.generator));

    let display = match session.display {
        Some(DisplayServer::Wayland) => "Wayland",
        Some(DisplayServer::X11) => "X11",
        None => "none (codes are printed)",
    };
    println!("  display:       {}", display);
    println!(
        "  clipboard:     {}   autopaste: {} (delay {:?})",
        config.autoclipboard, config.autopaste, config.autopaste_delay
    );

    println!();
    println!("{}", "External tools".bold());
    for (tool, purpose) in TOOLS {
        let found = which::which(tool);
        let location = match &found {
            Ok(path) => path.display().to_string(),
            Err(_) => "not found".dimmed().to_string(),
        };
        println!("  {} {:<9} {:<48} {}", mark(found.is_ok()), tool, purpose, location);
    }

    Ok(())
}

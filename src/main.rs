//! totpick - TOTP picker for the terminal and the desktop
//!
//! Reads TOTP secrets from a GPG-encrypted JSON store and delivers the
//! current code by typing it, copying it, or printing it.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use totpick_core::config::{parse_delay, GeneratorChoice, Overrides};
use totpick_core::error::{StoreError, TotpickError};
use totpick_core::init_logging;
use tracing::level_filters::LevelFilter;

mod cli;
mod daemon;

#[derive(Parser)]
#[command(name = "totpick", version, disable_help_flag = true)]
struct Cli {
    /// Entry to generate a code for
    name: Option<String>,

    /// Print usage and configuration help
    #[arg(short, long)]
    help: bool,

    /// Print entry names, one per line
    #[arg(long)]
    list: bool,

    /// Remove all cached name lists
    #[arg(long)]
    clear_cache: bool,

    /// Report which external tools are available
    #[arg(long)]
    check: bool,

    /// Print the code instead of copying or typing it
    #[arg(short, long)]
    print: bool,

    /// Copy the code to the clipboard
    #[arg(long, conflicts_with = "no_clipboard")]
    clipboard: bool,

    /// Do not copy the code to the clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Type the code into the focused window
    #[arg(long, conflicts_with = "no_autopaste")]
    autopaste: bool,

    /// Do not type the code
    #[arg(long)]
    no_autopaste: bool,

    /// Seconds to wait between typing the code and pressing Enter
    #[arg(long, value_name = "SECONDS", value_parser = parse_delay_arg)]
    delay: Option<Duration>,

    /// Secret store to read instead of the configured one
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Treat the secret store as plaintext JSON
    #[arg(long)]
    no_encryption: bool,

    /// TOTP backend: auto, oathtool or builtin
    #[arg(long, value_name = "NAME", value_parser = parse_generator_arg)]
    generator: Option<GeneratorChoice>,

    /// Log debug information to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_delay_arg(value: &str) -> Result<Duration, String> {
    parse_delay(value).map_err(|e| e.to_string())
}

fn parse_generator_arg(value: &str) -> Result<GeneratorChoice, String> {
    value.parse().map_err(|e: totpick_core::error::ConfigError| e.to_string())
}

/// `--flag` / `--no-flag` pair to an optional override
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            store_path: self.file.clone(),
            no_encryption: self.no_encryption,
            autopaste: switch(self.autopaste, self.no_autopaste),
            autoclipboard: switch(self.clipboard, self.no_clipboard),
            autopaste_delay: self.delay,
            generator: self.generator,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.help {
        eprint!("{}", cli::help::usage());
        std::process::exit(0);
    }

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let overrides = cli.overrides();
    let result = if cli.check {
        cli::check::run_check(&overrides)
    } else {
        cli::run::run(cli::run::RunOptions {
            name: cli.name,
            list: cli.list,
            clear_cache: cli.clear_cache,
            print: cli.print,
            overrides,
        })
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{}", e);
            if matches!(e, TotpickError::Store(StoreError::NotFound { .. })) {
                eprintln!();
                eprint!("{}", cli::help::usage());
            }
            std::process::exit(e.exit_code());
        }
    }
}

//! Main command implementation
//!
//! Resolves which entry to use, generates its code and delivers it. Also
//! serves rofi's script mode: the first call lists names, the second one
//! detaches and delivers the chosen code in the background.

use crate::daemon;
use std::io::{self, IsTerminal, Write};
use totpick_core::config::env_file::load_config;
use totpick_core::config::{Config, Overrides};
use totpick_core::error::{SelectError, TotpickError};
use totpick_core::otp::Generator;
use totpick_core::output::Delivery;
use totpick_core::select;
use totpick_core::session::Session;
use totpick_core::store::{NameCache, SecretStore};
use tracing::{debug, error, info};

/// What the user asked for on the command line
pub struct RunOptions {
    pub name: Option<String>,
    pub list: bool,
    pub clear_cache: bool,
    pub print: bool,
    pub overrides: Overrides,
}

/// Run the main command
pub fn run(options: RunOptions) -> Result<(), TotpickError> {
    let config = load_config(&options.overrides)?;
    let session = Session::detect();
    let store = SecretStore::from_config(&config);
    let cache = NameCache::new(config.cache_dir.clone(), config.cache_limit);
    debug!("Session: {:?}", session);

    if options.clear_cache {
        let removed = cache.clear()?;
        eprintln!("Removed {} cached name list(s)", removed);
        return Ok(());
    }

    store.ensure_exists()?;

    if options.list || (session.launcher && options.name.is_none()) {
        return list_names(&cache, &store);
    }

    if session.launcher {
        let name = non_empty(options.name)?;
        daemon::detach(&config)?;

        // Only the detached child gets here
        info!("Delivering code for {:?} from launcher", name);
        return deliver_named(&config, &store, session, &name, options.print).map_err(|e| {
            error!("Launcher delivery for {:?} failed: {}", name, e);
            e
        });
    }

    let name = match options.name {
        Some(name) => non_empty(Some(name))?,
        None => {
            if !io::stdin().is_terminal() {
                return Err(SelectError::EmptyName.into());
            }
            let names = cache.names(&store)?;
            select::pick(&names)?
        }
    };

    deliver_named(&config, &store, session, &name, options.print)
}

fn non_empty(name: Option<String>) -> Result<String, SelectError> {
    name.filter(|n| !n.trim().is_empty())
        .ok_or(SelectError::EmptyName)
}

/// Print the cached entry names, one per line
fn list_names(cache: &NameCache, store: &SecretStore) -> Result<(), TotpickError> {
    let names = cache.names(store)?;
    let mut out = io::stdout().lock();
    for name in &names {
        writeln!(out, "{}", name)?;
    }
    out.flush()?;
    Ok(())
}

fn deliver_named(
    config: &Config,
    store: &SecretStore,
    session: Session,
    name: &str,
    print: bool,
) -> Result<(), TotpickError> {
    let entry = store.open()?.entry(name)?;
    let generator = Generator::resolve(config.generator);
    debug!("Generating code for {:?} with {:?}", entry.name, generator);
    let token = generator.generate(&entry)?;

    let delivery = Delivery::plan(session.display, config, print);
    debug!("Delivery: {:?}", delivery);
    delivery.deliver(&token, &mut io::stdout().lock())?;
    Ok(())
}

mod boundary;
mod config;
mod crud;
mod error;
mod export;
mod logging;
mod models;
mod notify;
mod routes;
mod run;
mod session;
mod store;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::Config;
use crate::session::{AuthContext, FileStorage, MemoryStorage, TokenStorage};

fn main() -> Result<()> {
    let cli = run::Cli::parse();
    let config = Config::load_from(cli.config.clone()).context("Failed to load configuration")?;

    let log_path = config.log_path()?;
    logging::init_logging(&config.logging.level, &log_path)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "fleetui starting");

    let mut auth = AuthContext::new(session_storage(&config, cli.ephemeral)?);
    auth.init();
    let store = store::Store::seeded();

    match cli.command {
        None => {
            let today = chrono::Local::now().date_naive();
            let app = ui::app::App::new(auth, store, &config.ui, today);
            run::as_tui(app, config.ui.tick())
        }
        Some(command) => run::as_cli(command, &mut auth, &store),
    }
}

fn session_storage(config: &Config, ephemeral: bool) -> Result<Box<dyn TokenStorage>> {
    if ephemeral || config.session.ephemeral {
        return Ok(Box::new(MemoryStorage::default()));
    }
    let dir = config
        .session_dir()
        .context("Could not determine session directory")?;
    Ok(Box::new(FileStorage::new(dir)))
}

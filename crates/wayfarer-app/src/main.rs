//! Wayfarer interactive shell.
//!
//! Drives the navigation core through a line-oriented command shell and a
//! simulated viewport. Type `help` for the command list, `quit` (or end of
//! input) to save and exit.
//!
//! The config file path comes from the first CLI argument, then the
//! `WAYFARER_CONFIG` env var, then `wayfarer.toml` in the working directory.

mod commands;
mod render;
mod shell;
mod sim_viewport;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use wayfarer_blob::{BlobStore, DirBlobStore, MemoryBlobStore};
use wayfarer_nav::{BrowserController, Toolbar};
use wayfarer_types::config::BrowserConfig;

use commands::register_builtins;
use render::toolbar_line;
use shell::{CommandOutput, CommandRegistry, Session};
use sim_viewport::SimulatedViewport;

const DEFAULT_CONFIG_FILE: &str = "wayfarer.toml";

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WAYFARER_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string())
        .into()
}

fn open_store(config: &BrowserConfig) -> Result<Arc<dyn BlobStore>> {
    match &config.storage_dir {
        Some(dir) => {
            let store = DirBlobStore::open(dir)
                .with_context(|| format!("opening storage directory {}", dir.display()))?;
            log::info!("Persisting navigation state under {}", dir.display());
            Ok(Arc::new(store))
        },
        None => {
            log::info!("No storage_dir configured, navigation state lives in memory");
            Ok(Arc::new(MemoryBlobStore::new()))
        },
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = config_path();
    let config = BrowserConfig::load(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    log::info!(
        "Starting Wayfarer (home {}, address tracking {:?})",
        config.home_url,
        config.address_tracking,
    );

    let store = open_store(&config)?;
    let mut controller = BrowserController::open(&config, store, SimulatedViewport::new());
    controller.load_committed();
    let mut session = Session::new(controller);
    session.pump_events();

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);
    log::debug!(
        "Registered commands: {}",
        registry.names().collect::<Vec<_>>().join(", ")
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut drawn_revision = None;
    let mut line = String::new();

    loop {
        let revision = session.controller.revision();
        if drawn_revision != Some(revision) {
            writeln!(stdout, "{}", toolbar_line(&Toolbar::from_state(session.controller.state())))?;
            drawn_revision = Some(revision);
        }
        write!(stdout, "wayfarer> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            break;
        }

        match registry.execute(&line, &mut session) {
            Ok(CommandOutput::Text(text)) => writeln!(stdout, "{text}")?,
            Ok(CommandOutput::None) => {},
            Ok(CommandOutput::Quit) => break,
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
    }

    log::info!("Shutting down");
    session.controller.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_uses_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = BrowserConfig {
            storage_dir: Some(dir.path().join("state")),
            ..BrowserConfig::default()
        };
        let store = open_store(&config).unwrap();
        store.set("k", b"v").unwrap();
        assert!(dir.path().join("state").join("k").exists());
    }

    #[test]
    fn open_store_defaults_to_memory() {
        let store = open_store(&BrowserConfig::default()).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}

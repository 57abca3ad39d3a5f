pub mod cli;
pub mod core;
pub mod store;

use crate::cli::form::Form;
use crate::cli::{interactive, report};
use crate::core::config::AppConfig;
use crate::core::{FormFields, PersistenceAdapter, compute};
use crate::store::KeyValueStore;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Name of the store collection holding the saved form.
pub const COLLECTION: &str = "gainrange";

pub enum AppCommand {
    Calc { fields: FormFields, json: bool },
    Save { fields: FormFields },
    Load { fields: FormFields },
    Clear { purge: bool },
    Interactive,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Opens the configured store and wraps its collection for saving the form.
pub fn open_adapter(config: &AppConfig) -> Result<PersistenceAdapter> {
    let store = if config.persist {
        KeyValueStore::open(&config.store_dir()?)?
    } else {
        KeyValueStore::in_memory()
    };
    let collection = store.collection(COLLECTION)?;
    let adapter = PersistenceAdapter::new(collection, config.storage_key.clone());
    debug!(
        persistent = store.is_persistent(),
        key = adapter.key(),
        "Opened saved values store"
    );
    Ok(adapter)
}

/// Runs `command` against the terminal.
pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    execute(command, config_path, stdin.lock(), &mut stdout.lock())
}

/// Runs `command`, reading session input from `input` and writing all
/// results to `out`.
pub fn execute<R: BufRead, W: Write>(
    command: AppCommand,
    config_path: Option<&str>,
    input: R,
    out: &mut W,
) -> Result<()> {
    info!("Gain calculator starting...");

    match command {
        AppCommand::Calc { fields, json } => {
            let output = compute(&fields.to_input());
            if json {
                writeln!(out, "{}", report::render_json(&output)?)?;
            } else {
                writeln!(out, "{}", report::render_table(&output, fields.annualize))?;
            }
        }
        AppCommand::Save { fields } => {
            let config = load_config(config_path)?;
            let mut form = Form::with_fields(open_adapter(&config)?, fields);
            form.save()?;
            writeln!(out, "{}", form.render())?;
        }
        AppCommand::Load { fields } => {
            let config = load_config(config_path)?;
            let mut form = Form::with_fields(open_adapter(&config)?, fields);
            form.load();
            writeln!(out, "{}", form.render())?;
        }
        AppCommand::Clear { purge } => {
            let config = load_config(config_path)?;
            let mut form = Form::new(open_adapter(&config)?);
            if purge {
                let removed = form.forget()?;
                let message = if removed {
                    "Saved values removed."
                } else {
                    "Nothing saved yet on this device."
                };
                writeln!(out, "{message}")?;
            }
            form.clear();
            writeln!(out, "{}", form.render())?;
        }
        AppCommand::Interactive => {
            let config = load_config(config_path)?;
            let mut form = Form::new(open_adapter(&config)?);
            interactive::run(&mut form, input, out)?;
        }
    }
    Ok(())
}

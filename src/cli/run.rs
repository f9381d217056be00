use crate::cli::require_config_path;
use crate::config::{load_config, Config, ConfigError};
use crate::notify::{SmtpNotifier, StdoutNotifier};
use crate::pipeline::{RunError, RunOutcome, Runner};
use crate::source::CommandLogSource;
use crate::storage::CheckpointStore;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Run(#[from] RunError),
}

pub fn run(config_path: Option<PathBuf>, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = require_config_path(config_path);

    run_once(&config_path, dry_run)?;
    Ok(())
}

fn run_once(config_path: &Path, dry_run: bool) -> Result<RunOutcome, CommandError> {
    info!(config_path = %config_path.display(), "Loading configuration");
    let config = load_config(config_path)?;

    Ok(execute(&config, dry_run)?)
}

/// Wire the production log source and notifier from `config` and run once.
pub fn execute(config: &Config, dry_run: bool) -> Result<RunOutcome, RunError> {
    let store = CheckpointStore::new(&config.checkpoint.path);
    let source = CommandLogSource::from_config(&config.source);
    let smtp = SmtpNotifier::from_config(&config.mail)?;

    if dry_run {
        let notifier = StdoutNotifier::new(&config.mail.to, smtp.subject());
        Runner::new(store, source, notifier).dry_run(true).run()
    } else {
        Runner::new(store, source, smtp).run()
    }
}

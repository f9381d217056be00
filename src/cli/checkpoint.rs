use crate::cli::require_config_path;
use crate::config::load_config;
use crate::storage::{current_utc_offset, CheckpointStore};
use std::path::PathBuf;

fn store_for(config_path: Option<PathBuf>) -> Result<CheckpointStore, Box<dyn std::error::Error>> {
    let config = load_config(&require_config_path(config_path))?;
    Ok(CheckpointStore::new(config.checkpoint.path))
}

pub fn show(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let store = store_for(config_path)?;

    println!("path:       {}", store.path().display());
    match store.read() {
        Some(checkpoint) => {
            println!("checkpoint: {}", checkpoint);
            println!(
                "query from: {} (UTC)",
                checkpoint.to_query_timestamp(current_utc_offset())
            );
        }
        None => println!("checkpoint: none (next run sends the latest events)"),
    }
    Ok(())
}

pub fn clear(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let store = store_for(config_path)?;

    if store.clear()? {
        println!("Removed checkpoint {}", store.path().display());
    } else {
        println!("No checkpoint at {}", store.path().display());
    }
    Ok(())
}

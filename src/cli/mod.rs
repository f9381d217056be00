pub mod checkpoint;
pub mod config;
pub mod run;

use std::path::PathBuf;

/// Return the resolved config path, or print where we looked and exit.
pub(crate) fn require_config_path(config_path: Option<PathBuf>) -> PathBuf {
    match config_path {
        Some(path) => path,
        None => {
            eprintln!("Error: config not found");
            eprintln!("Searched locations:");
            for location in crate::config::default_config_locations() {
                eprintln!("  {}", location.display());
            }
            eprintln!("\nUse --config <path> to specify a config file, or run 'eventmail config init' to generate one.");
            std::process::exit(1);
        }
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eventmail")]
#[command(about = "Mail new event-log entries to an operator", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send events logged since the last run (default)
    Run {
        /// Print the mail instead of sending it and keep the checkpoint
        #[arg(long)]
        dry_run: bool,
    },
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    Checkpoint {
        #[command(subcommand)]
        action: CheckpointAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a starter config file
    Init {
        #[arg(long)]
        stdout: bool,
    },
    /// Check that the config file loads
    Validate,
}

#[derive(Subcommand)]
enum CheckpointAction {
    /// Print the stored checkpoint
    Show,
    /// Remove the checkpoint so the next run sends the latest events
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventmail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = eventmail::config::resolve_config_path(cli.config.as_deref());

    match cli.command {
        // Schedulers invoke the binary without arguments
        None => eventmail::cli::run::run(config_path, false)?,
        Some(Commands::Run { dry_run }) => eventmail::cli::run::run(config_path, dry_run)?,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { stdout } => eventmail::cli::config::init(stdout)?,
            ConfigAction::Validate => eventmail::cli::config::validate(config_path)?,
        },
        Some(Commands::Checkpoint { action }) => match action {
            CheckpointAction::Show => eventmail::cli::checkpoint::show(config_path)?,
            CheckpointAction::Clear => eventmail::cli::checkpoint::clear(config_path)?,
        },
    }

    Ok(())
}

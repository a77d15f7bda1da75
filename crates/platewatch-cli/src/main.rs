use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use platewatch_application::StateTracker;
use platewatch_core::Label;
use platewatch_infrastructure::{ConfigService, PlateWatchPaths};

mod bootstrap;
mod command;
mod logging;
mod render;
mod repl;

use bootstrap::StoreOverrides;

#[derive(Parser)]
#[command(name = "platewatch", version)]
#[command(about = "Plate Watch - keep track of the U.S. states whose licence plates you have spotted", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// States file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Keep progress in memory only (nothing is saved)
    #[arg(long, global = true)]
    memory: bool,

    /// Log filter, e.g. "debug" or "platewatch_application=trace"
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Runs the interactive session when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every state, seen ones last
    List {
        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a state as seen
    See {
        #[arg(required = true, num_args = 1.., value_name = "STATE")]
        state: Vec<String>,
    },
    /// Move a state back to the unseen list
    Unsee {
        #[arg(required = true, num_args = 1.., value_name = "STATE")]
        state: Vec<String>,
    },
    /// Clear all progress
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = resolve_paths(cli.config.as_deref());
    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(&paths)?,
    };
    let config = config_service.get_config()?;

    let _log_guard = logging::init(&config.logging, cli.log_level.as_deref(), &paths)?;
    tracing::info!("[Main] Config loaded from {:?}", config_service.path());

    let overrides = StoreOverrides {
        path: cli.store.clone(),
        memory: cli.memory,
    };
    let tracker = bootstrap::build_tracker(&overrides, &config, &paths).await?;

    match cli.command {
        None => repl::run(&tracker).await?,
        Some(command) => run_command(&tracker, command).await?,
    }

    Ok(())
}

async fn run_command(tracker: &StateTracker, command: Commands) -> Result<()> {
    match command {
        Commands::List { json } => {
            let model = tracker.ui_model();
            if json {
                println!("{}", render::render_json(&model)?);
            } else {
                print!("{}", render::render_model(&model));
            }
            return Ok(());
        }
        Commands::See { state } => tracker.mark_viewed(resolve_label(&state)?).await?,
        Commands::Unsee { state } => tracker.mark_unviewed(resolve_label(&state)?).await?,
        Commands::Reset => tracker.reset().await?,
    }

    print!("{}", render::render_progress(&tracker.ui_model()));
    println!();
    Ok(())
}

/// With `--config`, the default states file and logs sit next to that
/// config file instead of in the platform config directory.
fn resolve_paths(config: Option<&Path>) -> PlateWatchPaths {
    match config {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            PlateWatchPaths::new(Some(dir.to_path_buf()))
        }
        None => PlateWatchPaths::new(None),
    }
}

/// Joins the words of a state name and matches it ignoring case.
fn resolve_label(words: &[String]) -> Result<Label> {
    let name = words.join(" ");
    Label::find(&name).ok_or_else(|| platewatch_core::PlateWatchError::invalid_label(name).into())
}

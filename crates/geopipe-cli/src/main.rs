mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "geopipe",
    about = "Replay editing sessions of actions over GeoJSON feature collections",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from geopipe.yaml or .git/)
    #[arg(long, global = true, env = "GEOPIPE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a session script and print the actions, outcomes and state
    Run {
        /// Session script (YAML)
        script: PathBuf,

        /// Dataset to load instead of the script's `data`
        #[arg(long)]
        data: Option<PathBuf>,

        /// Write the final feature collection to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List the preset actions
    Presets,

    /// List the action kinds that have a handler
    Kinds,

    /// Show or validate geopipe.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Run { script, data, out } => {
            cmd::run::run(&root, &script, data.as_deref(), out.as_deref(), cli.json)
        }
        Commands::Presets => cmd::presets::run(&root, cli.json),
        Commands::Kinds => cmd::kinds::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

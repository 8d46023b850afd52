use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mindsage")]
#[command(about = "MindSage CLI - session client for the MindSage therapy service", long_about = None)]
struct Cli {
    /// Raise the default log level to debug
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.config/mindsage/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Network name (`ic` for production, anything else for development)
    #[arg(long, global = true)]
    network: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration
    Config {
        /// Write the resolved configuration to the config file
        #[arg(long)]
        init: bool,
    },
    /// Build an anonymous channel and report trust and bind outcome
    Probe,
    /// Restore the persisted session and print its state
    Status,
    /// Store a credential and sign in with it
    Login {
        #[arg(long)]
        principal: String,
        #[arg(long)]
        token: String,
    },
    /// Sign out and remove the stored credential
    Logout,
    /// Register the signed-in principal under a username
    Register { username: String },
    /// List completed therapy sessions
    History,
    /// Print the progress report
    Report,
    /// Ask for a CBT reflection on a thought
    Reflect { thought: String },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = commands::GlobalOptions {
        config_path: cli.config,
        network: cli.network,
    };

    match cli.command {
        Commands::Config { init } => commands::config::run(&options, init)?,
        Commands::Probe => commands::probe::run(&options).await?,
        Commands::Status => commands::session::status(&options).await?,
        Commands::Login { principal, token } => {
            commands::session::login(&options, principal, token).await?
        }
        Commands::Logout => commands::session::logout(&options).await?,
        Commands::Register { username } => commands::therapy::register(&options, &username).await?,
        Commands::History => commands::therapy::history(&options).await?,
        Commands::Report => commands::therapy::report(&options).await?,
        Commands::Reflect { thought } => commands::therapy::reflect(&options, &thought).await?,
    }

    Ok(())
}

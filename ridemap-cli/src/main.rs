//! Ridemap CLI - command-line harness
//!
//! Probes the map controller against the simulated engine, manages the
//! config file, lists mock rides, tries a login and runs the echo relay.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::probe::ProbeArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "ridemap", version, about = "Map availability controller harness")]
struct Cli {
    /// Enable debug logging for ridemap targets
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Mount a map on the simulated engine and print what the host would see
    Probe(ProbeArgs),

    /// View or edit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List mock rides or nearby providers
    Rides {
        /// List providers instead of rides
        #[arg(long)]
        providers: bool,

        /// Override the mock API delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Log in against the configured API and show the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Run the WebSocket echo relay until Ctrl+C
    Relay {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Probe(args) => commands::probe::run(args, cli.verbose),
        Commands::Config { command } => commands::config::run(command),
        Commands::Rides {
            providers,
            delay_ms,
        } => commands::rides::run(providers, delay_ms, cli.verbose),
        Commands::Login { email, password } => commands::login::run(email, password, cli.verbose),
        Commands::Relay { port } => commands::relay::run(port, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("{} {}", console::style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

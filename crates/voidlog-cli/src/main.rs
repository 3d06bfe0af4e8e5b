use clap::{Parser, Subcommand};
use voidlog_core::Config;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "voidlog", version, about = "voidlog streak tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current streak as JSON
    Status,
    /// End the current streak and start a new one
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// List past streaks, newest first
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the running streak, refreshed every tick
    Watch {
        /// Stop after this many ticks
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        ticks: Option<u64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    // Tracing is configured from the config file, so a load failure is
    // reported directly.
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: config unreadable ({e}); using defaults");
            Config::default()
        }
    };
    common::init_tracing(&config);

    let result = match cli.command {
        Commands::Status => commands::status::run(&config),
        Commands::Reset { yes } => commands::reset::run(&config, yes),
        Commands::History { json } => commands::history::run(&config, json),
        Commands::Watch { ticks } => commands::watch::run(&config, ticks),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

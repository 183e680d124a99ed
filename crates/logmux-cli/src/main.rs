//! logmux CLI
//!
//! Drive a logger from the command line: emit records through the
//! configured handlers, or inspect how a configuration filters domains.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "logmux")]
#[command(about = "logmux - domain-filtered logging with rotating files", long_about = None)]
struct Cli {
    /// Print logmux's own diagnostics to stderr
    #[arg(long, global = true)]
    diagnostics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Emit records through a logger
    Emit(commands::emit::EmitArgs),
    /// Show the effective level mask of domains
    Levels(commands::levels::LevelsArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.diagnostics {
        logmux_logging::init(logmux_logging::Profile::Development);
    }

    let result = match cli.command {
        Commands::Emit(args) => commands::emit::execute(args),
        Commands::Levels(args) => commands::levels::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

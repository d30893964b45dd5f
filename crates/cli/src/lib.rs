//! sqlchat: ask questions about a SQL database in plain language.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
pub use {bootstrap::GroqBootstrap, config::Config, repl::ChatRepl, terminal::Terminal};

mod bootstrap;
pub mod config;
pub mod repl;
pub mod sidebar;
mod terminal;

/// sqlchat CLI
#[derive(Debug, Parser)]
#[command(name = "sqlchat", version, about)]
pub struct App {
    /// Verbosity level (use -v, -vv, -vvv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run, chat when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with a database
    Chat,

    /// Write the default configuration file
    Generate,
}

impl App {
    /// Initialize tracing subscriber based on verbosity
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(directive(self.verbose)));

        fmt()
            .without_time()
            .with_env_filter(filter)
            .with_target(self.verbose != 0)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Log filter for a `-v` count.
pub fn directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "sqlchat=debug",
        2 => "sqlchat=trace",
        3 => "debug",
        _ => "trace",
    }
}

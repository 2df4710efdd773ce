//! Command line interface for `gramcheckd`.
//!
//! This module contains everything needed to build and execute the binary's
//! subcommands; it mirrors the HTTP surface (one subcommand per major
//! capability) rather than wrapping it.

mod check;
mod languages;
mod ping;
mod serve;

use std::io::{self, BufRead};

use clap::{CommandFactory, Parser, Subcommand};

use crate::{config::Config, error::Result};

/// Read lines from standard input into `buffer`.
fn read_from_stdin(buffer: &mut String) -> Result<()> {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    loop {
        let n = lock.read_line(buffer)?;
        if n == 0 {
            break;
        }
    }
    Ok(())
}

/// Main command line structure. Contains every subcommand.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Multilingual grammar correction: rule-based checks, LLM-assisted rewriting.",
    propagate_version(true),
    subcommand_required(true)
)]
pub struct Cli {
    /// Logging verbosity, e.g. `error`, `warn`, `info`, `debug`, `trace`.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    /// Subcommand.
    #[command(subcommand)]
    #[allow(missing_docs)]
    pub command: Command,
}

/// All possible subcommands.
#[derive(Subcommand, Debug)]
#[allow(missing_docs)]
pub enum Command {
    /// Check a piece of text and print the correction result.
    Check(check::Command),
    /// Run the HTTP server.
    Serve(serve::Command),
    /// List supported languages.
    #[clap(visible_alias = "lang")]
    Languages(languages::Command),
    /// Probe both backends and report availability.
    Ping(ping::Command),
}

/// Common interface implemented by every subcommand.
trait ExecuteSubcommand {
    /// Executes the subcommand against the loaded configuration.
    async fn execute(self, config: Config) -> Result<()>;
}

impl Cli {
    /// Execute the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        let config = Config::from_env();

        match self.command {
            Command::Check(cmd) => cmd.execute(config).await,
            Command::Serve(cmd) => cmd.execute(config).await,
            Command::Languages(cmd) => cmd.execute(config).await,
            Command::Ping(cmd) => cmd.execute(config).await,
        }
    }
}

/// Build a command from the top-level command line structure, for
/// completion generation and documentation tooling.
#[must_use]
pub fn build_cli() -> clap::Command {
    Cli::command()
}

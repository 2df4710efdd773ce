//! List supported languages.

use clap::Parser;

use crate::{config::Config, error::Result, languages};

use super::ExecuteSubcommand;

#[derive(Debug, Parser)]
pub struct Command {}

impl ExecuteSubcommand for Command {
    async fn execute(self, _config: Config) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(languages::all())?);
        Ok(())
    }
}

//! Probe both backends and report availability.

use clap::Parser;

use crate::{
    backends::{ModelClient, RuleClient},
    config::Config,
    error::Result,
    pipeline::Pipeline,
};

use super::ExecuteSubcommand;

#[derive(Debug, Parser)]
pub struct Command {}

impl ExecuteSubcommand for Command {
    async fn execute(self, config: Config) -> Result<()> {
        let rule_backend = RuleClient::new(&config.rule_backend);
        let model_backend = ModelClient::new(&config.model_backend);
        let pipeline = Pipeline::new(rule_backend, model_backend);

        let status = pipeline.check_services().await;
        println!("{}", serde_json::to_string_pretty(&status)?);

        if !status.pipeline_ready {
            std::process::exit(1);
        }
        Ok(())
    }
}

//! Check a piece of text locally, without starting the HTTP server.
//!
//! Input is either `--text TEXT` or, if omitted, raw text read from
//! `stdin`.

use clap::Parser;

use crate::{
    backends::{ModelClient, RuleClient},
    core::{CheckRequest, Mode},
    error::Result,
    languages::Tone,
    pipeline::Pipeline,
};

use super::ExecuteSubcommand;

#[derive(Debug, Parser)]
pub struct Command {
    /// Text to check; read from stdin if omitted.
    #[clap(long)]
    pub text: Option<String>,
    /// Language code.
    #[clap(long, default_value = "nl")]
    pub language: String,
    /// Correction mode.
    #[clap(long, value_enum, default_value = "strict")]
    pub mode: ModeArg,
    /// Requested rewrite tone, consulted only in `style` mode.
    #[clap(long, default_value = "neutral")]
    pub tone: String,
    /// Print raw JSON instead of a human-readable summary.
    #[clap(long)]
    pub raw: bool,
}

/// CLI-friendly mirror of [`Mode`], since `clap::ValueEnum` needs a type we
/// own.
#[derive(Clone, Debug, clap::ValueEnum)]
pub enum ModeArg {
    /// Fixes only.
    Strict,
    /// Fixes plus rewrites.
    Style,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Strict => Mode::Strict,
            ModeArg::Style => Mode::Style,
        }
    }
}

impl ExecuteSubcommand for Command {
    async fn execute(self, config: crate::config::Config) -> Result<()> {
        let text = match self.text {
            Some(text) => text,
            None => {
                let mut buffer = String::new();
                super::read_from_stdin(&mut buffer)?;
                buffer
            },
        };

        let request = CheckRequest::new(text)
            .with_language(self.language)
            .with_mode(self.mode.into())
            .with_tone(self.tone.parse::<Tone>().unwrap_or_default());

        let rule_backend = RuleClient::new(&config.rule_backend);
        let model_backend = ModelClient::new(&config.model_backend);
        let pipeline = Pipeline::new(rule_backend, model_backend);

        let response = pipeline.process(&request).await;

        if self.raw {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", response.corrected_text);
            if !response.issues.is_empty() {
                println!("\n{} issue(s) found:", response.issues.len());
                for issue in &response.issues {
                    println!("  - [{:?}] {}", issue.category, issue.message);
                }
            }
            if !response.rewrites.is_empty() {
                println!("\nRewrites:");
                for rewrite in &response.rewrites {
                    println!("  - ({:?}, score {:.1}) {}", rewrite.tone, rewrite.score, rewrite.text);
                }
            }
        }

        Ok(())
    }
}

use clap::Parser;
use gramcheck::{cli::Cli, error::Result};

#[tokio::main]
async fn main() {
    if let Err(e) = try_main().await {
        eprintln!("{e}");
        std::process::exit(2);
    }
}

async fn try_main() -> Result<()> {
    let cli = Cli::parse();
    pretty_env_logger::formatted_builder()
        .parse_filters(&cli.log_level)
        .init();
    cli.execute().await
}

//! Run the HTTP server.

use clap::Parser;

use crate::{
    config::Config,
    error::Result,
    server::{build_router, AppState},
};

use super::ExecuteSubcommand;

#[derive(Debug, Parser)]
pub struct Command {
    /// Address to bind to.
    #[clap(long, default_value = "0.0.0.0:8080")]
    pub bind: String,
}

impl ExecuteSubcommand for Command {
    async fn execute(self, config: Config) -> Result<()> {
        let addr: std::net::SocketAddr = self
            .bind
            .parse()
            .map_err(|_| crate::error::Error::InvalidValue(format!("invalid bind address: {}", self.bind)))?;

        let state = AppState::from_config(config);
        let router = build_router(state);

        log::info!("listening on {addr}");
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

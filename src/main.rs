//! Hide-and-seek client runner (default binary).
//!
//! Plays one session with the bundled reference strategies. Configuration
//! comes from `HIDE_AND_SEEK_CONFIG` (a JSON file) and `HIDE_AND_SEEK_*`
//! environment variables; see `hide_and_seek_client::adapter::config`.

use std::sync::Arc;

use anyhow::{Context, Result};
use env_logger::Env;

use hide_and_seek_client::adapter::config::{ClientConfig, ENV_CONFIG};
use hide_and_seek_client::adapter::{CommandBuilder, TcpGameHandler, TurnLoopController};
use hide_and_seek_client::core::DefaultStrategies;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    config.validate().context("invalid configuration")?;

    let handler = TcpGameHandler::connect(&config)
        .await
        .with_context(|| format!("failed to connect to {}", config.addr()))?;

    let commands = Arc::new(CommandBuilder::new(config.token.clone()));
    let mut controller = TurnLoopController::new(
        Arc::new(handler),
        commands,
        DefaultStrategies::new(config.seed),
    );

    let outcome = controller.run().await;
    log::info!("outcome: {:?}", outcome);
    Ok(())
}

fn load_config() -> Result<ClientConfig> {
    match std::env::var(ENV_CONFIG) {
        Ok(path) if !path.trim().is_empty() => {
            let config = ClientConfig::load(path.trim())
                .with_context(|| format!("failed to load config from {}", path))?;
            Ok(config.with_env())
        }
        _ => Ok(ClientConfig::from_env()),
    }
}

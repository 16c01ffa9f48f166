//! Client configuration
//!
//! Defaults, optionally overlaid by a JSON file, then by environment
//! variables:
//!
//! - `HIDE_AND_SEEK_CONFIG`: path of a JSON config file (binary only)
//! - `HIDE_AND_SEEK_HOST`: server address (default: "127.0.0.1")
//! - `HIDE_AND_SEEK_PORT`: server port (default: 7000)
//! - `HIDE_AND_SEEK_TOKEN`: access token of this agent
//! - `HIDE_AND_SEEK_TIMEOUT_MS`: reply timeout per command (default: 5000)
//! - `HIDE_AND_SEEK_LOG_PATH`: append every wire line to this file
//! - `HIDE_AND_SEEK_SEED`: seed for the reference strategies (default: 1)

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const ENV_CONFIG: &str = "HIDE_AND_SEEK_CONFIG";
pub const ENV_HOST: &str = "HIDE_AND_SEEK_HOST";
pub const ENV_PORT: &str = "HIDE_AND_SEEK_PORT";
pub const ENV_TOKEN: &str = "HIDE_AND_SEEK_TOKEN";
pub const ENV_TIMEOUT_MS: &str = "HIDE_AND_SEEK_TIMEOUT_MS";
pub const ENV_LOG_PATH: &str = "HIDE_AND_SEEK_LOG_PATH";
pub const ENV_SEED: &str = "HIDE_AND_SEEK_SEED";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub token: String,
    pub command_timeout_ms: u64,
    pub log_path: Option<String>,
    pub seed: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
            token: String::new(),
            command_timeout_ms: 5000,
            log_path: None,
            seed: 1,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ClientError::Config(format!("parse {}: {}", path.display(), e)))
    }

    /// Apply environment variable overrides on top of `self`.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable numbers are ignored and keep the current value; an empty
    /// log path disables the wire log.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT).and_then(|s| s.parse().ok()) {
            self.port = port;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = token;
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS).and_then(|s| s.parse().ok()) {
            self.command_timeout_ms = ms;
        }
        if let Some(path) = lookup(ENV_LOG_PATH) {
            let path = path.trim().to_string();
            self.log_path = if path.is_empty() { None } else { Some(path) };
        }
        if let Some(seed) = lookup(ENV_SEED).and_then(|s| s.parse().ok()) {
            self.seed = seed;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.token.trim().is_empty() {
            return Err(ClientError::Config(format!("token is empty (set {})", ENV_TOKEN)));
        }
        if self.port == 0 {
            return Err(ClientError::Config("port must be non-zero".to_string()));
        }
        if self.command_timeout_ms == 0 {
            return Err(ClientError::Config(
                "command timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

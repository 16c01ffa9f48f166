use thiserror::Error;

use crate::protocol::{ErrorCode, ErrorMessage};

/// Everything that can end a session.
///
/// No variant is retried: the turn loop logs the error and stops.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("connection closed by server")]
    Closed,

    #[error("no reply to request {seq} within {timeout_ms}ms")]
    Timeout { seq: u64, timeout_ms: u64 },

    #[error("server rejected request {seq}: {code}: {message}")]
    Rejected {
        seq: u64,
        code: ErrorCode,
        message: String,
    },

    #[error("strategy failed: {0:#}")]
    Strategy(anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unexpected {0} message")]
    UnexpectedMessage(String),

    #[error("no strategy bound before the first move")]
    Uninitialized,
}

impl From<ErrorMessage> for ClientError {
    fn from(value: ErrorMessage) -> Self {
        ClientError::Rejected {
            seq: value.seq,
            code: value.code,
            message: value.message,
        }
    }
}

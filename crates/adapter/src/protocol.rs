//! Protocol module - JSON message types exchanged with the game server
//!
//! Line-delimited JSON. Every message has: type, seq (sequence number),
//! ts (timestamp in ms). Replies (`ack` / `error`) echo the request seq.

use serde::{Deserialize, Serialize};

use crate::types::{GameView, NodeId};

// ============== Client -> Server Messages ==============

/// Open the snapshot stream. Sent on a dedicated connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchCommand {
    pub seq: u64,
    pub ts: u64,
    pub token: String,
}

/// Announce the starting node. Sent once, after the first snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclareReadinessCommand {
    pub seq: u64,
    pub ts: u64,
    pub token: String,
    #[serde(rename = "start_node_id")]
    pub start_node_id: NodeId,
}

/// Move the agent to an adjacent node (or stay).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub seq: u64,
    pub ts: u64,
    pub token: String,
    #[serde(rename = "to_node_id")]
    pub to_node_id: NodeId,
}

/// Chat line broadcast to teammates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCommand {
    pub seq: u64,
    pub ts: u64,
    pub token: String,
    pub text: String,
}

/// Any client request, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "watch")]
    Watch(WatchCommand),
    #[serde(rename = "declare_readiness")]
    DeclareReadiness(DeclareReadinessCommand),
    #[serde(rename = "move")]
    Move(MoveCommand),
    #[serde(rename = "chat")]
    Chat(ChatCommand),
}

impl ClientMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ClientMessage::Watch(m) => m.seq,
            ClientMessage::DeclareReadiness(m) => m.seq,
            ClientMessage::Move(m) => m.seq,
            ClientMessage::Chat(m) => m.seq,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Watch(_) => "watch",
            ClientMessage::DeclareReadiness(_) => "declare_readiness",
            ClientMessage::Move(_) => "move",
            ClientMessage::Chat(_) => "chat",
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "unauthorized")]
    Unauthorized,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "not_your_turn")]
    NotYourTurn,
    #[serde(rename = "invalid_node")]
    InvalidNode,
    #[serde(rename = "game_not_running")]
    GameNotRunning,
    #[serde(rename = "internal")]
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::InvalidCommand => "invalid_command",
            ErrorCode::NotYourTurn => "not_your_turn",
            ErrorCode::InvalidNode => "invalid_node",
            ErrorCode::GameNotRunning => "game_not_running",
            ErrorCode::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot pushed on the watch connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewMessage {
    pub seq: u64,
    pub ts: u64,
    pub view: GameView,
}

/// Acknowledgment for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckMessage {
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
}

/// Error reply for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Any server message, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "view")]
    View(ViewMessage),
    #[serde(rename = "ack")]
    Ack(AckMessage),
    #[serde(rename = "error")]
    Error(ErrorMessage),
}

// ============== Message Parsing ==============

/// Parsed server message
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMessage {
    View(ViewMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Unknown(UnknownMessage),
}

/// A well-formed message whose type this client does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub msg_type: String,
    pub seq: u64,
}

/// Parse a JSON message from the server.
///
/// Unknown message types are not a parse error: newer servers may send
/// messages this client does not understand, and those are skipped.
pub fn parse_server_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    match serde_json::from_str::<ServerMessage>(json) {
        Ok(ServerMessage::View(m)) => Ok(ParsedMessage::View(m)),
        Ok(ServerMessage::Ack(m)) => Ok(ParsedMessage::Ack(m)),
        Ok(ServerMessage::Error(m)) => Ok(ParsedMessage::Error(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Header {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            let msg_type = header.msg_type.unwrap_or_else(|| "unknown".to_string());
            if matches!(msg_type.as_str(), "view" | "ack" | "error") {
                return Err(e);
            }
            Ok(ParsedMessage::Unknown(UnknownMessage {
                msg_type,
                seq: header.seq.unwrap_or(0),
            }))
        }
    }
}

/// Parse a JSON request from a client (server side / test harnesses).
pub fn parse_client_message(json: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(json)
}

// ============== Utility Functions ==============

/// Create a snapshot message
pub fn create_view(seq: u64, view: GameView) -> ViewMessage {
    ViewMessage {
        seq,
        ts: current_timestamp_ms(),
        view,
    }
}

/// Create an acknowledgment
pub fn create_ack(seq: u64) -> AckMessage {
    AckMessage {
        seq,
        ts: current_timestamp_ms(),
        status: AckStatus::Ok,
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

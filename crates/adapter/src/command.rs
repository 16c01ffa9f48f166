//! Command construction
//!
//! Every request carries the agent's access token and a sequence number
//! that is strictly increasing across all requests of one client, so
//! replies can be matched to requests.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::protocol::{
    current_timestamp_ms, ChatCommand, DeclareReadinessCommand, MoveCommand, WatchCommand,
};
use crate::types::NodeId;

/// Builds requests for one agent.
#[derive(Debug)]
pub struct CommandBuilder {
    token: String,
    seq: AtomicU64,
}

impl CommandBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn watch(&self) -> WatchCommand {
        WatchCommand {
            seq: self.next_seq(),
            ts: current_timestamp_ms(),
            token: self.token.clone(),
        }
    }

    pub fn declare_readiness(&self, start_node_id: NodeId) -> DeclareReadinessCommand {
        DeclareReadinessCommand {
            seq: self.next_seq(),
            ts: current_timestamp_ms(),
            token: self.token.clone(),
            start_node_id,
        }
    }

    pub fn move_to(&self, to_node_id: NodeId) -> MoveCommand {
        MoveCommand {
            seq: self.next_seq(),
            ts: current_timestamp_ms(),
            token: self.token.clone(),
            to_node_id,
        }
    }

    pub fn chat(&self, text: &str) -> ChatCommand {
        ChatCommand {
            seq: self.next_seq(),
            ts: current_timestamp_ms(),
            token: self.token.clone(),
            text: text.to_string(),
        }
    }
}

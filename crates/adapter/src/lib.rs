//! Adapter module - game server client over TCP with a JSON protocol
//!
//! This crate connects one agent (police or thief) to a hide-and-seek game
//! server and plays it through a pluggable strategy.
//!
//! # Protocol Overview
//!
//! The client speaks a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Watch**: the client opens a stream connection and sends `watch`;
//!    the server pushes a `view` (full game snapshot) whenever state changes
//! 2. **Readiness**: after the first snapshot, the client sends
//!    `declare_readiness` with its starting node
//! 3. **Moves**: on each turn of its side, the client sends one `move`
//! 4. **Chat**: `chat` lines may be sent at any time
//!
//! Requests other than `watch` travel on a separate command connection and
//! are answered by `ack` or `error` echoing the request `seq`.
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **watch**: subscribe to snapshots for the agent owning the token
//! - **declare_readiness**: starting node for this agent
//! - **move**: destination node for this turn
//! - **chat**: free text for teammates
//!
//! ## Server → Client
//!
//! - **view**: game snapshot (stream connection only)
//! - **ack**: request accepted
//! - **error**: request rejected, with code and message
//!
//! # Environment Variables
//!
//! See [`config`]. The minimum is `HIDE_AND_SEEK_TOKEN`.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"watch","seq":1,"ts":1700000000000,"token":"t-1"}
//! Server -> Client: {"type":"view","seq":1,"ts":1700000000001,"view":{"status":"pending",...}}
//! Client -> Server: {"type":"declare_readiness","seq":2,"ts":1700000000002,"token":"t-1","start_node_id":4}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000003,"status":"ok"}
//! Server -> Client: {"type":"view","seq":2,"ts":1700000000010,"view":{"status":"ongoing",...}}
//! Client -> Server: {"type":"move","seq":3,"ts":1700000000011,"token":"t-1","to_node_id":5}
//! Server -> Client: {"type":"error","seq":3,"ts":1700000000012,"code":"not_your_turn","message":"..."}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking
//! - See [`protocol`] for message structure definitions
//! - See [`client`] for the transport, [`controller`] for the turn loop
//!
//! # Testing
//!
//! Inspect the stream of a running server with netcat:
//!
//! ```bash
//! nc 127.0.0.1 7000
//! {"type":"watch","seq":1,"ts":0,"token":"t-1"}
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod wire_log;

pub use hide_and_seek_core as core;
pub use hide_and_seek_types as types;

pub use client::{GameHandler, TcpGameHandler, ViewStream};
pub use command::CommandBuilder;
pub use config::ClientConfig;
pub use controller::{Phone, SessionOutcome, TurnLoopController};
pub use error::ClientError;

//! Core client logic - pure turn gating and the strategy seam
//!
//! This crate decides *what* the client does with each snapshot. It has
//! **no networking**: the adapter crate feeds it snapshots and carries out
//! the resulting steps, which keeps the rules here deterministic and easy to
//! test in isolation.
//!
//! # Module Structure
//!
//! - [`gate`]: per-session turn state and the per-snapshot [`Step`] decision
//! - [`strategy`]: the [`Strategy`] / [`StrategyFactory`] seam and the
//!   bundled police and thief reference strategies
//! - [`rng`]: seeded LCG used by the reference strategies
//!
//! # Rules
//!
//! - The first snapshot of a session always initializes (declare readiness),
//!   whatever its status or turn.
//! - After that, an agent acts only while the game is ongoing, only during
//!   its own side's turns, and at most once per turn number.
//! - A finished snapshot ends the session.
//!
//! # Example
//!
//! ```
//! use hide_and_seek_core::{Step, TurnGate};
//! use hide_and_seek_core::types::{Agent, AgentType, GameStatus, GameView, Turn, TurnType};
//!
//! let thief = Agent::new(2, AgentType::Thief);
//! let mut gate = TurnGate::new();
//!
//! let first = GameView::new(GameStatus::Pending, Turn::new(1, TurnType::ThiefTurn), thief.clone());
//! assert_eq!(gate.step(&first), Step::Initialize);
//!
//! let done = GameView::new(GameStatus::Finished, Turn::new(9, TurnType::ThiefTurn), thief);
//! assert_eq!(gate.step(&done), Step::Finish);
//! ```

pub mod gate;
pub mod rng;
pub mod strategy;

pub use hide_and_seek_types as types;

pub use gate::{Step, TurnGate};
pub use rng::SimpleRng;
pub use strategy::{
    DefaultStrategies, Messenger, PoliceStrategy, Strategy, StrategyFactory, ThiefStrategy,
};

//! Hide-and-seek client (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `hide_and_seek_client::{adapter,core,types}` and ships
//! the `hide-and-seek-client` binary.

pub use hide_and_seek_adapter as adapter;
pub use hide_and_seek_core as core;
pub use hide_and_seek_types as types;

//! Sync engine - cache-aside reads over the local store and remote catalog.
//!
//! Reads are served from the local store while its rows are fresh, refreshed
//! from the remote catalog when stale, and fall back to whatever the store
//! holds when the remote is unreachable.

mod bootstrap;
mod config;
mod engine;
mod types;

pub use bootstrap::seed_if_empty;
pub use config::SyncConfig;
pub use engine::{Clock, SyncEngine};
pub use types::*;

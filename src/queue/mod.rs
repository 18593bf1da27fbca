//! Matchmaking queue structures and the engine built on them
//!
//! This module holds the handle-based intrusive list, the size-indexed
//! queue engine with its merge and pairing algorithms, and the shared
//! thread-safe wrapper.

pub mod engine;
pub mod list;
pub mod shared;

// Re-export commonly used types
pub use engine::Matchmaker;
pub use list::{Entry, GroupKey, QueueList};
pub use shared::SharedMatchmaker;

//! Session-scoped persistence for terminal command history.
//!
//! The persisted shape is a single key holding a JSON array of strings. Storage
//! backends only move opaque string values; encoding lives in [`HistoryLog`].

mod error;
mod paths;
mod schema;
mod storage;
mod store;

pub use error::HistoryStoreError;
pub use paths::{
    default_session_base, default_session_dir, prune_stale_sessions, session_dir, storage_file_name,
};
pub use schema::{decode_history, encode_history};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{HistoryLog, HISTORY_KEY};

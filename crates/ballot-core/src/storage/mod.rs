//! Local key-value storage: auth token, per-election voted flags and the
//! hand-off written before the multi-step vote flow.

pub mod errors;
pub mod keys;
pub mod persistence;

pub use errors::StorageError;
pub use keys::VoteHandoff;
pub use persistence::{FileStore, KeyValueStore, MemoryStore};

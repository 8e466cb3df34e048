//! Key-value collaborator behind the supporter registry.
//!
//! All shared state lives behind [`SupporterStore`]. Each method maps to one
//! atomic command on the backing store; nothing spans commands, so callers
//! must not assume a sequence of calls is applied as a unit.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

mod memory;
mod rest;

pub use memory::MemoryKv;
pub use rest::RestKv;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("store rejected command `{command}`: {message}")]
    Command { command: String, message: String },

    #[error("unexpected reply to `{command}`: {reply}")]
    UnexpectedReply { command: String, reply: String },

    #[error("invalid store url `{0}`")]
    InvalidUrl(String),
}

#[async_trait]
pub trait SupporterStore: Send + Sync {
    /// Increment `key` and return the new value. A fresh counter (new value 1)
    /// gets `ttl` as its time-to-live.
    async fn incr_with_expiry(&self, key: &str, ttl: Duration) -> Result<i64, StoreError>;

    /// Add `member` to the set at `key`. Returns `true` if it was not present.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    async fn list_prepend(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Keep only `start..=stop` of the list (negative indices count from the end).
    async fn list_trim(&self, key: &str, start: i64, stop: i64) -> Result<(), StoreError>;

    async fn list_range(&self, key: &str, start: i64, stop: i64)
    -> Result<Vec<String>, StoreError>;
}

/// Resolve an inclusive, possibly negative, index pair against a list of
/// `len` items. Returns `None` when the range selects nothing.
pub(crate) fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if len == 0 || start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop as usize))
}

//! Error types for the memory accountant.

use thiserror::Error;

/// Opaque handle standing in for a pointer returned by the accountant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocId(pub u32);

/// Failure mode of the memory accountant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// An allocation (or the growing half of a realloc) would push
    /// `current_usage` strictly above the configured ceiling.
    #[error("Memória Insuficiente: requested {requested} bytes, {current}/{limit} already in use")]
    Exhausted {
        requested: usize,
        current: usize,
        limit: usize,
    },

    /// `free` or `realloc` was called on a handle that is not currently live.
    #[error("invalid or already-freed allocation handle: {0:?}")]
    InvalidHandle(AllocId),
}

pub type MemoryResult<T> = std::result::Result<T, MemoryError>;

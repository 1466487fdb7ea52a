//! Durable key-value storage for the Mentora auth client.
//!
//! This crate provides the storage abstraction the session layer writes
//! through:
//! - [`SessionStorage`]: the backend trait
//! - [`FileStorage`]: a JSON file on disk (the durable default)
//! - [`MemoryStorage`]: an in-memory map for tests and ephemeral sessions
//! - [`StorageKeys`]: the persisted key layout

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::SessionStorage;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

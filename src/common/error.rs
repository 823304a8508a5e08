use thiserror::Error;

use super::config::PageNumber;

/// Error taxonomy for the storage and buffer-pool layers.
///
/// The set is closed by design (the buffer pool is a fixed, small state
/// machine), so this is a plain enum rather than a boxed/dynamic error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("page file not found: {0}")]
    FileNotFound(String),

    #[error("page file handle not initialized")]
    FileHandleNotInit,

    #[error("write failed for page {0}")]
    WriteFailed(PageNumber),

    #[error("attempted to read non-existing page {0}")]
    ReadNonExistingPage(PageNumber),

    #[error("buffer pool not found or already shut down")]
    BufferPoolNotFound,

    #[error("shutdown requested while pages remain pinned")]
    PinnedPagesInBuffer,

    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, Error>;

// Page size and identifier types shared across the storage and buffer layers.

/// Number of bytes in a single page, and in a single frame's buffer.
pub const PAGE_SIZE: usize = 4096;

/// Page number type. Signed so that `NO_PAGE` can be represented without an
/// `Option` at the storage-manager/API boundary (see `NO_PAGE`).
pub type PageNumber = i32;

/// Sentinel meaning "no page resident in this frame" / "no page addressed".
pub const NO_PAGE: PageNumber = -1;

/// Index of a frame within the buffer pool's frame table.
pub type FrameId = usize;

/// The replacement policy a buffer pool evicts frames under.
///
/// The set is closed, so a tagged enum is used rather than a strategy-object
/// trait: dispatch on it sits in the hottest path of the pool (`pin_page`'s
/// victim selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementStrategy {
    Fifo,
    Lru,
    Clock,
}

/// Construction parameters for a [`crate::buffer::BufferPool`].
#[derive(Debug, Clone)]
pub struct BufferPoolConfig {
    /// Path to the page file the pool is bound to. Must already exist
    /// (created via [`crate::storage::PageFile::create`]).
    pub file_name: String,
    /// Number of frames in the pool. Must be greater than zero.
    pub capacity: usize,
    /// Replacement policy used to pick a victim on a miss with no free frame.
    pub strategy: ReplacementStrategy,
}

impl BufferPoolConfig {
    pub fn new(file_name: impl Into<String>, capacity: usize, strategy: ReplacementStrategy) -> Self {
        Self {
            file_name: file_name.into(),
            capacity,
            strategy,
        }
    }
}

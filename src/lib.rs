//! A single-threaded, synchronous page file and buffer pool.
//!
//! [`storage::PageFile`] and [`storage::PageFileHandle`] provide fixed-size
//! block I/O over a flat file of `PAGE_SIZE`-byte pages. [`buffer::BufferPool`]
//! caches a bounded number of those pages in memory, handing out reference-
//! counted [`buffer::Frame`] handles and evicting under a pluggable
//! [`common::ReplacementStrategy`] (FIFO, LRU, or CLOCK) when full.
//!
//! ```no_run
//! use bufmgr::{BufferPool, BufferPoolConfig, PageFile, ReplacementStrategy};
//!
//! PageFile::create("example.db").unwrap();
//! let mut pool = BufferPool::init(BufferPoolConfig::new(
//!     "example.db",
//!     4,
//!     ReplacementStrategy::Lru,
//! ))
//! .unwrap();
//!
//! let frame = pool.pin_page(0).unwrap();
//! frame.data_mut()[0] = 1;
//! pool.mark_dirty(0).unwrap();
//! pool.unpin_page(0).unwrap();
//! pool.shutdown().unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

pub use buffer::{BufferPool, Frame};
pub use common::{BufferPoolConfig, Error, FrameId, PageNumber, ReplacementStrategy, Result, NO_PAGE, PAGE_SIZE};
pub use storage::{PageFile, PageFileHandle};

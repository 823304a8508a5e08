//! The buffer pool itself: pin/unpin, mark-dirty, flush, and the
//! FIFO/LRU/CLOCK victim selection that drives eviction on a miss with no
//! free frame (§4.1, §4.2).

use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace, warn};

use crate::buffer::frame::Frame;
use crate::buffer::replacer::{select_clock_victim, select_fifo_victim, select_lru_victim};
use crate::common::config::{BufferPoolConfig, FrameId, PageNumber, ReplacementStrategy, PAGE_SIZE};
use crate::common::error::{Error, Result};
use crate::storage::page_file::PageFileHandle;

enum Slot {
    Free(FrameId),
    Victim(FrameId),
}

/// A fixed-capacity cache of pages backed by a single page file.
///
/// Operations on a pool that has already been shut down (via a successful
/// [`BufferPool::shutdown`]) return [`Error::BufferPoolNotFound`], the same
/// kind raised for "a pool operation received a null/uninitialized pool",
/// since a torn-down pool is this crate's equivalent of that state.
pub struct BufferPool {
    capacity: usize,
    strategy: ReplacementStrategy,
    frames: Vec<Frame>,
    page_table: HashMap<PageNumber, FrameId>,
    free_list: VecDeque<FrameId>,
    hit_tick: u64,
    fifo_cursor: FrameId,
    clock_hand: FrameId,
    read_io: u64,
    write_io: u64,
    file: Option<PageFileHandle>,
}

impl BufferPool {
    /// Creates an empty pool of `config.capacity` frames bound to an
    /// existing page file. Fails if `capacity == 0` or the page file is
    /// missing.
    pub fn init(config: BufferPoolConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(Error::Generic(
                "buffer pool capacity must be greater than zero".to_string(),
            ));
        }

        let file = PageFileHandle::open(&config.file_name)?;
        let frames: Vec<Frame> = (0..config.capacity).map(|_| Frame::new()).collect();
        let free_list: VecDeque<FrameId> = (0..config.capacity).collect();

        Ok(Self {
            capacity: config.capacity,
            strategy: config.strategy,
            frames,
            page_table: HashMap::new(),
            free_list,
            hit_tick: 0,
            fifo_cursor: 0,
            clock_hand: 0,
            read_io: 0,
            write_io: 0,
            file: Some(file),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn strategy(&self) -> ReplacementStrategy {
        self.strategy
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.file.is_none() {
            return Err(Error::BufferPoolNotFound);
        }
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut PageFileHandle> {
        self.file.as_mut().ok_or(Error::BufferPoolNotFound)
    }

    /// The central operation (§4.1): returns a cloned [`Frame`] handle for
    /// `page_num`, loading it from disk and possibly evicting a victim if it
    /// is not already resident.
    pub fn pin_page(&mut self, page_num: PageNumber) -> Result<Frame> {
        self.ensure_alive()?;

        if let Some(&idx) = self.page_table.get(&page_num) {
            let frame = self.frames[idx].clone();
            frame.pin();
            self.hit_tick += 1;
            match self.strategy {
                ReplacementStrategy::Lru => frame.set_last_hit(self.hit_tick),
                ReplacementStrategy::Clock => frame.set_second_chance(true),
                ReplacementStrategy::Fifo => {}
            }
            trace!(page_num, frame = idx, "buffer pool hit");
            return Ok(frame);
        }

        let slot = if let Some(&idx) = self.free_list.front() {
            Slot::Free(idx)
        } else {
            Slot::Victim(self.select_victim()?)
        };

        // Do the disk I/O before mutating any pool state, so a read failure
        // leaves an empty frame empty and a victim frame exactly as it was.
        self.file_mut()?.ensure_capacity(page_num + 1)?;
        let mut buf = [0u8; PAGE_SIZE];
        self.file_mut()?.read_block(page_num, &mut buf)?;

        let idx = match slot {
            Slot::Free(idx) => {
                self.free_list.pop_front();
                idx
            }
            Slot::Victim(idx) => {
                let victim = self.frames[idx].clone();
                if victim.is_dirty() {
                    let data = *victim.data();
                    self.file_mut()?.write_block(victim.page_number(), &data)?;
                    victim.set_dirty(false);
                    self.write_io += 1;
                }
                self.page_table.remove(&victim.page_number());
                idx
            }
        };

        // Only now, with the read and any victim write-back both committed,
        // count the read: a failure above must leave read_io untouched.
        self.read_io += 1;
        let frame = self.frames[idx].clone();
        frame.reset();
        *frame.data_mut() = buf;
        frame.set_page_number(page_num);
        frame.pin();
        self.hit_tick += 1;
        frame.set_last_hit(self.hit_tick);
        frame.set_second_chance(false);
        self.page_table.insert(page_num, idx);
        debug!(page_num, frame = idx, "buffer pool miss: loaded from disk");
        Ok(frame)
    }

    fn select_victim(&mut self) -> Result<FrameId> {
        let victim = match self.strategy {
            ReplacementStrategy::Fifo => select_fifo_victim(&self.frames, &mut self.fifo_cursor),
            ReplacementStrategy::Lru => select_lru_victim(&self.frames),
            ReplacementStrategy::Clock => select_clock_victim(&self.frames, &mut self.clock_hand),
        };
        victim.ok_or_else(|| {
            warn!(capacity = self.capacity, "no evictable frame: all frames pinned");
            Error::Generic("no victim available: all frames pinned".to_string())
        })
    }

    /// Decrements the pin count for `page_num`, saturating at zero. A no-op
    /// if the page is not resident (tolerant of stale handles, per spec).
    pub fn unpin_page(&mut self, page_num: PageNumber) -> Result<()> {
        self.ensure_alive()?;
        if let Some(&idx) = self.page_table.get(&page_num) {
            self.frames[idx].unpin();
        }
        Ok(())
    }

    /// Marks the resident frame for `page_num` dirty. Fails if the page is
    /// not resident.
    pub fn mark_dirty(&mut self, page_num: PageNumber) -> Result<()> {
        self.ensure_alive()?;
        match self.page_table.get(&page_num) {
            Some(&idx) => {
                self.frames[idx].set_dirty(true);
                Ok(())
            }
            None => Err(Error::Generic(format!(
                "page {page_num} is not resident in the buffer pool"
            ))),
        }
    }

    /// Writes the resident page for `page_num` to disk regardless of its
    /// dirty flag, and clears it. A no-op if the page is not resident.
    pub fn force_page(&mut self, page_num: PageNumber) -> Result<()> {
        self.ensure_alive()?;
        if let Some(&idx) = self.page_table.get(&page_num) {
            let frame = self.frames[idx].clone();
            let data = *frame.data();
            self.file_mut()?.write_block(page_num, &data)?;
            frame.set_dirty(false);
            self.write_io += 1;
        }
        Ok(())
    }

    /// Writes every dirty, unpinned frame to disk and clears its dirty flag.
    /// Stops at the first write error, leaving already-flushed frames clean.
    pub fn force_flush_pool(&mut self) -> Result<()> {
        self.ensure_alive()?;
        for frame in self.frames.clone() {
            if frame.is_dirty() && frame.pin_count() == 0 {
                let page_num = frame.page_number();
                let data = *frame.data();
                self.file_mut()?.write_block(page_num, &data)?;
                frame.set_dirty(false);
                self.write_io += 1;
            }
        }
        Ok(())
    }

    /// Flushes dirty/unpinned frames, then tears the pool down if no frame
    /// remains pinned. On failure (pinned pages remain), no resources are
    /// released and the pool is still usable, so the caller can unpin and
    /// retry.
    pub fn shutdown(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.force_flush_pool()?;

        if self.frames.iter().any(|frame| frame.pin_count() > 0) {
            return Err(Error::PinnedPagesInBuffer);
        }

        self.frames.clear();
        self.page_table.clear();
        self.free_list.clear();
        self.file = None;
        Ok(())
    }

    /// Snapshot of each frame's resident page number (`NO_PAGE` if empty).
    pub fn frame_contents(&self) -> Result<Vec<PageNumber>> {
        self.ensure_alive()?;
        Ok(self.frames.iter().map(Frame::page_number).collect())
    }

    /// Snapshot of each frame's dirty flag.
    pub fn dirty_flags(&self) -> Result<Vec<bool>> {
        self.ensure_alive()?;
        Ok(self.frames.iter().map(Frame::is_dirty).collect())
    }

    /// Snapshot of each frame's pin count.
    pub fn fix_counts(&self) -> Result<Vec<u32>> {
        self.ensure_alive()?;
        Ok(self.frames.iter().map(Frame::pin_count).collect())
    }

    pub fn read_io(&self) -> u64 {
        self.read_io
    }

    pub fn write_io(&self) -> u64 {
        self.write_io
    }
}

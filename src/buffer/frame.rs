//! A single slot in the buffer pool: a page-sized buffer plus the pin count,
//! dirty flag, and replacement-policy bookkeeping the pool needs to decide
//! whether and how to evict it.
//!
//! The pool hands out [`Frame`] values to callers of `pin_page` as the page
//! handle. A `Frame` is a cheap, reference-counted handle onto shared state,
//! built with `Rc<RefCell<..>>` since this pool has no concurrent clients
//! and needs no `Arc<RwLock<..>>`.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::common::config::{PageNumber, PAGE_SIZE};
use crate::common::NO_PAGE;

struct FrameInner {
    page_number: PageNumber,
    buffer: Box<[u8; PAGE_SIZE]>,
    pin_count: u32,
    dirty: bool,
    last_hit: u64,
    second_chance: bool,
}

/// A frame in the buffer pool's frame table.
#[derive(Clone)]
pub struct Frame(Rc<RefCell<FrameInner>>);

impl Frame {
    /// Creates a new, empty frame with a zeroed buffer.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(FrameInner {
            page_number: NO_PAGE,
            buffer: Box::new([0u8; PAGE_SIZE]),
            pin_count: 0,
            dirty: false,
            last_hit: 0,
            second_chance: false,
        })))
    }

    pub fn page_number(&self) -> PageNumber {
        self.0.borrow().page_number
    }

    pub fn set_page_number(&self, page_number: PageNumber) {
        self.0.borrow_mut().page_number = page_number;
    }

    /// True if this frame holds no page (invariant: implies `pin_count == 0`
    /// and `!dirty`, maintained by `reset`).
    pub fn is_empty(&self) -> bool {
        self.page_number() == NO_PAGE
    }

    /// True iff the frame is resident and unpinned, the sole condition
    /// under which a replacement policy may choose it as a victim.
    pub fn is_evictable(&self) -> bool {
        !self.is_empty() && self.pin_count() == 0
    }

    pub fn pin_count(&self) -> u32 {
        self.0.borrow().pin_count
    }

    pub fn pin(&self) {
        self.0.borrow_mut().pin_count += 1;
    }

    /// Decrements the pin count, saturating at zero rather than going
    /// negative (spec §4.1: `unpinPage` never observes a negative count).
    pub fn unpin(&self) {
        let mut inner = self.0.borrow_mut();
        inner.pin_count = inner.pin_count.saturating_sub(1);
    }

    pub fn is_dirty(&self) -> bool {
        self.0.borrow().dirty
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.0.borrow_mut().dirty = dirty;
    }

    pub fn last_hit(&self) -> u64 {
        self.0.borrow().last_hit
    }

    pub fn set_last_hit(&self, tick: u64) {
        self.0.borrow_mut().last_hit = tick;
    }

    pub fn second_chance(&self) -> bool {
        self.0.borrow().second_chance
    }

    pub fn set_second_chance(&self, value: bool) {
        self.0.borrow_mut().second_chance = value;
    }

    pub fn data(&self) -> Ref<'_, [u8; PAGE_SIZE]> {
        Ref::map(self.0.borrow(), |inner| inner.buffer.as_ref())
    }

    pub fn data_mut(&self) -> RefMut<'_, [u8; PAGE_SIZE]> {
        RefMut::map(self.0.borrow_mut(), |inner| inner.buffer.as_mut())
    }

    /// Resets the frame to its empty state: zeroed buffer, no page, no pin,
    /// clean, and policy bookkeeping cleared. Called right before a frame
    /// is reused for a newly-loaded page.
    pub fn reset(&self) {
        let mut inner = self.0.borrow_mut();
        inner.buffer.fill(0);
        inner.page_number = NO_PAGE;
        inner.pin_count = 0;
        inner.dirty = false;
        inner.last_hit = 0;
        inner.second_chance = false;
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_empty_and_clean() {
        let frame = Frame::new();
        assert!(frame.is_empty());
        assert!(!frame.is_dirty());
        assert_eq!(frame.pin_count(), 0);
        assert!(!frame.is_evictable());
    }

    #[test]
    fn pin_and_unpin_track_count() {
        let frame = Frame::new();
        frame.set_page_number(3);
        frame.pin();
        frame.pin();
        assert_eq!(frame.pin_count(), 2);
        assert!(!frame.is_evictable());

        frame.unpin();
        assert_eq!(frame.pin_count(), 1);
        frame.unpin();
        assert_eq!(frame.pin_count(), 0);
        assert!(frame.is_evictable());
    }

    #[test]
    fn unpin_saturates_at_zero() {
        let frame = Frame::new();
        frame.set_page_number(1);
        frame.unpin();
        frame.unpin();
        assert_eq!(frame.pin_count(), 0);
    }

    #[test]
    fn data_mut_is_visible_through_clone() {
        let frame = Frame::new();
        let handle = frame.clone();
        handle.data_mut()[0] = 0xAB;
        assert_eq!(frame.data()[0], 0xAB);
    }

    #[test]
    fn reset_clears_everything() {
        let frame = Frame::new();
        frame.set_page_number(7);
        frame.pin();
        frame.set_dirty(true);
        frame.data_mut()[10] = 9;
        frame.set_last_hit(42);
        frame.set_second_chance(true);

        frame.reset();

        assert!(frame.is_empty());
        assert_eq!(frame.pin_count(), 0);
        assert!(!frame.is_dirty());
        assert_eq!(frame.data()[10], 0);
        assert_eq!(frame.last_hit(), 0);
        assert!(!frame.second_chance());
    }
}

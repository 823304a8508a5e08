//! Victim selection for the three replacement policies (§4.2). Each function
//! scans the frame table directly (no allocation, no side table) and
//! returns the index of the frame to evict, or `None` if every frame is
//! pinned.
//!
//! Kept as free functions dispatched on [`ReplacementStrategy`] rather than a
//! trait-object strategy, per the design notes: the policy set is closed and
//! this sits in `pin_page`'s hot path.

use crate::buffer::frame::Frame;
use crate::common::config::FrameId;

/// Selects a victim under the FIFO policy, advancing `cursor` to one past
/// the chosen frame. Scans at most `frames.len()` steps starting at
/// `*cursor`.
pub fn select_fifo_victim(frames: &[Frame], cursor: &mut FrameId) -> Option<FrameId> {
    let capacity = frames.len();
    if capacity == 0 {
        return None;
    }
    let start = *cursor % capacity;
    for step in 0..capacity {
        let i = (start + step) % capacity;
        if frames[i].is_evictable() {
            *cursor = (i + 1) % capacity;
            return Some(i);
        }
    }
    None
}

/// Selects a victim under the LRU policy: the evictable frame with the
/// smallest `last_hit`, ties broken by lowest index.
pub fn select_lru_victim(frames: &[Frame]) -> Option<FrameId> {
    frames
        .iter()
        .enumerate()
        .filter(|(_, frame)| frame.is_evictable())
        .min_by_key(|(i, frame)| (frame.last_hit(), *i))
        .map(|(i, _)| i)
}

/// Selects a victim under the CLOCK (second-chance) policy, advancing `hand`
/// past the chosen frame. Clears `second_chance` bits it passes over, up to
/// `2 * frames.len()` total steps to guarantee termination even when every
/// evictable frame starts with its bit set.
pub fn select_clock_victim(frames: &[Frame], hand: &mut FrameId) -> Option<FrameId> {
    let capacity = frames.len();
    if capacity == 0 {
        return None;
    }
    *hand %= capacity;

    let max_steps = 2 * capacity;
    for _ in 0..max_steps {
        let i = *hand;
        if frames[i].is_evictable() {
            if !frames[i].second_chance() {
                *hand = (i + 1) % capacity;
                return Some(i);
            }
            frames[i].set_second_chance(false);
        }
        *hand = (i + 1) % capacity;
    }
    None
}

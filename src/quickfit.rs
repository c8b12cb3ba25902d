use std::collections::VecDeque;

/// Exact-size free lists backing the Quick Fit strategy.
///
/// Maps each block size in `1..=capacity` to the start offsets of blocks
/// known to hold exactly that many free units, oldest deallocation first.
/// Only deallocation inserts entries; nothing here ever looks at the arena,
/// so an entry can go stale when a fallback placement later covers its
/// units. The strategy takes entries on trust regardless: the index is a
/// record of deallocation history, not a verified view of memory.
pub struct QuickFitIndex {
    /// `lists[size - 1]` holds the offsets recorded for `size`.
    lists: Vec<VecDeque<usize>>,
}

impl QuickFitIndex {
    /// An index with an empty list for every size `1..=capacity`.
    pub fn new(capacity: usize) -> QuickFitIndex {
        QuickFitIndex {
            lists: vec![VecDeque::new(); capacity],
        }
    }

    /// Clear every list, leaving an empty one for every size as on
    /// construction. Calling this twice is the same as calling it once.
    pub fn reset(&mut self) {
        for list in self.lists.iter_mut() {
            list.clear();
        }
    }

    /// Record that a block of exactly `len` units starting at `start` was
    /// just freed.
    pub fn record_free(&mut self, start: usize, len: usize) {
        debug_assert!(
            len >= 1 && len <= self.lists.len(),
            "freed block size {} outside 1..={}",
            len,
            self.lists.len(),
        );
        if let Some(list) = index_for(&mut self.lists, len) {
            list.push_back(start);
        }
    }

    /// Remove and return the first-inserted offset recorded for exactly
    /// `len`, if any.
    pub fn take(&mut self, len: usize) -> Option<usize> {
        index_for(&mut self.lists, len)?.pop_front()
    }

    /// How many offsets are currently recorded for exactly `len`.
    pub fn available(&self, len: usize) -> usize {
        if len >= 1 && len <= self.lists.len() {
            self.lists[len - 1].len()
        } else {
            0
        }
    }

    /// True iff no offset is recorded for any size.
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(|list| list.is_empty())
    }
}

fn index_for(lists: &mut [VecDeque<usize>], len: usize) -> Option<&mut VecDeque<usize>> {
    if len >= 1 && len <= lists.len() {
        Some(&mut lists[len - 1])
    } else {
        None
    }
}

//! Recency list: keys ordered from least to most recently used
//!
//! Entries live in a dense arena and link to each other by slot index, so
//! append, pop and unlink are all O(1) without raw pointers.

use std::fmt;

/// Stable locator for one entry of a [`RecencyList`]
///
/// Handles are only produced by [`RecencyList::append_back`] and stay valid
/// until the entry is removed, including across [`RecencyList::move_to_back`].
/// A handle carries the generation of its entry, so it no longer resolves once
/// the slot has been freed and reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}@{})", self.index, self.generation)
    }
}

/// Node in the recency chain
struct Entry<K> {
    key: K,
    generation: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly-linked list of keys, front = LRU, back = MRU
pub struct RecencyList<K> {
    slots: Vec<Option<Entry<K>>>,
    front: Option<usize>,
    back: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
    /// Never reset, not even by `clear`
    next_generation: u64,
}

impl<K> RecencyList<K> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            front: None,
            back: None,
            free_list: Vec::new(),
            len: 0,
            next_generation: 0,
        }
    }

    /// Number of entries in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Least recently used key
    pub fn front(&self) -> Option<&K> {
        self.front.and_then(|idx| self.entry(idx)).map(|e| &e.key)
    }

    /// Most recently used key
    pub fn back(&self) -> Option<&K> {
        self.back.and_then(|idx| self.entry(idx)).map(|e| &e.key)
    }

    /// Key held by `handle`, if it still belongs to this list
    pub fn get(&self, handle: Handle) -> Option<&K> {
        self.resolve(handle).and_then(|idx| self.entry(idx)).map(|e| &e.key)
    }

    /// Link `key` as the new back (most recently used) entry
    pub fn append_back(&mut self, key: K) -> Handle {
        let idx = self.alloc_slot();
        let generation = self.next_generation;
        self.next_generation += 1;
        self.slots[idx] = Some(Entry {
            key,
            generation,
            prev: None,
            next: None,
        });
        self.link_back(idx);
        self.len += 1;
        Handle {
            index: idx,
            generation,
        }
    }

    /// Unlink and return the front (least recently used) key
    pub fn remove_front(&mut self) -> Option<K> {
        let idx = self.front?;
        self.take(idx)
    }

    /// Unlink the entry behind `handle` from wherever it sits
    ///
    /// A stale handle or one that does not belong to this list is a caller
    /// bug: it trips a debug assertion and returns `None` in release builds.
    pub fn remove(&mut self, handle: Handle) -> Option<K> {
        let idx = self.resolve(handle);
        debug_assert!(idx.is_some(), "{:?} does not belong to this list", handle);
        self.take(idx?)
    }

    /// Relink the entry behind `handle` at the back, keeping the handle valid
    ///
    /// Returns `false` if the handle is stale or does not belong to this list.
    pub fn move_to_back(&mut self, handle: Handle) -> bool {
        let idx = self.resolve(handle);
        debug_assert!(idx.is_some(), "{:?} does not belong to this list", handle);
        let idx = match idx {
            Some(idx) => idx,
            None => return false,
        };
        if self.back == Some(idx) {
            return true; // Already most recent
        }

        self.unlink(idx);
        self.link_back(idx);
        true
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.front = None;
        self.back = None;
        self.len = 0;
    }

    /// Iterate keys from front (LRU) to back (MRU)
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            current: self.front,
            remaining: self.len,
        }
    }

    fn entry(&self, idx: usize) -> Option<&Entry<K>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Slot index behind `handle`, if the slot still holds that generation
    fn resolve(&self, handle: Handle) -> Option<usize> {
        self.entry(handle.index)
            .filter(|e| e.generation == handle.generation)
            .map(|_| handle.index)
    }

    fn take(&mut self, idx: usize) -> Option<K> {
        self.entry(idx)?;
        self.unlink(idx);
        let entry = self.slots[idx].take()?;
        self.free_list.push(idx);
        self.len -= 1;
        Some(entry.key)
    }

    fn link_back(&mut self, idx: usize) {
        let old_back = self.back;

        if let Some(entry) = &mut self.slots[idx] {
            entry.prev = old_back;
            entry.next = None;
        }

        match old_back {
            Some(back_idx) => {
                if let Some(back) = &mut self.slots[back_idx] {
                    back.next = Some(idx);
                }
            }
            None => {
                self.front = Some(idx);
            }
        }

        self.back = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.slots[idx] {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_entry) = &mut self.slots[prev_idx] {
                    prev_entry.next = next;
                }
            }
            None => {
                self.front = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_entry) = &mut self.slots[next_idx] {
                    next_entry.prev = prev;
                }
            }
            None => {
                self.back = prev;
            }
        }

        if let Some(entry) = &mut self.slots[idx] {
            entry.prev = None;
            entry.next = None;
        }
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(None);
            idx
        }
    }

    /// Walk the chain both ways and panic on any broken link
    #[cfg(test)]
    fn debug_validate_invariants(&self) {
        if self.front.is_none() || self.back.is_none() {
            assert!(self.front.is_none());
            assert!(self.back.is_none());
            assert_eq!(self.len, 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut steps = 0usize;
        let mut prev = None;
        let mut current = self.front;

        while let Some(idx) = current {
            assert!(seen.insert(idx), "cycle at slot {}", idx);
            let entry = self.entry(idx).expect("linked slot is vacant");
            assert_eq!(entry.prev, prev);
            if entry.next.is_none() {
                assert_eq!(self.back, Some(idx));
            }
            prev = Some(idx);
            current = entry.next;
            steps += 1;
            assert!(steps <= self.len);
        }
        assert_eq!(steps, self.len);

        // Same count walking backwards
        let mut back_steps = 0usize;
        let mut current = self.back;
        while let Some(idx) = current {
            current = self.entry(idx).and_then(|e| e.prev);
            back_steps += 1;
            assert!(back_steps <= self.len);
        }
        assert_eq!(back_steps, self.len);

        let occupied = self.slots.iter().filter(|s| s.is_some()).count();
        assert_eq!(occupied, self.len);
        assert_eq!(occupied + self.free_list.len(), self.slots.len());
    }
}

impl<K> Default for RecencyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for RecencyList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over the keys of a [`RecencyList`]
pub struct Iter<'a, K> {
    list: &'a RecencyList<K>,
    current: Option<usize>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        let entry = self.list.entry(idx)?;
        self.current = entry.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&entry.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a RecencyList<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

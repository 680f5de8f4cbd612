//! Doubly linked list threaded through a circular sentinel.
//!
//! Entries live in an arena owned by the list and are addressed by [`Handle`]s, which gives
//! O(1) insertion at the front, removal from the back, and unlinking from the middle. The
//! greedy feedback-arc-set heuristic uses one list per degree bucket.

const SENTINEL: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug, Clone)]
struct Slot<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
}

#[derive(Debug, Clone)]
pub struct List<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> List<T> {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                value: None,
                prev: SENTINEL,
                next: SENTINEL,
            }],
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Links `value` right after the sentinel.
    pub fn enqueue(&mut self, value: T) -> Handle {
        let slot = Slot {
            value: Some(value),
            prev: SENTINEL,
            next: SENTINEL,
        };
        let ix = match self.free.pop() {
            Some(ix) => {
                self.slots[ix] = slot;
                ix
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.link_front(ix);
        self.len += 1;
        Handle(ix)
    }

    /// Unlinks and returns the entry just before the sentinel, i.e. the oldest one.
    pub fn dequeue(&mut self) -> Option<T> {
        let last = self.slots[SENTINEL].prev;
        if last == SENTINEL {
            return None;
        }
        self.take(last)
    }

    /// Unlinks the entry behind `handle`. Returns `None` for a stale handle.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        if handle.0 == SENTINEL || !self.is_live(handle) {
            return None;
        }
        self.take(handle.0)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.0).and_then(|s| s.value.as_ref())
    }

    /// Entries from the front (newest) to the back (oldest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut cursor = self.slots[SENTINEL].next;
        std::iter::from_fn(move || {
            if cursor == SENTINEL {
                return None;
            }
            let slot = &self.slots[cursor];
            cursor = slot.next;
            slot.value.as_ref()
        })
    }

    fn is_live(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.0)
            .is_some_and(|s| s.value.is_some())
    }

    fn link_front(&mut self, ix: usize) {
        let first = self.slots[SENTINEL].next;
        self.slots[ix].prev = SENTINEL;
        self.slots[ix].next = first;
        self.slots[first].prev = ix;
        self.slots[SENTINEL].next = ix;
    }

    fn unlink(&mut self, ix: usize) {
        let Slot { prev, next, .. } = self.slots[ix];
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.slots[ix].prev = ix;
        self.slots[ix].next = ix;
    }

    fn take(&mut self, ix: usize) -> Option<T> {
        self.unlink(ix);
        self.free.push(ix);
        self.len -= 1;
        self.slots[ix].value.take()
    }
}

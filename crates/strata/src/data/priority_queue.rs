//! Binary min-heap keyed by string, with decrease-key.

use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("queue is empty")]
    Empty,
    #[error("key not found: {0}")]
    UnknownKey(String),
    #[error("new priority {priority} is greater than the current priority {current} of {key}")]
    PriorityIncrease {
        key: String,
        priority: String,
        current: String,
    },
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    priority: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    heap: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.heap.iter().map(|e| e.key.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn priority(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.heap[i].priority)
    }

    /// Key with the lowest priority, without removing it.
    pub fn min(&self) -> Result<&str, QueueError> {
        self.heap
            .first()
            .map(|e| e.key.as_str())
            .ok_or(QueueError::Empty)
    }

    /// Inserts `key`; returns `false` (and changes nothing) when it is already queued.
    pub fn add(&mut self, key: impl Into<String>, priority: f64) -> bool {
        let key = key.into();
        if self.index.contains_key(&key) {
            return false;
        }
        let i = self.heap.len();
        self.index.insert(key.clone(), i);
        self.heap.push(Entry { key, priority });
        self.sift_up(i);
        true
    }

    pub fn remove_min(&mut self) -> Result<String, QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::Empty);
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let Some(min) = self.heap.pop() else {
            return Err(QueueError::Empty);
        };
        self.index.remove(&min.key);
        self.heapify(0);
        Ok(min.key)
    }

    pub fn decrease(&mut self, key: &str, priority: f64) -> Result<(), QueueError> {
        let Some(&i) = self.index.get(key) else {
            return Err(QueueError::UnknownKey(key.to_string()));
        };
        let current = self.heap[i].priority;
        if priority > current {
            return Err(QueueError::PriorityIncrease {
                key: key.to_string(),
                priority: priority.to_string(),
                current: current.to_string(),
            });
        }
        self.heap[i].priority = priority;
        self.sift_up(i);
        Ok(())
    }

    fn heapify(&mut self, mut i: usize) {
        loop {
            let l = 2 * i + 1;
            let r = l + 1;
            let mut smallest = i;
            if l < self.heap.len() && self.heap[l].priority < self.heap[smallest].priority {
                smallest = l;
            }
            if r < self.heap.len() && self.heap[r].priority < self.heap[smallest].priority {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[parent].priority <= self.heap[i].priority {
                return;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        if let Some(ix) = self.index.get_mut(&self.heap[i].key) {
            *ix = i;
        }
        if let Some(ix) = self.index.get_mut(&self.heap[j].key) {
            *ix = j;
        }
    }
}

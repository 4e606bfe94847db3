//! Access-order list
//!
//! Arena of slots linked by index handles, most recently used at the head.
//! Every operation is O(1); freed slots are recycled through a free list.

/// Stable position of an entry inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle(usize);

/// One cached entry plus its recency links
#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Millisecond timestamp of the last write, 0 when not tracked
    pub(crate) touched_at: i64,
    prev: Option<Handle>,
    next: Option<Handle>,
}

/// Doubly-linked recency order stored in a `Vec`
#[derive(Debug)]
pub(crate) struct OrderList<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    head: Option<Handle>,
    tail: Option<Handle>,
    free: Vec<usize>,
    len: usize,
}

impl<K, V> OrderList<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Least recently used handle
    pub(crate) fn back(&self) -> Option<Handle> {
        self.tail
    }

    pub(crate) fn get(&self, handle: Handle) -> Option<&Entry<K, V>> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Insert a new entry as most recently used
    pub(crate) fn push_front(&mut self, key: K, value: V, touched_at: i64) -> Handle {
        let handle = self.alloc();
        self.slots[handle.0] = Some(Entry {
            key,
            value,
            touched_at,
            prev: None,
            next: self.head,
        });

        if let Some(old_head) = self.head {
            if let Some(entry) = self.get_mut(old_head) {
                entry.prev = Some(handle);
            }
        }

        self.head = Some(handle);
        if self.tail.is_none() {
            self.tail = Some(handle);
        }
        self.len += 1;
        handle
    }

    pub(crate) fn move_to_front(&mut self, handle: Handle) {
        if self.head == Some(handle) || self.get(handle).is_none() {
            return;
        }

        self.unlink(handle);

        let old_head = self.head;
        if let Some(entry) = self.get_mut(handle) {
            entry.prev = None;
            entry.next = old_head;
        }

        if let Some(old_head) = old_head {
            if let Some(entry) = self.get_mut(old_head) {
                entry.prev = Some(handle);
            }
        }

        self.head = Some(handle);
        if self.tail.is_none() {
            self.tail = Some(handle);
        }
    }

    /// Unlink and release a slot, handing back its entry
    pub(crate) fn remove(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        self.get(handle)?;
        self.unlink(handle);
        let entry = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(entry)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Entries from most to least recently used
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn unlink(&mut self, handle: Handle) {
        let (prev, next) = match self.get(handle) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(prev) => {
                if let Some(entry) = self.get_mut(prev) {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next) => {
                if let Some(entry) = self.get_mut(next) {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.get_mut(handle) {
            entry.prev = None;
            entry.next = None;
        }
    }

    fn alloc(&mut self) -> Handle {
        match self.free.pop() {
            Some(idx) => Handle(idx),
            None => {
                self.slots.push(None);
                Handle(self.slots.len() - 1)
            }
        }
    }
}

/// Front-to-back iterator over the list
pub(crate) struct Iter<'a, K, V> {
    list: &'a OrderList<K, V>,
    cursor: Option<Handle>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.get(self.cursor?)?;
        self.cursor = entry.next;
        Some(entry)
    }
}

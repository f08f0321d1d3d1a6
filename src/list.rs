//! Arena-backed doubly linked lists.
//!
//! Nodes live in a slot [`Arena`] and are addressed by stable [`NodeId`]
//! handles instead of raw pointers. A [`Links`] value is one chain (head,
//! tail, length) threaded through an arena; several chains may share the
//! same arena, which is how the frequency buckets are laid out.
//!
//! ```text
//!   Arena<T>                                Links (one chain)
//!   ┌──────┬───────────────────────────┐     head ──► [2] ◄──► [0] ◄──► [3] ◄── tail
//!   │ slot │ value   prev   next       │
//!   ├──────┼───────────────────────────┤
//!   │  0   │ Some(b)  2      3         │
//!   │  1   │ None     -      -   (free)│
//!   │  2   │ Some(a)  -      0         │
//!   │  3   │ Some(c)  0      -         │
//!   └──────┴───────────────────────────┘
//! ```
//!
//! Moving a node between two chains of the same arena is a pure index
//! splice: `unlink` from the source chain, then `link_front`/`link_back`
//! into the destination. A node is never linked into two chains at once.
//!
//! **Note**: This module is internal infrastructure. Callers are responsible
//! for only passing a `Links` value together with the arena it was built on,
//! and for only unlinking ids that are currently linked into that chain.

use core::fmt;

/// Stable handle to a slot in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

struct Slot<T> {
    value: Option<T>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Head, tail and length of one chain threaded through an arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Links {
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl Links {
    pub(crate) const fn new() -> Self {
        Links {
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first node of the chain (most recent for recency chains).
    #[inline]
    pub(crate) fn front(&self) -> Option<NodeId> {
        self.head
    }
}

/// Slot storage for list nodes with a free list for slot reuse.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0).and_then(|slot| slot.value.as_ref())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(|slot| slot.value.as_mut())
    }

    fn alloc(&mut self, value: T) -> NodeId {
        let slot = Slot {
            value: Some(value),
            prev: None,
            next: None,
        };
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = slot;
            NodeId(idx)
        } else {
            self.slots.push(slot);
            NodeId(self.slots.len() - 1)
        }
    }

    /// Releases an unlinked slot and returns its value.
    fn release(&mut self, id: NodeId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.value.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(value)
    }

    /// Allocates `value` and links it at the front of `list`.
    pub(crate) fn push_front(&mut self, list: &mut Links, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link_front(list, id);
        id
    }

    /// Allocates `value` and links it at the back of `list`.
    pub(crate) fn push_back(&mut self, list: &mut Links, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link_back(list, id);
        id
    }

    /// Unlinks `id` from `list` and frees its slot.
    pub(crate) fn remove(&mut self, list: &mut Links, id: NodeId) -> Option<T> {
        if self.get(id).is_none() {
            return None;
        }
        self.unlink(list, id);
        self.release(id)
    }

    pub(crate) fn pop_back(&mut self, list: &mut Links) -> Option<T> {
        let id = list.tail?;
        self.remove(list, id)
    }

    pub(crate) fn move_to_front(&mut self, list: &mut Links, id: NodeId) {
        if list.head == Some(id) {
            return;
        }
        self.unlink(list, id);
        self.link_front(list, id);
    }

    /// Detaches `id` from `list` without freeing the slot.
    pub(crate) fn unlink(&mut self, list: &mut Links, id: NodeId) {
        let (prev, next) = {
            let slot = &mut self.slots[id.0];
            (slot.prev.take(), slot.next.take())
        };
        match prev {
            Some(p) => self.slots[p.0].next = next,
            None => list.head = next,
        }
        match next {
            Some(n) => self.slots[n.0].prev = prev,
            None => list.tail = prev,
        }
        list.len -= 1;
    }

    /// Attaches a detached `id` at the front of `list`.
    pub(crate) fn link_front(&mut self, list: &mut Links, id: NodeId) {
        let old_head = list.head;
        {
            let slot = &mut self.slots[id.0];
            slot.prev = None;
            slot.next = old_head;
        }
        match old_head {
            Some(h) => self.slots[h.0].prev = Some(id),
            None => list.tail = Some(id),
        }
        list.head = Some(id);
        list.len += 1;
    }

    /// Attaches a detached `id` at the back of `list`.
    pub(crate) fn link_back(&mut self, list: &mut Links, id: NodeId) {
        let old_tail = list.tail;
        {
            let slot = &mut self.slots[id.0];
            slot.prev = old_tail;
            slot.next = None;
        }
        match old_tail {
            Some(t) => self.slots[t.0].next = Some(id),
            None => list.head = Some(id),
        }
        list.tail = Some(id);
        list.len += 1;
    }

    /// Iterates `list` from front to back.
    pub(crate) fn iter<'a>(&'a self, list: &Links) -> Iter<'a, T> {
        Iter {
            arena: self,
            next: list.head,
            remaining: list.len,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl<T> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Front-to-back iterator over one chain.
pub(crate) struct Iter<'a, T> {
    arena: &'a Arena<T>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let slot = self.arena.slots.get(id.0)?;
        self.next = slot.next;
        self.remaining = self.remaining.saturating_sub(1);
        slot.value.as_ref().map(|value| (id, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

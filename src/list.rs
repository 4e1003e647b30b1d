//! Arena-backed doubly linked recency list with permanent boundary nodes.
//!
//! Nodes live in a `Vec` and link to each other by slot index. Slot 0 is the
//! front boundary and slot 1 the back boundary; both exist for the whole life
//! of the list, so insertion and removal never special-case the ends.
//!
//! ```text
//!   slot:   0            4          2          1
//!        [front] <──> [k:a] <──> [k:b] <──> [back]
//!                    least                 most
//!                   recent                recent
//! ```
//!
//! Callers hold [`Handle`]s: a slot index plus the generation the slot had
//! when the node was created. Freeing a slot bumps its generation, so a handle
//! kept past removal is rejected instead of silently aliasing a new node.
//!
//! ## Operations
//! - `push_back` / `push_front`: O(1)
//! - `pop_front` / `pop_back`: O(1)
//! - `move_to_back` / `move_to_front`: O(1)
//! - `remove(handle)`: O(1)
//! - `iter`: O(n), least recent first
//!
//! `debug_validate_invariants()` is available in debug/test builds.

extern crate alloc;

use crate::error::ListError;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::mem;

const FRONT: usize = 0;
const BACK: usize = 1;

/// Stable reference to a node in a [`RecencyList`].
///
/// Handles are `Copy` and do not own the node. They stay valid until the node
/// is removed; after that every operation taking the handle fails with
/// [`ListError::InvalidHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: usize,
    generation: u32,
}

impl Handle {
    /// Returns the arena slot this handle points at.
    #[inline]
    pub fn slot(self) -> usize {
        self.slot
    }
}

enum NodeKind<K, V> {
    Boundary,
    Entry { key: K, value: V },
    Vacant { next_free: Option<usize> },
}

struct Node<K, V> {
    kind: NodeKind<K, V>,
    prev: usize,
    next: usize,
    generation: u32,
}

/// Doubly linked list ordered by recency of use.
///
/// The node nearest the front boundary is the least recently used entry and
/// is the eviction candidate; the node nearest the back boundary is the most
/// recently used one.
///
/// # Examples
///
/// ```
/// use lru_memo::list::RecencyList;
///
/// let mut list = RecencyList::new();
/// let a = list.push_back("a", 1);
/// list.push_back("b", 2);
///
/// list.move_to_back(a).unwrap();
/// assert_eq!(list.pop_front(), Ok(("b", 2)));
/// assert_eq!(list.pop_front(), Ok(("a", 1)));
/// assert!(list.is_empty());
/// ```
pub struct RecencyList<K, V> {
    nodes: Vec<Node<K, V>>,
    free_head: Option<usize>,
    len: usize,
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecencyList<K, V> {
    /// Creates an empty list holding only the two boundary nodes.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` live nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 2);
        nodes.push(Node {
            kind: NodeKind::Boundary,
            prev: FRONT,
            next: BACK,
            generation: 0,
        });
        nodes.push(Node {
            kind: NodeKind::Boundary,
            prev: FRONT,
            next: BACK,
            generation: 0,
        });
        Self {
            nodes,
            free_head: None,
            len: 0,
        }
    }

    /// Returns the number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no live nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes[FRONT].next == BACK
    }

    /// Handle of the front boundary node. Every operation rejects it.
    #[inline]
    pub fn front_boundary(&self) -> Handle {
        Handle {
            slot: FRONT,
            generation: 0,
        }
    }

    /// Handle of the back boundary node. Every operation rejects it.
    #[inline]
    pub fn back_boundary(&self) -> Handle {
        Handle {
            slot: BACK,
            generation: 0,
        }
    }

    /// Handle of the least recently used node, if any.
    pub fn front_handle(&self) -> Option<Handle> {
        self.live_handle(self.nodes[FRONT].next)
    }

    /// Handle of the most recently used node, if any.
    pub fn back_handle(&self) -> Option<Handle> {
        self.live_handle(self.nodes[BACK].prev)
    }

    /// Returns `true` if `handle` references a live node of this list.
    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Links a new node holding `(key, value)` just before the back boundary.
    pub fn push_back(&mut self, key: K, value: V) -> Handle {
        let handle = self.allocate(key, value);
        self.link_before(handle.slot, BACK);
        handle
    }

    /// Links a new node holding `(key, value)` just after the front boundary.
    pub fn push_front(&mut self, key: K, value: V) -> Handle {
        let handle = self.allocate(key, value);
        self.link_after(handle.slot, FRONT);
        handle
    }

    /// Detaches the node and reinserts it just before the back boundary.
    ///
    /// Moving the node that is already most recent is valid and leaves the
    /// order unchanged.
    pub fn move_to_back(&mut self, handle: Handle) -> Result<(), ListError> {
        let slot = self.resolve(handle)?;
        self.unlink(slot);
        self.link_before(slot, BACK);
        Ok(())
    }

    /// Detaches the node and reinserts it just after the front boundary.
    pub fn move_to_front(&mut self, handle: Handle) -> Result<(), ListError> {
        let slot = self.resolve(handle)?;
        self.unlink(slot);
        self.link_after(slot, FRONT);
        Ok(())
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_front(&mut self) -> Result<(K, V), ListError> {
        if self.is_empty() {
            return Err(ListError::EmptyList);
        }
        let slot = self.nodes[FRONT].next;
        self.unlink(slot);
        self.release(slot)
    }

    /// Removes and returns the most recently used entry.
    pub fn pop_back(&mut self) -> Result<(K, V), ListError> {
        if self.is_empty() {
            return Err(ListError::EmptyList);
        }
        let slot = self.nodes[BACK].prev;
        self.unlink(slot);
        self.release(slot)
    }

    /// Unlinks the referenced node and returns its entry.
    pub fn remove(&mut self, handle: Handle) -> Result<(K, V), ListError> {
        let slot = self.resolve(handle)?;
        self.unlink(slot);
        self.release(slot)
    }

    /// Returns the entry held by the referenced node.
    pub fn get(&self, handle: Handle) -> Result<(&K, &V), ListError> {
        let slot = self.resolve(handle)?;
        match &self.nodes[slot].kind {
            NodeKind::Entry { key, value } => Ok((key, value)),
            _ => Err(ListError::InvalidHandle),
        }
    }

    /// Returns a mutable reference to the value held by the referenced node.
    ///
    /// Keys are not exposed mutably: the cache index is keyed by them.
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut V, ListError> {
        let slot = self.resolve(handle)?;
        match &mut self.nodes[slot].kind {
            NodeKind::Entry { value, .. } => Ok(value),
            _ => Err(ListError::InvalidHandle),
        }
    }

    /// Replaces the value held by the referenced node, returning the old one.
    pub fn replace(&mut self, handle: Handle, value: V) -> Result<V, ListError> {
        self.get_mut(handle).map(|slot| mem::replace(slot, value))
    }

    /// Least recently used entry, if any.
    pub fn peek_front(&self) -> Option<(&K, &V)> {
        self.entry_at(self.nodes[FRONT].next)
    }

    /// Most recently used entry, if any.
    pub fn peek_back(&self) -> Option<(&K, &V)> {
        self.entry_at(self.nodes[BACK].prev)
    }

    /// Drops every live node and returns all slots to the free list.
    pub fn clear(&mut self) {
        while self.pop_front().is_ok() {}
    }

    /// Iterates live entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            front: self.nodes[FRONT].next,
            back: self.nodes[BACK].prev,
            remaining: self.len,
        }
    }

    /// Number of slots ever allocated for live nodes (boundaries excluded).
    ///
    /// Freed slots are reused, so this stays at the high-water mark of `len`.
    pub fn allocated_slots(&self) -> usize {
        self.nodes.len() - 2
    }

    fn resolve(&self, handle: Handle) -> Result<usize, ListError> {
        let node = self
            .nodes
            .get(handle.slot)
            .ok_or(ListError::InvalidHandle)?;
        if node.generation != handle.generation {
            return Err(ListError::InvalidHandle);
        }
        match node.kind {
            NodeKind::Entry { .. } => Ok(handle.slot),
            NodeKind::Boundary => Err(ListError::BoundaryNode),
            NodeKind::Vacant { .. } => Err(ListError::InvalidHandle),
        }
    }

    fn live_handle(&self, slot: usize) -> Option<Handle> {
        match self.nodes[slot].kind {
            NodeKind::Entry { .. } => Some(Handle {
                slot,
                generation: self.nodes[slot].generation,
            }),
            _ => None,
        }
    }

    fn entry_at(&self, slot: usize) -> Option<(&K, &V)> {
        match &self.nodes[slot].kind {
            NodeKind::Entry { key, value } => Some((key, value)),
            _ => None,
        }
    }

    fn allocate(&mut self, key: K, value: V) -> Handle {
        self.len += 1;
        let kind = NodeKind::Entry { key, value };
        if let Some(slot) = self.free_head {
            let node = &mut self.nodes[slot];
            self.free_head = match node.kind {
                NodeKind::Vacant { next_free } => next_free,
                _ => None,
            };
            node.kind = kind;
            return Handle {
                slot,
                generation: node.generation,
            };
        }
        let slot = self.nodes.len();
        self.nodes.push(Node {
            kind,
            prev: slot,
            next: slot,
            generation: 0,
        });
        Handle {
            slot,
            generation: 0,
        }
    }

    /// Turns an unlinked entry slot into a vacant one and hands back its entry.
    fn release(&mut self, slot: usize) -> Result<(K, V), ListError> {
        let node = &mut self.nodes[slot];
        let vacant = NodeKind::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(&mut node.kind, vacant) {
            NodeKind::Entry { key, value } => {
                node.generation = node.generation.wrapping_add(1);
                node.prev = slot;
                node.next = slot;
                self.free_head = Some(slot);
                self.len -= 1;
                Ok((key, value))
            }
            other => {
                node.kind = other;
                Err(ListError::InvalidHandle)
            }
        }
    }

    fn link_after(&mut self, slot: usize, anchor: usize) {
        let next = self.nodes[anchor].next;
        self.nodes[slot].prev = anchor;
        self.nodes[slot].next = next;
        self.nodes[anchor].next = slot;
        self.nodes[next].prev = slot;
    }

    fn link_before(&mut self, slot: usize, anchor: usize) {
        let prev = self.nodes[anchor].prev;
        self.link_after(slot, prev);
    }

    // Only ever called on entry slots; boundaries are filtered by `resolve`
    // or by the emptiness checks in the pop methods.
    fn unlink(&mut self, slot: usize) {
        let prev = self.nodes[slot].prev;
        let next = self.nodes[slot].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    #[cfg(any(test, debug_assertions))]
    /// Walks the list in both directions and checks link symmetry and length.
    pub fn debug_validate_invariants(&self) {
        assert!(matches!(self.nodes[FRONT].kind, NodeKind::Boundary));
        assert!(matches!(self.nodes[BACK].kind, NodeKind::Boundary));
        assert_eq!(self.is_empty(), self.len == 0);

        let mut count = 0;
        let mut slot = self.nodes[FRONT].next;
        let mut prev = FRONT;
        while slot != BACK {
            assert!(
                matches!(self.nodes[slot].kind, NodeKind::Entry { .. }),
                "non-entry node linked at slot {slot}"
            );
            assert_eq!(self.nodes[slot].prev, prev, "broken prev link at {slot}");
            prev = slot;
            slot = self.nodes[slot].next;
            count += 1;
            assert!(count <= self.len, "forward walk longer than len");
        }
        assert_eq!(self.nodes[BACK].prev, prev);
        assert_eq!(count, self.len);

        let mut back_count = 0;
        let mut slot = self.nodes[BACK].prev;
        while slot != FRONT {
            slot = self.nodes[slot].prev;
            back_count += 1;
            assert!(back_count <= self.len, "backward walk longer than len");
        }
        assert_eq!(back_count, self.len);

        let mut vacant = 0;
        let mut free = self.free_head;
        while let Some(slot) = free {
            match self.nodes[slot].kind {
                NodeKind::Vacant { next_free } => free = next_free,
                _ => panic!("free list points at occupied slot {slot}"),
            }
            vacant += 1;
        }
        assert_eq!(vacant + self.len, self.allocated_slots());
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RecencyList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over a [`RecencyList`] from least to most recently used.
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        self.front = self.list.nodes[slot].next;
        self.remaining -= 1;
        self.list.entry_at(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back;
        self.back = self.list.nodes[slot].prev;
        self.remaining -= 1;
        self.list.entry_at(slot)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}

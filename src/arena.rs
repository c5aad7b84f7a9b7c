//! Slot storage shared by the tree and the list. Nodes link to each other by slot index instead
//! of by pointer, so a parent link is just a number and can never keep anything alive.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the tag that ties a [`NodeId`] to the arena that issued it.
static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

fn next_owner() -> u64 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

/// A handle to a node inside an [`OrderedMap`][crate::OrderedMap] or a [`List`][crate::List].
///
/// Handles are cheap to copy and never own the node. Removing the node invalidates every handle
/// to it, even if its slot is later reused by another node: operations given a stale handle fail
/// with [`Error::InvalidPosition`][crate::Error::InvalidPosition]. So do handles passed to a
/// container other than the one that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    owner: u64,
    index: usize,
    generation: u64,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}:{}v{})", self.owner, self.index, self.generation)
    }
}

#[derive(Clone)]
enum Entry<T> {
    Occupied { generation: u64, value: T },
    Vacant { generation: u64, next_free: Option<usize> },
}

/// A `Vec` of slots with an intrusive free list. Freed slots are reused before the `Vec` grows.
pub(crate) struct Arena<T> {
    /// Unique per arena; a clone or a cleared arena gets a new one.
    owner: u64,
    entries: Vec<Entry<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T: Clone> Clone for Arena<T> {
    /// The copy has the same layout but its own owner tag: handles issued by the original
    /// don't resolve in the copy.
    fn clone(&self) -> Self {
        Self {
            owner: next_owner(),
            entries: self.entries.clone(),
            free_head: self.free_head,
            len: self.len,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            owner: next_owner(),
            entries: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Drops every value. Slot generations restart from zero, so the owner tag is replaced to
    /// keep handles from before the clear stale.
    pub(crate) fn clear(&mut self) {
        self.owner = next_owner();
        self.entries.clear();
        self.free_head = None;
        self.len = 0;
    }

    /// Stores `value` and returns the index of its slot.
    pub(crate) fn alloc(&mut self, value: T) -> usize {
        self.len += 1;
        match self.free_head {
            Some(index) => {
                let generation = match self.entries[index] {
                    Entry::Vacant {
                        generation,
                        next_free,
                    } => {
                        self.free_head = next_free;
                        generation
                    }
                    Entry::Occupied { .. } => unreachable!("free list points at occupied slot"),
                };
                self.entries[index] = Entry::Occupied { generation, value };
                index
            }
            None => {
                self.entries.push(Entry::Occupied {
                    generation: 0,
                    value,
                });
                self.entries.len() - 1
            }
        }
    }

    /// Empties the slot at `index` and returns what was in it. Bumping the generation here is
    /// what turns every outstanding [`NodeId`] for the slot stale.
    ///
    /// ## Panics
    ///
    /// When the slot is already vacant.
    pub(crate) fn free(&mut self, index: usize) -> T {
        let generation = match self.entries[index] {
            Entry::Occupied { generation, .. } => generation,
            Entry::Vacant { .. } => unreachable!("freeing vacant slot {index}"),
        };
        let vacant = Entry::Vacant {
            generation: generation + 1,
            next_free: self.free_head,
        };
        self.free_head = Some(index);
        self.len -= 1;

        match std::mem::replace(&mut self.entries[index], vacant) {
            Entry::Occupied { value, .. } => value,
            Entry::Vacant { .. } => unreachable!(),
        }
    }

    /// Borrows the value in an occupied slot.
    ///
    /// ## Panics
    ///
    /// When the slot is vacant. Links between live nodes only ever name occupied slots, so
    /// this only fires on internal corruption.
    pub(crate) fn get(&self, index: usize) -> &T {
        match &self.entries[index] {
            Entry::Occupied { value, .. } => value,
            Entry::Vacant { .. } => unreachable!("link to vacant slot {index}"),
        }
    }

    /// Mutable counterpart of [`Arena::get`].
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut T {
        match &mut self.entries[index] {
            Entry::Occupied { value, .. } => value,
            Entry::Vacant { .. } => unreachable!("link to vacant slot {index}"),
        }
    }

    /// Builds the public handle for an occupied slot.
    pub(crate) fn id(&self, index: usize) -> NodeId {
        match self.entries[index] {
            Entry::Occupied { generation, .. } => NodeId {
                owner: self.owner,
                index,
                generation,
            },
            Entry::Vacant { .. } => unreachable!("handle for vacant slot {index}"),
        }
    }

    /// Maps a handle back to its slot, if the node it was made for is still alive.
    pub(crate) fn resolve(&self, id: NodeId) -> Option<usize> {
        if id.owner != self.owner {
            return None;
        }
        match self.entries.get(id.index)? {
            Entry::Occupied { generation, .. } if *generation == id.generation => Some(id.index),
            _ => None,
        }
    }
}

//! A doubly-linked list stored in the same kind of arena as [`OrderedMap`][crate::OrderedMap].
//! Each element links forward to its successor and back to its predecessor; positions are
//! addressed with [`NodeId`] handles.
//!
//! # Examples
//!
//! ```
//! use bst_map::List;
//!
//! let mut list = List::new();
//! list.push_back("b");
//! let front = list.push_front("a");
//! list.push_back("d");
//!
//! let d = list.back().unwrap();
//! list.insert_before(d, "c").unwrap();
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
//! assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), ["d", "c", "b", "a"]);
//!
//! assert_eq!(list.remove(front), Ok("a"));
//! assert_eq!(list.pop_back(), Some("d"));
//! assert_eq!(list.len(), 2);
//! ```

use std::fmt;
use std::iter::FusedIterator;

use tracing::trace;

use crate::arena::{Arena, NodeId};
use crate::error::{Error, Result};

/// A doubly-linked list.
#[derive(Clone)]
pub struct List<T> {
    nodes: Arena<Link<T>>,
    head: Option<usize>,
    tail: Option<usize>,
}

#[derive(Clone)]
struct Link<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> List<T> {
    /// Generates a new, empty `List`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Generates a new, empty `List` with room for `capacity` elements before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Removes every element. All outstanding [`NodeId`]s become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Handle to the first element.
    pub fn front(&self) -> Option<NodeId> {
        self.head.map(|index| self.nodes.id(index))
    }

    /// Handle to the last element.
    pub fn back(&self) -> Option<NodeId> {
        self.tail.map(|index| self.nodes.id(index))
    }

    /// Appends `value` and returns its handle.
    pub fn push_back(&mut self, value: T) -> NodeId {
        let index = self.link_between(self.tail, None, value);
        self.nodes.id(index)
    }

    /// Prepends `value` and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let index = self.link_between(None, self.head, value);
        self.nodes.id(index)
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.tail.map(|index| self.unlink(index))
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.head.map(|index| self.unlink(index))
    }

    /// Inserts `value` immediately before the element at `pos` and returns the new handle.
    pub fn insert_before(&mut self, pos: NodeId, value: T) -> Result<NodeId> {
        let next = self.resolve(pos)?;
        let prev = self.nodes.get(next).prev;
        let index = self.link_between(prev, Some(next), value);
        Ok(self.nodes.id(index))
    }

    /// Inserts `value` immediately after the element at `pos` and returns the new handle.
    pub fn insert_after(&mut self, pos: NodeId, value: T) -> Result<NodeId> {
        let prev = self.resolve(pos)?;
        let next = self.nodes.get(prev).next;
        let index = self.link_between(Some(prev), next, value);
        Ok(self.nodes.id(index))
    }

    /// Removes the element at `pos` and returns it.
    pub fn remove(&mut self, pos: NodeId) -> Result<T> {
        let index = self.resolve(pos)?;
        Ok(self.unlink(index))
    }

    /// Borrows the element at `pos`.
    pub fn get(&self, pos: NodeId) -> Result<&T> {
        let index = self.resolve(pos)?;
        Ok(&self.nodes.get(index).value)
    }

    /// Mutably borrows the element at `pos`.
    pub fn get_mut(&mut self, pos: NodeId) -> Result<&mut T> {
        let index = self.resolve(pos)?;
        Ok(&mut self.nodes.get_mut(index).value)
    }

    /// Handle to the element after `pos`, or `None` at the back.
    pub fn next(&self, pos: NodeId) -> Result<Option<NodeId>> {
        let index = self.resolve(pos)?;
        Ok(self.nodes.get(index).next.map(|n| self.nodes.id(n)))
    }

    /// Handle to the element before `pos`, or `None` at the front.
    pub fn prev(&self, pos: NodeId) -> Result<Option<NodeId>> {
        let index = self.resolve(pos)?;
        Ok(self.nodes.get(index).prev.map(|p| self.nodes.id(p)))
    }

    /// Front-to-back iterator. Call `.rev()` on it to walk back-to-front.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len(),
        }
    }

    fn resolve(&self, pos: NodeId) -> Result<usize> {
        self.nodes.resolve(pos).ok_or(Error::InvalidPosition)
    }

    /// Allocates `value` and links it in between two adjacent elements. `None` on either side
    /// means the new element becomes the head or tail respectively.
    fn link_between(&mut self, prev: Option<usize>, next: Option<usize>, value: T) -> usize {
        let index = self.nodes.alloc(Link { value, prev, next });
        match prev {
            Some(prev) => self.nodes.get_mut(prev).next = Some(index),
            None => self.head = Some(index),
        }
        match next {
            Some(next) => self.nodes.get_mut(next).prev = Some(index),
            None => self.tail = Some(index),
        }
        trace!(index, len = self.len(), "linked list element");

        index
    }

    fn unlink(&mut self, index: usize) -> T {
        let Link { prev, next, .. } = *self.nodes.get(index);
        match prev {
            Some(prev) => self.nodes.get_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes.get_mut(next).prev = prev,
            None => self.tail = prev,
        }
        let value = self.nodes.free(index).value;
        trace!(index, len = self.len(), "unlinked list element");

        value
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a [`List`], returned by [`List::iter`].
pub struct Iter<'a, T> {
    list: &'a List<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.list.nodes.get(self.front?);
        self.front = link.next;
        self.remaining -= 1;
        Some(&link.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.list.nodes.get(self.back?);
        self.back = link.prev;
        self.remaining -= 1;
        Some(&link.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

//! An unbalanced BST where every node also knows its parent. The parent links let deletion
//! splice a node out in place instead of rebuilding the path back to the root.
//!
//! # Examples
//!
//! ```
//! use bst_map::{Error, OrderedMap};
//!
//! let mut map = OrderedMap::new();
//!
//! // Nothing in here yet.
//! assert_eq!(map.find(&1), None);
//! assert_eq!(map.min(), Err(Error::EmptyTree));
//!
//! map.insert(1, 2);
//! assert_eq!(map.find(&1), Some(&2));
//!
//! // Inserting a new value for the same key overwrites the value.
//! assert_eq!(map.insert(1, 3), Some(2));
//! assert_eq!(map.find(&1), Some(&3));
//! assert_eq!(map.len(), 1);
//!
//! // Deleting a node returns its value.
//! assert_eq!(map.delete(&1), Ok(3));
//! assert_eq!(map.delete(&1), Err(Error::NotFound));
//! ```

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace};

use crate::arena::{Arena, NodeId};
use crate::dump::Dump;
use crate::error::{Error, InvariantViolation, Result};

/// A key-ordered map backed by a plain (never rebalanced) binary search tree.
///
/// Nodes live in an arena and refer to their children and parent by slot index. Children are
/// owned by their parent in the sense that removing a node always relinks or removes them; the
/// parent link is only ever followed upwards.
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<usize>,
    count: usize,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, parent: Option<usize>) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent,
        }
    }
}

/// The relinking strategy [`OrderedMap::unlink`] picked for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Splice {
    /// No children: the parent's slot is simply cleared.
    Leaf,
    /// One child: it moves up into the node's slot.
    SingleChild,
    /// Two children and the successor is the node's right child: it moves up, keeping its own
    /// right subtree.
    DirectSuccessor,
    /// Two children and the successor sits further down the right subtree: its right child
    /// takes its old slot, then it moves up.
    DeepSuccessor,
}

impl Splice {
    fn as_str(self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::SingleChild => "single-child",
            Self::DirectSuccessor => "direct-successor",
            Self::DeepSuccessor => "deep-successor",
        }
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for OrderedMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.in_order().into_iter().map(|index| {
            let node = self.nodes.get(index);
            (&node.key, &node.value)
        });
        f.debug_map().entries(entries).finish()
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Generates a new, empty `OrderedMap`.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            count: 0,
        }
    }

    /// Generates a new, empty `OrderedMap` with room for `capacity` nodes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            count: 0,
        }
    }

    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every entry. All outstanding [`NodeId`]s become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.count = 0;
    }

    /// Inserts `value` at `key`. Inserting a new value for an existing key overwrites its value
    /// in place and hands back the old one; the node count only grows for new keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    ///
    /// assert_eq!(map.insert("a", 1), None);
    /// assert_eq!(map.insert("a", 2), Some(1));
    /// assert_eq!(map.find(&"a"), Some(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        match self.search(&key) {
            Search::Found(index) => {
                trace!(index, "overwriting value");
                Some(std::mem::replace(&mut self.nodes.get_mut(index).value, value))
            }
            Search::Vacant(slot) => {
                self.attach(slot, key, value);
                None
            }
        }
    }

    /// Inserts `value` at `key` only if `key` is absent, returning a handle to the new node.
    /// An existing key is left untouched and reported as [`Error::DuplicateKey`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{Error, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    ///
    /// let id = map.try_insert(7, "seven").unwrap();
    /// assert_eq!(map.node(id), Ok((&7, &"seven")));
    ///
    /// assert_eq!(map.try_insert(7, "SEVEN"), Err(Error::DuplicateKey));
    /// assert_eq!(map.find(&7), Some(&"seven"));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<NodeId>
    where
        K: Ord,
    {
        match self.search(&key) {
            Search::Found(_) => Err(Error::DuplicateKey),
            Search::Vacant(slot) => {
                let index = self.attach(slot, key, value);
                Ok(self.nodes.id(index))
            }
        }
    }

    /// Potentially finds the value associated with the given key. If no node has the
    /// corresponding key, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, 2);
    ///
    /// assert_eq!(map.find(&1), Some(&2));
    /// assert_eq!(map.find(&42), None);
    /// ```
    pub fn find(&self, key: &K) -> Option<&V>
    where
        K: Ord,
    {
        self.locate(key).map(|index| &self.nodes.get(index).value)
    }

    /// Mutable counterpart of [`OrderedMap::find`].
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V>
    where
        K: Ord,
    {
        let index = self.locate(key)?;
        Some(&mut self.nodes.get_mut(index).value)
    }

    /// Whether `key` is in the map.
    pub fn contains_key(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.locate(key).is_some()
    }

    /// Like [`OrderedMap::find`] but treats a missing key as an error.
    pub fn get(&self, key: &K) -> Result<&V>
    where
        K: Ord,
    {
        self.find(key).ok_or(Error::NotFound)
    }

    /// A handle to the node holding `key`, if any.
    pub fn find_node(&self, key: &K) -> Option<NodeId>
    where
        K: Ord,
    {
        self.locate(key).map(|index| self.nodes.id(index))
    }

    /// The key and value stored at `id`.
    pub fn node(&self, id: NodeId) -> Result<(&K, &V)> {
        let node = self.nodes.get(self.resolve(id)?);
        Ok((&node.key, &node.value))
    }

    /// The parent of the node at `id`, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        let index = self.resolve(id)?;
        Ok(self.nodes.get(index).parent.map(|p| self.nodes.id(p)))
    }

    /// The `(left, right)` children of the node at `id`.
    pub fn children(&self, id: NodeId) -> Result<(Option<NodeId>, Option<NodeId>)> {
        let node = self.nodes.get(self.resolve(id)?);
        Ok((
            node.left.map(|l| self.nodes.id(l)),
            node.right.map(|r| self.nodes.id(r)),
        ))
    }

    /// A handle to the root node.
    pub fn root(&self) -> Option<NodeId> {
        self.root.map(|index| self.nodes.id(index))
    }

    /// The value stored at the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{Error, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    /// assert_eq!(map.min(), Err(Error::EmptyTree));
    ///
    /// map.insert(5, 'e');
    /// map.insert(2, 'b');
    /// map.insert(9, 'i');
    /// assert_eq!(map.min(), Ok(&'b'));
    /// ```
    pub fn min(&self) -> Result<&V> {
        self.min_key_value().map(|(_, value)| value)
    }

    /// The value stored at the largest key.
    pub fn max(&self) -> Result<&V> {
        self.max_key_value().map(|(_, value)| value)
    }

    /// The smallest key and its value.
    pub fn min_key_value(&self) -> Result<(&K, &V)> {
        let root = self.root.ok_or(Error::EmptyTree)?;
        let node = self.nodes.get(self.leftmost(root));
        Ok((&node.key, &node.value))
    }

    /// The largest key and its value.
    pub fn max_key_value(&self) -> Result<(&K, &V)> {
        let mut current = self.root.ok_or(Error::EmptyTree)?;
        while let Some(right) = self.nodes.get(current).right {
            current = right;
        }
        let node = self.nodes.get(current);
        Ok((&node.key, &node.value))
    }

    /// Deletes the node containing `key` and returns its value. A missing key is reported as
    /// [`Error::NotFound`] and leaves the map untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::{Error, OrderedMap};
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(1, 2);
    ///
    /// assert_eq!(map.delete(&1), Ok(2));
    /// assert_eq!(map.find(&1), None);
    /// assert_eq!(map.delete(&1), Err(Error::NotFound));
    /// ```
    pub fn delete(&mut self, key: &K) -> Result<V>
    where
        K: Ord,
    {
        let index = self.locate(key).ok_or(Error::NotFound)?;
        Ok(self.unlink(index).value)
    }

    /// Deletes the node at `id`, returning its key and value. Uses the same relinking as
    /// [`OrderedMap::delete`].
    pub fn remove_node(&mut self, id: NodeId) -> Result<(K, V)> {
        let index = self.resolve(id)?;
        let node = self.unlink(index);
        Ok((node.key, node.value))
    }

    /// A breadth-first rendering of the tree for debugging. The format isn't stable.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_map::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    /// map.insert(2, "two");
    /// map.insert(1, "one");
    /// map.insert(3, "three");
    ///
    /// assert_eq!(map.dump().to_string(), "2 - two\n    1 - one\n    3 - three\n");
    /// ```
    pub fn dump(&self) -> Dump<'_, K, V> {
        Dump::new(self)
    }

    /// Walks the whole tree checking the search order, that every parent link points at the
    /// node owning it, that the walk terminates, and that the node count is right.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        K: Ord,
    {
        let Some(root) = self.root else {
            return self.check_count(0);
        };
        if self.nodes.get(root).parent.is_some() {
            return Err(InvariantViolation::Parent { index: root });
        }

        // Each entry carries the exclusive key bounds its subtree must fall within.
        let mut stack: Vec<(usize, Option<&K>, Option<&K>)> = vec![(root, None, None)];
        let mut reachable = 0;
        while let Some((index, lower, upper)) = stack.pop() {
            reachable += 1;
            if reachable > self.count {
                return Err(InvariantViolation::Cycle { count: self.count });
            }

            let node = self.nodes.get(index);
            let above_lower = lower.is_none_or(|lower| *lower < node.key);
            let below_upper = upper.is_none_or(|upper| node.key < *upper);
            if !(above_lower && below_upper) {
                return Err(InvariantViolation::Order { index });
            }

            for child in [node.left, node.right].into_iter().flatten() {
                if child == index || self.nodes.get(child).parent != Some(index) {
                    return Err(InvariantViolation::Parent { index: child });
                }
            }
            if let Some(left) = node.left {
                stack.push((left, lower, Some(&node.key)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(&node.key), upper));
            }
        }

        self.check_count(reachable)
    }

    fn check_count(&self, reachable: usize) -> Result<(), InvariantViolation> {
        let allocated = self.nodes.len();
        if reachable == self.count && allocated == self.count {
            Ok(())
        } else {
            Err(InvariantViolation::Count {
                count: self.count,
                reachable,
                allocated,
            })
        }
    }

    pub(crate) fn root_index(&self) -> Option<usize> {
        self.root
    }

    /// `(key, value, left, right)` of a live slot, for renderers.
    pub(crate) fn entry(&self, index: usize) -> (&K, &V, Option<usize>, Option<usize>) {
        let node = self.nodes.get(index);
        (&node.key, &node.value, node.left, node.right)
    }

    fn resolve(&self, id: NodeId) -> Result<usize> {
        self.nodes.resolve(id).ok_or(Error::InvalidPosition)
    }

    fn locate(&self, key: &K) -> Option<usize>
    where
        K: Ord,
    {
        match self.search(key) {
            Search::Found(index) => Some(index),
            Search::Vacant(_) => None,
        }
    }

    /// Descends from the root towards `key`. Stops either at the node holding it or at the
    /// empty child slot where it would be attached.
    fn search(&self, key: &K) -> Search
    where
        K: Ord,
    {
        let Some(mut current) = self.root else {
            return Search::Vacant(Slot::Root);
        };
        loop {
            let node = self.nodes.get(current);
            match node.key.cmp(key) {
                Ordering::Less => match node.right {
                    Some(right) => current = right,
                    None => return Search::Vacant(Slot::Right(current)),
                },
                Ordering::Equal => return Search::Found(current),
                Ordering::Greater => match node.left {
                    Some(left) => current = left,
                    None => return Search::Vacant(Slot::Left(current)),
                },
            }
        }
    }

    /// Creates a node in an empty slot found by [`OrderedMap::search`].
    fn attach(&mut self, slot: Slot, key: K, value: V) -> usize {
        let index = self.nodes.alloc(Node::new(key, value, slot.parent()));
        match slot {
            Slot::Root => self.root = Some(index),
            Slot::Left(parent) => self.nodes.get_mut(parent).left = Some(index),
            Slot::Right(parent) => self.nodes.get_mut(parent).right = Some(index),
        }
        self.count += 1;
        trace!(index, parent = ?slot.parent(), count = self.count, "attached node");

        index
    }

    fn leftmost(&self, mut current: usize) -> usize {
        while let Some(left) = self.nodes.get(current).left {
            current = left;
        }
        current
    }

    /// Points whichever link referenced `old` (a child slot of `parent`, or the root when there
    /// is no parent) at `new` instead. The slot is chosen by comparing slot indices, not keys.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = self.nodes.get_mut(parent);
                if parent.left == Some(old) {
                    parent.left = new;
                } else if parent.right == Some(old) {
                    parent.right = new;
                } else {
                    unreachable!("slot {old} is not a child of its parent");
                }
            }
        }
    }

    fn set_parent(&mut self, child: Option<usize>, parent: Option<usize>) {
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
    }

    /// Splices the node at `index` out of the tree and frees its slot. The same three cases
    /// apply whether or not the node is the root.
    fn unlink(&mut self, index: usize) -> Node<K, V> {
        let (left, right, parent) = {
            let node = self.nodes.get(index);
            (node.left, node.right, node.parent)
        };

        let splice = match (left, right) {
            (None, None) => {
                self.replace_child(parent, index, None);
                Splice::Leaf
            }
            (Some(child), None) | (None, Some(child)) => {
                self.replace_child(parent, index, Some(child));
                self.set_parent(Some(child), parent);
                Splice::SingleChild
            }
            (Some(left), Some(right)) => {
                let mut successor_parent = index;
                let mut successor = right;
                while let Some(next) = self.nodes.get(successor).left {
                    successor_parent = successor;
                    successor = next;
                }

                let splice = if successor_parent == index {
                    // `successor == right`: it already holds everything greater than the
                    // deleted node, so its right subtree stays where it is.
                    Splice::DirectSuccessor
                } else {
                    // The successor has no left child by construction, so its right child
                    // (if any) can take its place under `successor_parent`.
                    let successor_right = self.nodes.get(successor).right;
                    self.nodes.get_mut(successor_parent).left = successor_right;
                    self.set_parent(successor_right, Some(successor_parent));

                    self.nodes.get_mut(successor).right = Some(right);
                    self.set_parent(Some(right), Some(successor));
                    Splice::DeepSuccessor
                };

                self.nodes.get_mut(successor).left = Some(left);
                self.set_parent(Some(left), Some(successor));

                self.replace_child(parent, index, Some(successor));
                self.set_parent(Some(successor), parent);

                debug_assert_ne!(self.nodes.get(successor).right, Some(successor));
                splice
            }
        };

        self.count -= 1;
        debug!(
            index,
            case = splice.as_str(),
            count = self.count,
            "deleted node"
        );

        self.nodes.free(index)
    }

    /// Slot indices in key order.
    fn in_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.count);
        let mut stack = Vec::new();
        let mut current = self.root;
        loop {
            while let Some(index) = current {
                stack.push(index);
                current = self.nodes.get(index).left;
            }
            let Some(index) = stack.pop() else {
                break;
            };
            out.push(index);
            current = self.nodes.get(index).right;
        }
        out
    }
}

/// Where a descent for a key ended.
enum Search {
    /// At the node holding the key.
    Found(usize),
    /// At an empty link the key would hang from.
    Vacant(Slot),
}

#[derive(Clone, Copy)]
enum Slot {
    Root,
    Left(usize),
    Right(usize),
}

impl Slot {
    fn parent(self) -> Option<usize> {
        match self {
            Slot::Root => None,
            Slot::Left(parent) | Slot::Right(parent) => Some(parent),
        }
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a map and a `BTreeMap`.
    /// This way we can ensure that after a random smattering of inserts
    /// and deletes we have the same set of keys in the map.
    fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut OrderedMap<K, V>, model: &mut BTreeMap<K, V>)
    where
        K: Clone + Ord,
        V: fmt::Debug + PartialEq + Clone,
    {
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let expected = model.insert(k.clone(), v.clone());
                    assert_eq!(bst.insert(k.clone(), v.clone()), expected);
                }
                Op::Remove(k) => {
                    assert_eq!(bst.delete(k).ok(), model.remove(k));
                }
                Op::Extremes => {
                    assert_eq!(bst.min().ok(), model.values().next());
                    assert_eq!(bst.max().ok(), model.values().next_back());
                }
            }
            assert_eq!(bst.len(), model.len());
            assert_eq!(bst.check_invariants(), Ok(()));
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
            let mut map = OrderedMap::new();
            let mut model = BTreeMap::new();

            do_ops(&ops, &mut map, &mut model);
            model.keys().all(|key| map.find(key) == model.get(key))
        }
    }

    quickcheck::quickcheck! {
        fn contains(xs: Vec<i8>) -> bool {
            let mut map = OrderedMap::new();
            for x in &xs {
                map.insert(*x, *x);
            }

            xs.iter().all(|x| map.find(x) == Some(x))
        }
    }

    quickcheck::quickcheck! {
        fn delete_everything(xs: Vec<i16>) -> bool {
            let mut map = OrderedMap::new();
            for x in &xs {
                map.insert(*x, *x);
            }
            for x in &xs {
                let _ = map.delete(x);
                if map.check_invariants().is_err() {
                    return false;
                }
            }

            map.is_empty() && map.len() == 0
        }
    }
}

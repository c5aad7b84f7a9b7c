//! This crate exposes an ordered map built on a plain Binary Search Tree (BST)
//! whose nodes also point back at their parents, plus a small doubly-linked
//! list built on the same node storage.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of key (the key that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! [`OrderedMap`] never rebalances, so its height depends entirely on
//! insertion order: ascending keys produce a linked list. Every operation
//! walks the tree iteratively so even such a degenerate tree can't overflow
//! the stack.
//!
//! ## Parent links
//!
//! Besides its two children, every node records its parent. Deleting a node
//! with two children moves its in-order successor (the leftmost node of its
//! right subtree) into its place, and the parent links are what let that be
//! done by relinking a handful of nodes rather than rebuilding a path.
//! Nodes live in an arena and link to each other by slot index, so a parent
//! link never owns anything and no reference cycle can form.
//!
//! [`NodeId`] handles expose those links for inspection. A handle is
//! invalidated when its node is removed; using it afterwards yields
//! [`Error::InvalidPosition`].

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod arena;
pub mod dump;
mod error;
pub mod list;
pub mod map;


pub use arena::NodeId;
pub use error::{Error, InvariantViolation, Result};
pub use list::List;
pub use map::OrderedMap;

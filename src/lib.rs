//! This crate exposes a self-balancing ordered dictionary, an AVL tree
//! mapping keywords to meanings, along with a menu driven session for
//! editing one interactively.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined
//! as the longest path from the root `Node` to a leaf `Node`). BSTs also
//! naturally support sorted iteration by visiting the left subtree, then the
//! subtree root, then the right subtree.
//!
//! ## AVL Tree
//!
//! An AVL tree adds a third invariant: for every `Node`, the heights of its
//! two subtrees differ by at most one. Each `Node` caches its height and,
//! after an insert or delete, every `Node` on the path back to the root
//! rechecks its balance and rotates when it's off by two. That keeps the
//! height within `O(lg N)` where `N` is the number of nodes in the tree, no
//! matter the order keys arrive in.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod menu;
mod util;

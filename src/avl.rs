//! A self-balancing ordered dictionary (specifically, an AVL tree). Each node owns its children
//! outright, so every restructuring moves `Box`es around instead of patching pointers, and each
//! recursive step hands the (possibly new) root of its subtree back to its parent.
//!
//! # Examples
//!
//! ```
//! use avl_dictionary::avl::Dictionary;
//!
//! let mut dictionary = Dictionary::new();
//!
//! // Nothing in here yet.
//! assert_eq!(dictionary.find("dog"), None);
//!
//! dictionary.insert("dog".to_string(), "animal".to_string());
//! dictionary.insert("cat".to_string(), "animal".to_string());
//! dictionary.insert("apple".to_string(), "fruit".to_string());
//!
//! // Entries come out in key order.
//! let keys: Vec<_> = dictionary.ascending().map(|(k, _)| k.as_str()).collect();
//! assert_eq!(keys, ["apple", "cat", "dog"]);
//!
//! // Searching also reports how many keys were compared along the way.
//! let search = dictionary.search("cat");
//! assert_eq!(search.value.map(String::as_str), Some("animal"));
//! assert!(search.comparisons <= 2);
//!
//! // Deleting a key returns its value.
//! assert_eq!(dictionary.delete("cat"), Some("animal".to_string()));
//! assert_eq!(dictionary.find("cat"), None);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::iter::{FromIterator, FusedIterator, Rev};
use std::mem;

use log::{debug, trace};

use crate::util::{self, Rotation};

/// A keyword to meaning dictionary.
pub type Dictionary = Tree<String, String>;

/// A self-balancing Binary Search Tree (an AVL tree) mapping unique keys to values. This can be
/// used for inserting, updating, searching, deleting and enumerating entries in key order.
#[derive(Clone)]
pub struct Tree<K, V> {
    root: Link<K, V>,
    len: usize,
}

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A `Node` has a key that is used for searching/sorting and a value that is associated with that
/// key. It owns up to two children.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    pub(crate) height: usize,
}

/// The outcome of [`Tree::search`].
#[derive(Debug, PartialEq, Eq)]
pub struct Search<'a, V> {
    /// The value stored at the searched key, if there is one.
    pub value: Option<&'a V>,
    /// How many nodes had their key compared against the searched key. This is at most the height
    /// of the tree whether or not the key was found.
    pub comparisons: usize,
}

impl<V> Clone for Search<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<V> Copy for Search<'_, V> {}

impl<V> Search<'_, V> {
    /// Whether the searched key was present.
    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Tree<K, V> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// How many entries are in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of levels in the tree. An empty tree has a height of 0 and a tree with a single
    /// entry has a height of 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dictionary::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in 0..7 {
    ///     tree.insert(key, ());
    /// }
    ///
    /// // Ascending inserts still produce a full tree.
    /// assert_eq!(tree.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        util::height(&self.root)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Iterates over every entry from the smallest key to the largest.
    pub fn ascending(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.len)
    }

    /// Iterates over every entry from the largest key to the smallest.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dictionary::avl::Tree;
    ///
    /// let tree: Tree<_, _> = vec![(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    ///
    /// let entries: Vec<_> = tree.descending().collect();
    /// assert_eq!(entries, [(&3, &'c'), (&2, &'b'), (&1, &'a')]);
    /// ```
    pub fn descending(&self) -> Rev<Iter<'_, K, V>> {
        self.ascending().rev()
    }

    /// Same as [`Tree::ascending`].
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.ascending()
    }
}

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Inserts the given value into the tree stored at the given key. Inserting a new value for an
    /// existing key overwrites its value and returns the previous one.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dictionary::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(1, 2), None);
    /// assert_eq!(tree.find(&1), Some(&2));
    ///
    /// assert_eq!(tree.insert(1, 3), Some(2));
    /// assert_eq!(tree.find(&1), Some(&3));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (root, previous) = match self.root.take() {
            Some(root) => root.insert(key, value),
            None => (Node::new_boxed(key, value), None),
        };
        self.root = Some(root);

        match previous {
            Some(_) => debug!("updated an existing entry"),
            None => {
                self.len += 1;
                debug!(
                    "inserted a new entry ({} entries, height {})",
                    self.len,
                    self.height()
                );
            }
        }
        previous
    }

    /// Same as [`Tree::insert`]. Updating a key that isn't present adds it.
    pub fn update(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    /// Deletes the entry with the given key from the tree and returns its value. If the tree does
    /// not contain the key, nothing happens and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dictionary::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2);
    ///
    /// assert_eq!(tree.delete(&42), None);
    /// assert_eq!(tree.delete(&1), Some(2));
    /// assert_eq!(tree.find(&1), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = self.root.take()?.delete(key);
        self.root = root;

        match removed {
            Some(_) => {
                self.len -= 1;
                debug!(
                    "deleted an entry ({} entries, height {})",
                    self.len,
                    self.height()
                );
            }
            None => debug!("nothing to delete"),
        }
        removed
    }

    /// Looks up the value stored at `key`, counting one comparison per node visited on the way
    /// down. The count is reported whether or not the key is found.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_dictionary::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2, "two");
    /// tree.insert(1, "one");
    /// tree.insert(3, "three");
    ///
    /// let hit = tree.search(&3);
    /// assert_eq!(hit.value, Some(&"three"));
    /// assert_eq!(hit.comparisons, 2);
    ///
    /// let miss = tree.search(&4);
    /// assert_eq!(miss.value, None);
    /// assert_eq!(miss.comparisons, 2);
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Search<'_, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut comparisons = 0;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            comparisons += 1;
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Equal => {
                    return Search {
                        value: Some(&node.value),
                        comparisons,
                    }
                }
                Ordering::Greater => node.right.as_deref(),
            };
        }

        Search {
            value: None,
            comparisons,
        }
    }

    /// Potentially finds the value associated with the given key in this tree. If no node has the
    /// corresponding key, `None` is returned.
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).value
    }

    /// Whether the tree has an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_found()
    }

    /// Walks the whole tree checking the ordering, balance and cached height of every node as
    /// well as the tracked length. Returns the first problem found.
    pub fn check_invariants(&self) -> Result<(), Violation> {
        let (_, counted) = check_subtree(&self.root, None, None)?;
        if counted != self.len {
            return Err(Violation::Length {
                tracked: self.len,
                counted,
            });
        }
        Ok(())
    }
}

/// Returns the height and size of the subtree after checking that every key lies strictly between
/// `lower` and `upper`.
fn check_subtree<K, V>(
    link: &Link<K, V>,
    lower: Option<&K>,
    upper: Option<&K>,
) -> Result<(usize, usize), Violation>
where
    K: Ord,
{
    let Some(node) = link else {
        return Ok((0, 0));
    };
    if lower.map_or(false, |lower| node.key <= *lower)
        || upper.map_or(false, |upper| node.key >= *upper)
    {
        return Err(Violation::Order);
    }

    let (left_height, left_len) = check_subtree(&node.left, lower, Some(&node.key))?;
    let (right_height, right_len) = check_subtree(&node.right, Some(&node.key), upper)?;

    let actual = left_height.max(right_height) + 1;
    if node.height != actual {
        return Err(Violation::Height {
            cached: node.height,
            actual,
        });
    }
    if left_height.abs_diff(right_height) > 1 {
        return Err(Violation::Balance {
            left_height,
            right_height,
        });
    }

    Ok((actual, left_len + right_len + 1))
}

/// A broken tree invariant reported by [`Tree::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A key is not between the keys of the ancestors it sits under.
    Order,
    /// A node's subtrees differ in height by more than one.
    Balance {
        /// Height of the node's left subtree.
        left_height: usize,
        /// Height of the node's right subtree.
        right_height: usize,
    },
    /// A node's cached height doesn't match its subtrees.
    Height {
        /// The height stored in the node.
        cached: usize,
        /// The height computed from the node's children.
        actual: usize,
    },
    /// The tracked number of entries doesn't match the number of nodes.
    Length {
        /// The length the tree reports.
        tracked: usize,
        /// The number of nodes reachable from the root.
        counted: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => write!(f, "a key is out of order with respect to its ancestors"),
            Self::Balance {
                left_height,
                right_height,
            } => write!(
                f,
                "subtree heights {} and {} differ by more than one",
                left_height, right_height
            ),
            Self::Height { cached, actual } => {
                write!(f, "cached height {} but subtree height {}", cached, actual)
            }
            Self::Length { tracked, counted } => {
                write!(f, "tree reports {} entries but holds {}", tracked, counted)
            }
        }
    }
}

impl Error for Violation {}

impl<K, V> Node<K, V> {
    fn new_boxed(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            height: 1,
            key,
            left: None,
            right: None,
            value,
        })
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = util::height(&self.left).max(util::height(&self.right)) + 1;
    }

    /// Rotate self to the right. This moves the left child up vertically and self down vertically.
    /// Used to rebalance the tree when the left child is too tall.
    ///
    /// # Diagram
    ///
    /// ```text
    ///   old_root (i.e. "self")    new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        debug_assert!(self.left.is_some(), "rotating right without a left child");
        let Some(mut new_root) = self.left.take() else {
            return self;
        };
        self.left = new_root.right.take();
        self.fix_height();

        new_root.right = Some(self);
        new_root.fix_height();
        new_root
    }

    /// The mirror image of [`Node::rotate_right`]: the right child moves up and takes `self` as its
    /// left child, and its old left subtree becomes `self`'s right subtree.
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        debug_assert!(self.right.is_some(), "rotating left without a right child");
        let Some(mut new_root) = self.right.take() else {
            return self;
        };
        self.right = new_root.left.take();
        self.fix_height();

        new_root.left = Some(self);
        new_root.fix_height();
        new_root
    }

    fn rotate(mut self: Box<Self>, rotation: Rotation) -> Box<Self> {
        trace!(
            "{:?} rotation at a subtree of height {}",
            rotation,
            self.height
        );
        match rotation {
            Rotation::Right => self.rotate_right(),
            Rotation::Left => self.rotate_left(),
            Rotation::LeftRight => {
                self.left = self.left.take().map(Node::rotate_left);
                self.rotate_right()
            }
            Rotation::RightLeft => {
                self.right = self.right.take().map(Node::rotate_right);
                self.rotate_left()
            }
        }
    }

    /// Restores the cached height and the AVL invariant after something below `self` was removed.
    /// Unlike insertion, this may need to rotate at every level on the way back up.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.fix_height();
        let balance = util::balance_factor(&*self);
        let child_balance = if balance > 0 {
            util::link_balance_factor(&self.left)
        } else {
            util::link_balance_factor(&self.right)
        };

        let node = match Rotation::after_delete(balance, child_balance) {
            Some(rotation) => self.rotate(rotation),
            None => self,
        };
        node.debug_assert_balanced();
        node
    }

    /// Detaches the node with the smallest key in this subtree. Returns what is left of the
    /// subtree along with the detached node, which has no children.
    fn remove_min(mut self: Box<Self>) -> (Link<K, V>, Box<Self>) {
        match self.left.take() {
            None => {
                let rest = self.right.take();
                (rest, self)
            }
            Some(left) => {
                let (left, min) = left.remove_min();
                self.left = left;
                (Some(self.rebalance()), min)
            }
        }
    }

    fn debug_assert_balanced(&self) {
        if cfg!(debug_assertions) {
            let left_height = util::height(&self.left);
            let right_height = util::height(&self.right);
            assert_eq!(self.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
    }
}

impl<K, V> Node<K, V>
where
    K: Ord,
{
    /// Inserts into the subtree rooted at `self` and returns the new root of the subtree along with
    /// the value that was overwritten, if the key was already present.
    fn insert(mut self: Box<Self>, key: K, value: V) -> (Box<Self>, Option<V>) {
        let descent = match key.cmp(&self.key) {
            Ordering::Less => {
                let (left, previous, descent) = Self::insert_into(self.left.take(), key, value);
                self.left = Some(left);
                if previous.is_some() {
                    return (self, previous);
                }
                descent
            }
            Ordering::Equal => {
                let previous = mem::replace(&mut self.value, value);
                return (self, Some(previous));
            }
            Ordering::Greater => {
                let (right, previous, descent) = Self::insert_into(self.right.take(), key, value);
                self.right = Some(right);
                if previous.is_some() {
                    return (self, previous);
                }
                descent
            }
        };

        self.fix_height();
        let node = match Rotation::after_insert(util::balance_factor(&*self), descent) {
            Some(rotation) => self.rotate(rotation),
            None => self,
        };
        node.debug_assert_balanced();
        (node, None)
    }

    /// Inserts into a possibly empty child subtree. Also returns how `key` compared against the
    /// child's key, which decides the rotation if the parent ends up unbalanced.
    fn insert_into(link: Link<K, V>, key: K, value: V) -> (Box<Self>, Option<V>, Ordering) {
        match link {
            Some(child) => {
                let descent = key.cmp(&child.key);
                let (child, previous) = child.insert(key, value);
                (child, previous, descent)
            }
            None => (Self::new_boxed(key, value), None, Ordering::Equal),
        }
    }

    /// Deletes the node with the given `key` from this subtree. Returns the new root of the
    /// subtree (which is empty if `self` was the only node) and the removed value.
    fn delete<Q>(mut self: Box<Self>, key: &Q) -> (Link<K, V>, Option<V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = match key.cmp(self.key.borrow()) {
            Ordering::Less => {
                let Some(left) = self.left.take() else {
                    return (Some(self), None);
                };
                let (left, removed) = left.delete(key);
                self.left = left;
                removed
            }
            Ordering::Equal => match (self.left.take(), self.right.take()) {
                (None, None) => return (None, Some(self.value)),
                (Some(child), None) | (None, Some(child)) => {
                    return (Some(child), Some(self.value))
                }
                (Some(left), Some(right)) => {
                    // The in-order successor takes our place by handing us its entry.
                    let (right, mut successor) = right.remove_min();
                    mem::swap(&mut self.key, &mut successor.key);
                    mem::swap(&mut self.value, &mut successor.value);
                    self.left = Some(left);
                    self.right = right;
                    Some(successor.value)
                }
            },
            Ordering::Greater => {
                let Some(right) = self.right.take() else {
                    return (Some(self), None);
                };
                let (right, removed) = right.delete(key);
                self.right = right;
                removed
            }
        };

        match removed {
            Some(_) => (Some(self.rebalance()), removed),
            None => (Some(self), None),
        }
    }
}

/// An iterator over the entries of a [`Tree`] in key order. Walking it backwards gives descending
/// order.
pub struct Iter<'a, K, V> {
    /// Nodes whose left subtrees have been visited from the front, smallest on top.
    front: Vec<&'a Node<K, V>>,
    /// Nodes whose right subtrees have been visited from the back, largest on top.
    back: Vec<&'a Node<K, V>>,
    remaining: usize,
}

/// Manual implementation of `Clone` so we don't require the keys and values to be `Clone`.
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: &'a Link<K, V>, len: usize) -> Self {
        let mut iter = Self {
            front: Vec::new(),
            back: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref());
        iter.push_right_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.front.push(n);
            node = n.left.as_deref();
        }
    }

    fn push_right_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.back.push(n);
            node = n.right.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
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
        let node = self.back.pop()?;
        self.push_right_spine(node.left.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Extend<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

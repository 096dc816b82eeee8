use std::cmp::Ordering;

use crate::avl::{Link, Node};

/// Gets the height of the subtree behind `link`. An empty subtree has a height of 0 and a node
/// with no children has a height of 1.
pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// The difference in height between the left and right subtrees of `node`. Positive means the
/// left side is taller.
///
/// See [the Wikipedia page][wiki] for more details.
///
/// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
pub(crate) fn balance_factor<K, V>(node: &Node<K, V>) -> isize {
    height(&node.left) as isize - height(&node.right) as isize
}

/// Same as [`balance_factor`] but for a possibly empty subtree, which is always balanced.
pub(crate) fn link_balance_factor<K, V>(link: &Link<K, V>) -> isize {
    link.as_deref().map_or(0, balance_factor)
}

/// The four ways of restoring the AVL invariant at a node whose subtrees differ in height by two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rotation {
    /// The left child's left subtree is too tall.
    Right,
    /// The right child's right subtree is too tall.
    Left,
    /// The left child's right subtree is too tall. Rotate the left child left first.
    LeftRight,
    /// The right child's left subtree is too tall. Rotate the right child right first.
    RightLeft,
}

impl Rotation {
    /// Picks the rotation after an insertion. `descent` is how the inserted key compared against
    /// the key of the child on the taller side, which tells us which grandchild grew.
    pub(crate) fn after_insert(balance: isize, descent: Ordering) -> Option<Self> {
        match (balance, descent) {
            (b, Ordering::Less) if b > 1 => Some(Self::Right),
            (b, Ordering::Greater) if b > 1 => Some(Self::LeftRight),
            (b, Ordering::Greater) if b < -1 => Some(Self::Left),
            (b, Ordering::Less) if b < -1 => Some(Self::RightLeft),
            _ => None,
        }
    }

    /// Picks the rotation after a deletion. The deleted key is gone so the shape of the taller
    /// child decides: `child_balance` is the balance factor of the child on the taller side.
    pub(crate) fn after_delete(balance: isize, child_balance: isize) -> Option<Self> {
        match balance {
            b if b > 1 && child_balance >= 0 => Some(Self::Right),
            b if b > 1 => Some(Self::LeftRight),
            b if b < -1 && child_balance <= 0 => Some(Self::Left),
            b if b < -1 => Some(Self::RightLeft),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_nodes_need_no_rotation() {
        for balance in -1..=1 {
            assert_eq!(Rotation::after_insert(balance, Ordering::Less), None);
            assert_eq!(Rotation::after_insert(balance, Ordering::Greater), None);
            assert_eq!(Rotation::after_delete(balance, 1), None);
            assert_eq!(Rotation::after_delete(balance, -1), None);
        }
    }

    #[test]
    fn insert_rotation_follows_the_inserted_key() {
        assert_eq!(
            Rotation::after_insert(2, Ordering::Less),
            Some(Rotation::Right)
        );
        assert_eq!(
            Rotation::after_insert(2, Ordering::Greater),
            Some(Rotation::LeftRight)
        );
        assert_eq!(
            Rotation::after_insert(-2, Ordering::Greater),
            Some(Rotation::Left)
        );
        assert_eq!(
            Rotation::after_insert(-2, Ordering::Less),
            Some(Rotation::RightLeft)
        );
    }

    #[test]
    fn delete_rotation_follows_the_taller_child() {
        assert_eq!(Rotation::after_delete(2, 0), Some(Rotation::Right));
        assert_eq!(Rotation::after_delete(2, 1), Some(Rotation::Right));
        assert_eq!(Rotation::after_delete(2, -1), Some(Rotation::LeftRight));
        assert_eq!(Rotation::after_delete(-2, 0), Some(Rotation::Left));
        assert_eq!(Rotation::after_delete(-2, -1), Some(Rotation::Left));
        assert_eq!(Rotation::after_delete(-2, 1), Some(Rotation::RightLeft));
    }

    #[test]
    fn empty_subtrees() {
        let empty: Link<i32, i32> = None;
        assert_eq!(height(&empty), 0);
        assert_eq!(link_balance_factor(&empty), 0);
    }
}

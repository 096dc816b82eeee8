use avl_dictionary::avl::Tree;

use std::collections::{BTreeMap, HashSet};

use quickcheck_macros::quickcheck;

use crate::Op;

/// Applies a set of operations to a tree and a map.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same entries in both.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut Tree<K, V>, map: &mut BTreeMap<K, V>)
where
    K: Clone + Ord,
    V: Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                bst.insert(k.clone(), v.clone());
                map.insert(k.clone(), v.clone());
            }
            Op::Remove(k) => {
                bst.delete(k);
                map.remove(k);
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map);
    tree.check_invariants().is_ok()
        && tree.len() == map.len()
        && tree.ascending().eq(map.iter())
}

#[quickcheck]
fn stays_balanced_with_string_keys(ops: Vec<Op<String, String>>) -> bool {
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map);
    tree.check_invariants().is_ok() && tree.descending().eq(map.iter().rev())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }

    xs.iter().all(|x| tree.find(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.search(x).is_found())
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| tree.find(x).is_none())
        && still_present.iter().all(|x| tree.find(x).is_some())
        && tree.check_invariants().is_ok()
}

#[quickcheck]
fn ascending_is_sorted_and_descending_is_its_reverse(xs: Vec<i16>) -> bool {
    let tree: Tree<_, _> = xs.iter().map(|x| (*x, ())).collect();

    let mut expected = xs;
    expected.sort_unstable();
    expected.dedup();

    let ascending: Vec<_> = tree.ascending().map(|(k, _)| *k).collect();
    let mut descending: Vec<_> = tree.descending().map(|(k, _)| *k).collect();
    descending.reverse();

    ascending == expected && descending == expected
}

#[quickcheck]
fn deleting_a_missing_key_changes_nothing(xs: Vec<i8>, missing: i8) -> bool {
    let mut tree: Tree<_, _> = xs.iter().filter(|x| **x != missing).map(|x| (*x, *x)).collect();
    let before: Vec<_> = tree.ascending().map(|(k, v)| (*k, *v)).collect();

    let deleted = tree.delete(&missing);
    let after: Vec<_> = tree.ascending().map(|(k, v)| (*k, *v)).collect();

    deleted.is_none() && before == after
}

#[quickcheck]
fn update_keeps_the_size(xs: Vec<u8>, key: u8) -> bool {
    let mut tree: Tree<_, _> = xs.iter().map(|x| (*x, 0)).collect();
    tree.insert(key, 1);
    let len = tree.len();

    let previous = tree.insert(key, 2);
    previous == Some(1) && tree.len() == len && tree.find(&key) == Some(&2)
}

#[quickcheck]
fn deleting_everything_empties_the_tree(xs: Vec<i16>, seed: usize) -> bool {
    let mut tree: Tree<_, _> = xs.iter().map(|x| (*x, ())).collect();

    // Some arbitrary but reproducible deletion order.
    let mut keys = xs;
    if !keys.is_empty() {
        let mid = seed % keys.len();
        keys.rotate_left(mid);
    }

    let mut balanced = true;
    for key in &keys {
        tree.delete(key);
        balanced &= tree.check_invariants().is_ok();
    }

    balanced && tree.is_empty() && tree.len() == 0 && tree.ascending().next().is_none()
}

use bst_map::{Error, OrderedMap};

use std::collections::{HashMap, HashSet};

use crate::Op;

/// Applies a set of operations to a map and a hashmap.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in the map.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut OrderedMap<K, V>, map: &mut HashMap<K, V>)
where
    K: std::hash::Hash + Eq + Clone + Ord,
    V: std::fmt::Debug + PartialEq + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                bst.insert(k.clone(), v.clone());
                map.insert(k.clone(), v.clone());
            }
            Op::Remove(k) => {
                assert_eq!(bst.delete(k).ok(), map.remove(k));
            }
        }
    }
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
        let mut tree = OrderedMap::new();
        let mut map = HashMap::new();

        do_ops(&ops, &mut tree, &mut map);
        tree.len() == map.len()
            && tree.check_invariants().is_ok()
            && map.keys().all(|key| tree.find(key) == map.get(key))
    }
}

quickcheck::quickcheck! {
    fn contains(xs: Vec<i8>) -> bool {
        let mut tree = OrderedMap::new();
        for x in &xs {
            tree.insert(*x, *x);
        }

        xs.iter().all(|x| tree.find(x) == Some(x))
    }
}

quickcheck::quickcheck! {
    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = OrderedMap::new();
        for x in &xs {
            tree.insert(*x, *x);
        }
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| tree.find(x).is_none() && tree.get(x) == Err(Error::NotFound))
    }
}

quickcheck::quickcheck! {
    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = OrderedMap::new();
        for x in &xs {
            tree.insert(*x, *x);
        }
        for delete in &deletes {
            let _ = tree.delete(delete);
        }

        let mut still_present = xs;
        for delete in &deletes {
            // We may have inserted the same value multiple times - delete each one.
            while let Some(pos) = still_present.iter().position(|x| x == delete) {
                still_present.swap_remove(pos);
            }
        }

        tree.check_invariants().is_ok()
            && deletes.iter().all(|x| tree.find(x).is_none())
            && still_present.iter().all(|x| tree.find(x).is_some())
    }
}

quickcheck::quickcheck! {
    fn extremes_match_sorted_keys(xs: Vec<i16>) -> bool {
        let mut tree = OrderedMap::new();
        for x in &xs {
            tree.insert(*x, *x);
        }

        match (xs.iter().min(), xs.iter().max()) {
            (Some(min), Some(max)) => tree.min() == Ok(min) && tree.max() == Ok(max),
            _ => tree.min() == Err(Error::EmptyTree) && tree.max() == Err(Error::EmptyTree),
        }
    }
}

quickcheck::quickcheck! {
    fn parent_links_point_at_owners(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = OrderedMap::new();
        for x in &xs {
            tree.insert(*x, ());
        }
        for delete in &deletes {
            let _ = tree.delete(delete);
        }

        xs.iter().filter_map(|x| tree.find_node(x)).all(|id| {
            let (left, right) = tree.children(id).unwrap();
            let child_ok = |child: Option<_>| child.is_none_or(|c| tree.parent(c) == Ok(Some(id)));
            let parent_ok = match tree.parent(id).unwrap() {
                None => tree.root() == Some(id),
                Some(p) => {
                    let (pl, pr) = tree.children(p).unwrap();
                    (pl == Some(id)) != (pr == Some(id))
                }
            };
            child_ok(left) && child_ok(right) && parent_ok
        })
    }
}

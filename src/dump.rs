//! Breadth-first debug rendering of an [`OrderedMap`].

use std::collections::VecDeque;
use std::fmt;

use crate::OrderedMap;

/// Indentation added per level of depth.
const INDENT: &str = "    ";

/// Renders a map level by level: the root first, then its children left to right, and so on.
/// Each node is printed as `key - value` on its own line, indented by its depth.
///
/// Returned by [`OrderedMap::dump`]. Meant for eyeballing test failures; the format isn't
/// stable.
pub struct Dump<'a, K, V> {
    map: &'a OrderedMap<K, V>,
}

impl<'a, K, V> Dump<'a, K, V> {
    pub(crate) fn new(map: &'a OrderedMap<K, V>) -> Self {
        Self { map }
    }
}

impl<K, V> fmt::Display for Dump<'_, K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut queue: VecDeque<(usize, usize)> =
            self.map.root_index().map(|root| (root, 0)).into_iter().collect();

        while let Some((index, depth)) = queue.pop_front() {
            let (key, value, left, right) = self.map.entry(index);
            queue.extend(left.map(|l| (l, depth + 1)));
            queue.extend(right.map(|r| (r, depth + 1)));

            for _ in 0..depth {
                f.write_str(INDENT)?;
            }
            writeln!(f, "{key} - {value}")?;
        }

        Ok(())
    }
}

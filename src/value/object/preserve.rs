use std::ops::RangeBounds;

use faststr::FastStr;

use super::{
    impl_object_common, KeyOrder, Keys, MembersMut, SortedUniqueRange, Values, ValuesMut,
};
use crate::{
    error::Error,
    util::range::resolve,
    value::{
        allocator::{AllocResult, AllocResultExt, Allocator},
        iter::{Iter, IterMut},
        kv::KeyValue,
        node::{Value, NULL},
    },
    Result,
};

/// An object that remembers the order its members were inserted in.
///
/// Next to the members it keeps `index`, a permutation of member positions
/// such that `members[index[0]], members[index[1]], ...` have strictly
/// ascending keys. Lookups binary search the index. Every insertion or
/// removal renumbers the index entries at or after the affected position.
///
/// # Examples
/// ```
/// use jsontree::{JsonValueTrait, OrderPreservingObject};
///
/// let mut obj = OrderPreservingObject::new();
/// obj.insert_or_assign("x", 2.5);
/// obj.insert_or_assign("y", 1.3);
/// obj.insert_or_assign("a", 0);
///
/// let (_, inserted) = obj.try_emplace("x", 99);
/// assert!(!inserted);
/// assert_eq!(obj["x"].as_f64(), Some(2.5));
/// assert_eq!(obj.keys().collect::<Vec<_>>(), ["x", "y", "a"]);
/// assert_eq!(obj.index(), &[2, 0, 1]);
/// ```
#[derive(Clone)]
pub struct OrderPreservingObject {
    pub(crate) members: Vec<KeyValue>,
    index: Vec<usize>,
    alloc: Allocator,
}

impl_object_common!(OrderPreservingObject);

impl OrderPreservingObject {
    #[cfg_attr(not(feature = "preserve_order"), allow(dead_code))]
    pub(crate) const EMPTY: Self = Self {
        members: Vec::new(),
        index: Vec::new(),
        alloc: Allocator::global(),
    };

    pub fn with_capacity_in(capacity: usize, alloc: Allocator) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            index: Vec::with_capacity(capacity),
            alloc,
        }
    }

    pub(crate) fn from_members_in(mut members: Vec<KeyValue>, alloc: Allocator) -> Self {
        for kv in members.iter_mut() {
            kv.value.adopt_in(&alloc);
        }
        let mut obj = Self {
            members,
            index: Vec::new(),
            alloc,
        };
        obj.dedup_members();
        obj
    }

    /// The key-sorted permutation of member positions.
    #[inline]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.members.reserve(additional);
        self.index.reserve(additional);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
    }

    /// Members in ascending key order, read through the index.
    #[inline]
    pub fn iter_by_key(&self) -> KeyOrder<'_> {
        KeyOrder::indexed(&self.members, &self.index)
    }

    /// First index slot whose member key does not sort before `key`.
    #[inline]
    fn index_lower_bound(&self, key: &str) -> usize {
        self.index
            .partition_point(|&pos| self.members[pos].key() < key)
    }

    #[inline]
    pub(crate) fn find_pos(&self, key: &str) -> Option<usize> {
        let slot = self.index_lower_bound(key);
        match self.index.get(slot) {
            Some(&pos) if self.members[pos].key() == key => Some(pos),
            _ => None,
        }
    }

    /// Records that a member with `key` is about to be spliced in at `pos`.
    ///
    /// Returns `(pos, true)` after making room, or the position of the
    /// existing member and `false` if the key is present. Must run before
    /// the member array changes, the search reads keys through the old
    /// positions.
    fn insert_index_entry(&mut self, key: &str, pos: usize) -> (usize, bool) {
        debug_assert!(pos <= self.index.len());
        let slot = self.index_lower_bound(key);
        if let Some(&found) = self.index.get(slot) {
            if self.members[found].key() == key {
                return (found, false);
            }
        }
        if pos < self.members.len() {
            for p in self.index.iter_mut() {
                if *p >= pos {
                    *p += 1;
                }
            }
        }
        self.index.insert(slot, pos);
        (pos, true)
    }

    /// Forgets the members at positions `pos1..pos2`, which are about to be
    /// removed. Entries are dropped first and the survivors renumbered
    /// after, the other way round the removal test would see shifted
    /// positions.
    fn erase_index_entries(&mut self, pos1: usize, pos2: usize) {
        debug_assert!(pos1 <= pos2 && pos2 <= self.index.len());
        let count = pos2 - pos1;
        if count == 0 {
            return;
        }
        self.index.retain(|&p| p < pos1 || p >= pos2);
        for p in self.index.iter_mut() {
            if *p >= pos2 {
                *p -= count;
            }
        }
    }

    /// Rebuilds the index from scratch with a stable sort, equal keys keep
    /// their member order.
    fn build_index(&mut self) {
        let members = &self.members;
        self.index.clear();
        self.index.extend(0..members.len());
        self.index
            .sort_by(|&a, &b| members[a].key().cmp(members[b].key()));
    }

    /// Removes every member whose key already appeared at a lower position.
    ///
    /// After a stable sort of the index the first slot of every run of
    /// equal keys holds the lowest position. The surviving positions are
    /// sorted back into member order, and the gaps between them are erased
    /// from the highest position down so that positions not yet visited
    /// stay valid.
    fn dedup_members(&mut self) {
        self.build_index();
        let members = &self.members;
        self.index
            .dedup_by(|later, earlier| members[*later].key() == members[*earlier].key());
        if self.index.len() == self.members.len() {
            return;
        }

        let mut keep = std::mem::take(&mut self.index);
        keep.sort_unstable();
        let mut end = self.members.len();
        for &pos in keep.iter().rev() {
            if pos + 1 < end {
                self.members.drain(pos + 1..end);
            }
            end = pos;
        }
        self.members.drain(..end);
        self.build_index();
    }

    /// Places a member with `key` at `pos`, or finds the existing one.
    fn emplace(&mut self, pos: usize, key: &str, value: Value, overwrite: bool) -> (usize, bool) {
        let (pos, inserted) = self.insert_index_entry(key, pos);
        if inserted {
            let kv = self.member(key, value);
            self.members.insert(pos, kv);
        } else if overwrite {
            let mut value = value;
            value.adopt_in(&self.alloc);
            self.members[pos].value = value;
        }
        (pos, inserted)
    }

    #[inline]
    pub(crate) fn insert_or_assign_pos(&mut self, key: &str, value: Value) -> (usize, bool) {
        self.emplace(self.members.len(), key, value, true)
    }

    #[inline]
    pub(crate) fn try_emplace_pos(&mut self, key: &str, value: Value) -> (usize, bool) {
        self.emplace(self.members.len(), key, value, false)
    }

    /// [`insert_or_assign`](Self::insert_or_assign) placing a new member at
    /// position `hint` instead of the end. A hint at or past the end
    /// appends. Returns the position of the member.
    pub fn insert_or_assign_hint<K: AsRef<str>, V: Into<Value>>(
        &mut self,
        hint: usize,
        key: K,
        value: V,
    ) -> usize {
        let pos = hint.min(self.members.len());
        self.emplace(pos, key.as_ref(), value.into(), true).0
    }

    /// [`try_emplace`](Self::try_emplace) placing a new member at position
    /// `hint`, see [`insert_or_assign_hint`](Self::insert_or_assign_hint).
    pub fn try_emplace_hint<K: AsRef<str>, V: Into<Value>>(
        &mut self,
        hint: usize,
        key: K,
        value: V,
    ) -> usize {
        let pos = hint.min(self.members.len());
        self.emplace(pos, key.as_ref(), value.into(), false).0
    }

    /// [`merge`](Self::merge) splicing the new members in at `hint`, in
    /// the order of `source`.
    pub fn merge_hint(&mut self, hint: usize, source: Self) {
        let mut pos = hint.min(self.members.len());
        for kv in source.members {
            if self.try_emplace_hint(pos, kv.key.as_str(), kv.value) == pos {
                pos += 1;
            }
        }
    }

    /// [`merge_or_update`](Self::merge_or_update) splicing the new members
    /// in at `hint`.
    pub fn merge_or_update_hint(&mut self, hint: usize, source: Self) {
        let mut pos = hint.min(self.members.len());
        for kv in source.members {
            if self.insert_or_assign_hint(pos, kv.key.as_str(), kv.value) == pos {
                pos += 1;
            }
        }
    }

    /// Removes and returns the member at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn erase_at(&mut self, pos: usize) -> KeyValue {
        assert!(
            pos < self.members.len(),
            "erase position {pos} out of range for object of size {}",
            self.members.len()
        );
        self.erase_index_entries(pos, pos + 1);
        self.members.remove(pos)
    }

    /// Removes the members in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is reversed or ends past the last member.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let range = resolve(range, self.members.len());
        self.erase_index_entries(range.start, range.end);
        self.members.drain(range);
    }

    /// Appends pairs in any order. Keys already present keep their value
    /// and position, and of several incoming pairs with the same key the
    /// first one wins.
    pub fn insert_range<I, K, V>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let start = self.members.len();
        for (key, value) in iter {
            let kv = self.member(key.as_ref(), value.into());
            self.members.push(kv);
        }
        if self.members.len() != start {
            self.dedup_members();
        }
    }

    /// Appends pairs without deduplicating them. See [`SortedUniqueRange`]
    /// for the caller's promise; only the index is rebuilt.
    pub fn insert_sorted_unique<I, K, V>(&mut self, _tag: SortedUniqueRange, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let start = self.members.len();
        for (key, value) in iter {
            let kv = self.member(key.as_ref(), value.into());
            self.members.push(kv);
        }
        debug_assert!(
            self.members[start..]
                .windows(2)
                .all(|w| w[0].key() < w[1].key()),
            "keys of a sorted unique range must be strictly ascending"
        );
        self.build_index();
        debug_assert!(
            self.iter_by_key()
                .zip(self.iter_by_key().skip(1))
                .all(|(a, b)| a.key() < b.key()),
            "key already present"
        );
    }

    #[inline]
    fn shrink_storage(&mut self) {
        self.members.shrink_to_fit();
        self.index.shrink_to_fit();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::JsonValueTrait;

    pub(crate) fn assert_index_consistent(obj: &OrderPreservingObject) {
        let mut seen = vec![false; obj.len()];
        assert_eq!(obj.index().len(), obj.len(), "index size of {:?}", obj);
        for &pos in obj.index() {
            assert!(pos < obj.len(), "index entry {pos} past the end");
            assert!(!seen[pos], "index entry {pos} duplicated");
            seen[pos] = true;
        }
        let keys: Vec<&str> = obj.iter_by_key().map(KeyValue::key).collect();
        assert!(
            keys.windows(2).all(|w| w[0] < w[1]),
            "index not sorted: {keys:?}"
        );
    }

    fn keys(obj: &OrderPreservingObject) -> Vec<&str> {
        obj.keys().collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let obj: OrderPreservingObject = vec![("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        assert_index_consistent(&obj);
        assert_eq!(keys(&obj), ["a", "b"]);
        assert_eq!(obj["a"], 1);
        assert_eq!(obj["b"], 2);
    }

    #[test]
    fn test_dedup_scattered() {
        let pairs = vec![
            ("c", 0),
            ("a", 1),
            ("c", 2),
            ("b", 3),
            ("a", 4),
            ("d", 5),
            ("c", 6),
            ("d", 7),
        ];
        let obj: OrderPreservingObject = pairs.into_iter().collect();
        assert_index_consistent(&obj);
        assert_eq!(keys(&obj), ["c", "a", "b", "d"]);
        let values: Vec<i64> = obj.values().filter_map(|v| v.as_i64()).collect();
        assert_eq!(values, [0, 1, 3, 5]);
    }

    #[test]
    fn test_dedup_trailing_and_all_equal() {
        let obj: OrderPreservingObject = vec![("k", 1), ("k", 2), ("k", 3)].into_iter().collect();
        assert_index_consistent(&obj);
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["k"], 1);

        let obj: OrderPreservingObject = vec![("a", 1), ("b", 2), ("b", 3), ("b", 4)]
            .into_iter()
            .collect();
        assert_index_consistent(&obj);
        assert_eq!(keys(&obj), ["a", "b"]);
        assert_eq!(obj["b"], 2);
    }

    #[test]
    fn test_try_emplace_keeps_value() {
        let mut obj = OrderPreservingObject::new();
        obj.insert_or_assign("x", 2.5);
        obj.insert_or_assign("y", 1.3);
        let (it, inserted) = obj.try_emplace("x", 99);
        assert!(!inserted);
        assert_eq!(it.pos(), 0);
        assert_eq!(obj["x"], 2.5);
        assert_eq!(obj.len(), 2);
        assert_index_consistent(&obj);
    }

    #[test]
    fn test_erase_middle_then_insert_between() {
        let mut obj: OrderPreservingObject = vec![("e", 1), ("a", 2), ("c", 3), ("g", 4), ("i", 5)]
            .into_iter()
            .collect();
        assert_eq!(obj.index().len(), 5);

        assert_eq!(obj.erase("c").unwrap(), 3);
        assert_index_consistent(&obj);
        assert_eq!(obj.index().len(), 4);

        let (it, inserted) = obj.insert_or_assign("f", 6);
        assert!(inserted);
        assert_eq!(it.pos(), 4);
        assert_index_consistent(&obj);
        assert_eq!(obj.index().len(), 5);

        let found = obj.find("f");
        assert!(!found.is_end());
        assert_eq!(found.key(), "f");
        assert_eq!(*found.value(), 6);
        assert_eq!(keys(&obj), ["e", "a", "g", "i", "f"]);
        for key in ["e", "a", "g", "i"] {
            assert_eq!(obj.find(key).key(), key);
        }
        assert!(obj.find("c").is_end());
    }

    #[test]
    fn test_erase_range_renumbers() {
        let mut obj: OrderPreservingObject = (0..8).rev().map(|i| (format!("k{i}"), i)).collect();
        obj.erase_range(2..5);
        assert_index_consistent(&obj);
        assert_eq!(keys(&obj), ["k7", "k6", "k2", "k1", "k0"]);
        assert_eq!(obj["k2"], 2);
        assert!(obj.get("k4").is_none());

        assert_eq!(obj.erase_at(0).key(), "k7");
        assert_index_consistent(&obj);
        obj.erase_range(..);
        assert_index_consistent(&obj);
        assert!(obj.is_empty());
    }

    #[test]
    fn test_hinted_insert_splices() {
        let mut obj: OrderPreservingObject = vec![("a", 1), ("d", 4)].into_iter().collect();
        assert_eq!(obj.insert_or_assign_hint(1, "c", 3), 1);
        assert_eq!(obj.try_emplace_hint(1, "b", 2), 1);
        assert_eq!(keys(&obj), ["a", "b", "c", "d"]);
        assert_index_consistent(&obj);

        // existing key: no move, report where it lives
        assert_eq!(obj.try_emplace_hint(0, "d", 40), 3);
        assert_eq!(obj["d"], 4);
        assert_eq!(obj.insert_or_assign_hint(0, "d", 40), 3);
        assert_eq!(obj["d"], 40);

        // past the end appends
        assert_eq!(obj.try_emplace_hint(100, "0", 0), 4);
        assert_eq!(keys(&obj), ["a", "b", "c", "d", "0"]);
        assert_index_consistent(&obj);
    }

    #[test]
    fn test_merge() {
        let base: OrderPreservingObject = vec![("z", 1), ("m", 2)].into_iter().collect();
        let source: OrderPreservingObject = vec![("b", 10), ("m", 20), ("a", 30)].into_iter().collect();

        let mut merged = base.clone();
        merged.merge(source.clone());
        assert_eq!(keys(&merged), ["z", "m", "b", "a"]);
        assert_eq!(merged["m"], 2);
        assert_index_consistent(&merged);

        let mut updated = base.clone();
        updated.merge_or_update(source.clone());
        assert_eq!(keys(&updated), ["z", "m", "b", "a"]);
        assert_eq!(updated["m"], 20);

        let mut merged_hint = base.clone();
        merged_hint.merge_hint(1, source.clone());
        // "m" already sits right at the hint, so the hint moves past it
        assert_eq!(keys(&merged_hint), ["z", "b", "m", "a"]);
        assert_eq!(merged_hint["m"], 2);
        assert_index_consistent(&merged_hint);
        assert_eq!(merged_hint, merged);

        let mut updated_hint = base;
        updated_hint.merge_or_update_hint(0, source);
        assert_eq!(keys(&updated_hint), ["b", "a", "z", "m"]);
        assert_eq!(updated_hint["m"], 20);
        assert_index_consistent(&updated_hint);
    }

    #[test]
    fn test_insert_range_existing_wins() {
        let mut obj: OrderPreservingObject = vec![("b", 1)].into_iter().collect();
        obj.insert_range(vec![("c", 2), ("b", 100), ("a", 3), ("c", 4)]);
        assert_eq!(keys(&obj), ["b", "c", "a"]);
        assert_eq!(obj["b"], 1);
        assert_eq!(obj["c"], 2);
        assert_index_consistent(&obj);
    }

    #[test]
    fn test_sorted_unique() {
        let mut obj =
            OrderPreservingObject::from_sorted_unique(SortedUniqueRange, vec![("b", 2), ("d", 4)]);
        obj.insert_sorted_unique(SortedUniqueRange, vec![("a", 1), ("c", 3)]);
        assert_eq!(keys(&obj), ["b", "d", "a", "c"]);
        assert_eq!(obj.index(), &[2, 0, 3, 1]);
        assert_index_consistent(&obj);
    }

    #[test]
    fn test_at_and_clear() {
        let mut obj: OrderPreservingObject = vec![("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(*obj.at(0).unwrap(), 2);
        *obj.at_mut(1).unwrap() = Value::from("one");
        assert_eq!(obj["a"], "one");
        assert!(obj.at(2).unwrap_err().is_out_of_range());

        obj.shrink_to_fit();
        obj.clear();
        assert!(obj.is_empty());
        assert_index_consistent(&obj);
    }
}

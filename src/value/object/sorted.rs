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

/// An object whose members are kept in strictly ascending key order.
///
/// Lookups are binary searches, insertions and removals shift the members
/// behind the affected position.
///
/// # Examples
/// ```
/// use jsontree::{JsonValueTrait, SortedObject};
///
/// let mut obj = SortedObject::new();
/// obj.insert_or_assign("b", 2);
/// obj.insert_or_assign("a", 1);
///
/// let (it, inserted) = obj.try_emplace("a", 100);
/// assert!(!inserted);
/// assert_eq!(it.value().as_i64(), Some(1));
///
/// assert_eq!(obj.keys().collect::<Vec<_>>(), ["a", "b"]);
/// assert_eq!(obj.find("b").pos(), 1);
/// assert!(obj.find("c").is_end());
/// ```
#[derive(Clone)]
pub struct SortedObject {
    pub(crate) members: Vec<KeyValue>,
    alloc: Allocator,
}

impl_object_common!(SortedObject);

impl SortedObject {
    #[cfg_attr(feature = "preserve_order", allow(dead_code))]
    pub(crate) const EMPTY: Self = Self {
        members: Vec::new(),
        alloc: Allocator::global(),
    };

    pub fn with_capacity_in(capacity: usize, alloc: Allocator) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            alloc,
        }
    }

    /// Stable sort by key, then keep the first member of every run of equal
    /// keys.
    pub(crate) fn from_members_in(mut members: Vec<KeyValue>, alloc: Allocator) -> Self {
        for kv in members.iter_mut() {
            kv.value.adopt_in(&alloc);
        }
        members.sort_by(|a, b| a.key().cmp(b.key()));
        members.dedup_by(|later, earlier| later.key() == earlier.key());
        Self { members, alloc }
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.members.reserve(additional);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Members in ascending key order, which for this container is the
    /// container's own order.
    #[inline]
    pub fn iter_by_key(&self) -> KeyOrder<'_> {
        KeyOrder::sorted(&self.members)
    }

    /// First position at or after `start` whose key does not sort before
    /// `key`.
    #[inline]
    fn lower_bound(&self, start: usize, key: &str) -> usize {
        start + self.members[start..].partition_point(|kv| kv.key() < key)
    }

    #[inline]
    pub(crate) fn find_pos(&self, key: &str) -> Option<usize> {
        let pos = self.lower_bound(0, key);
        match self.members.get(pos) {
            Some(kv) if kv.key() == key => Some(pos),
            _ => None,
        }
    }

    /// Searching from a hint is only sound when every member before it
    /// sorts before `key`, i.e. the hinted member itself does not sort
    /// after `key`. Otherwise the search starts over from the beginning.
    #[inline]
    fn search_start(&self, hint: usize, key: &str) -> usize {
        match self.members.get(hint) {
            Some(kv) if kv.key() <= key => hint,
            _ => 0,
        }
    }

    /// `pos` is the lower bound of `key`.
    fn emplace(&mut self, pos: usize, key: &str, value: Value, overwrite: bool) -> (usize, bool) {
        let found = matches!(self.members.get(pos), Some(kv) if kv.key() == key);
        if found {
            if overwrite {
                let mut value = value;
                value.adopt_in(&self.alloc);
                self.members[pos].value = value;
            }
            (pos, false)
        } else {
            let kv = self.member(key, value);
            self.members.insert(pos, kv);
            (pos, true)
        }
    }

    #[inline]
    pub(crate) fn insert_or_assign_pos(&mut self, key: &str, value: Value) -> (usize, bool) {
        let pos = self.lower_bound(0, key);
        self.emplace(pos, key, value, true)
    }

    #[inline]
    pub(crate) fn try_emplace_pos(&mut self, key: &str, value: Value) -> (usize, bool) {
        let pos = self.lower_bound(0, key);
        self.emplace(pos, key, value, false)
    }

    /// [`insert_or_assign`](Self::insert_or_assign) with a position hint.
    ///
    /// The search starts at `hint` when the member there does not sort
    /// after `key`, so feeding ascending keys with the previous result as
    /// hint skips most of the search. Any hint is safe: a wrong one only
    /// costs a full search. Returns the position of the member.
    pub fn insert_or_assign_hint<K: AsRef<str>, V: Into<Value>>(
        &mut self,
        hint: usize,
        key: K,
        value: V,
    ) -> usize {
        let key = key.as_ref();
        let pos = self.lower_bound(self.search_start(hint, key), key);
        self.emplace(pos, key, value.into(), true).0
    }

    /// [`try_emplace`](Self::try_emplace) with a position hint, see
    /// [`insert_or_assign_hint`](Self::insert_or_assign_hint).
    pub fn try_emplace_hint<K: AsRef<str>, V: Into<Value>>(
        &mut self,
        hint: usize,
        key: K,
        value: V,
    ) -> usize {
        let key = key.as_ref();
        let pos = self.lower_bound(self.search_start(hint, key), key);
        self.emplace(pos, key, value.into(), false).0
    }

    /// [`merge`](Self::merge) starting at `hint`. Each member of `source`
    /// is placed with the previous position as hint, which suits a source
    /// sorted the same way.
    pub fn merge_hint(&mut self, hint: usize, source: Self) {
        let mut hint = hint;
        for kv in source.members {
            hint = self.try_emplace_hint(hint, kv.key.as_str(), kv.value);
        }
    }

    /// [`merge_or_update`](Self::merge_or_update) starting at `hint`.
    pub fn merge_or_update_hint(&mut self, hint: usize, source: Self) {
        let mut hint = hint;
        for kv in source.members {
            hint = self.insert_or_assign_hint(hint, kv.key.as_str(), kv.value);
        }
    }

    /// Removes and returns the member at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    #[inline]
    pub fn erase_at(&mut self, pos: usize) -> KeyValue {
        self.members.remove(pos)
    }

    /// Removes the members in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is reversed or ends past the last member.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let range = resolve(range, self.members.len());
        self.members.drain(range);
    }

    /// Inserts pairs in any order. Keys already present keep their value,
    /// and of several incoming pairs with the same key the first one wins.
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
        if self.members.len() == start {
            return;
        }
        // stable: existing members come before incoming ones with equal keys
        self.members.sort_by(|a, b| a.key().cmp(b.key()));
        self.members
            .dedup_by(|later, earlier| later.key() == earlier.key());
    }

    /// Inserts pairs without sorting or deduplicating them. See
    /// [`SortedUniqueRange`] for the caller's promise.
    pub fn insert_sorted_unique<I, K, V>(&mut self, _tag: SortedUniqueRange, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let incoming: Vec<KeyValue> = iter
            .into_iter()
            .map(|(key, value)| self.member(key.as_ref(), value.into()))
            .collect();
        debug_assert!(
            incoming.windows(2).all(|w| w[0].key() < w[1].key()),
            "keys of a sorted unique range must be strictly ascending"
        );

        let appendable = match (self.members.last(), incoming.first()) {
            (Some(last), Some(first)) => last.key() < first.key(),
            _ => true,
        };
        if appendable {
            self.members.extend(incoming);
            return;
        }

        // two sorted runs, one linear merge
        let existing = std::mem::take(&mut self.members);
        self.members.reserve(existing.len() + incoming.len());
        let mut lhs = existing.into_iter().peekable();
        let mut rhs = incoming.into_iter().peekable();
        loop {
            let take_lhs = match (lhs.peek(), rhs.peek()) {
                (Some(a), Some(b)) => {
                    debug_assert_ne!(a.key(), b.key(), "key already present");
                    a.key() < b.key()
                }
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_lhs { lhs.next() } else { rhs.next() };
            self.members.extend(next);
        }
    }

    #[inline]
    fn shrink_storage(&mut self) {
        self.members.shrink_to_fit();
    }
}

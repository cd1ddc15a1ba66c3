//! JSON objects.
//!
//! Two containers share one interface:
//!
//! - [`SortedObject`] keeps its members sorted by key. Lookups are binary
//!   searches over the members themselves, iteration yields keys in
//!   ascending order.
//! - [`OrderPreservingObject`] keeps its members in insertion order and
//!   maintains a separate permutation of member positions sorted by key,
//!   so lookups stay logarithmic while iteration follows insertion order.
//!
//! Both reject duplicate keys. Bulk construction from a list of pairs keeps
//! the first occurrence of every key. [`Object`] names the container used by
//! [`Value`]; it is `SortedObject` unless the `preserve_order` feature is
//! enabled.
//!
//! Equality and ordering never depend on the container: two objects holding
//! the same members compare equal, whichever backend holds them and in
//! whatever order they were inserted.

use std::{cmp::Ordering, iter::FusedIterator, slice};

use super::{kv::KeyValue, node::Value};

mod preserve;
mod sorted;

pub use self::{preserve::OrderPreservingObject, sorted::SortedObject};

cfg_if::cfg_if! {
    if #[cfg(feature = "preserve_order")] {
        /// The object container held by [`Value`]. Insertion order is kept
        /// because the `preserve_order` feature is enabled.
        pub type Object = OrderPreservingObject;
    } else {
        /// The object container held by [`Value`]. Members are kept sorted
        /// by key; enable the `preserve_order` feature to keep insertion
        /// order instead.
        pub type Object = SortedObject;
    }
}

/// Tag for the bulk insertion fast path.
///
/// Passing it asserts that the incoming keys are strictly ascending, unique,
/// and absent from the target object. Nothing is sorted or deduplicated;
/// a violated promise leaves the object inconsistent. Debug builds check the
/// promise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortedUniqueRange;

/// Members in ascending key order, whatever the container's own order.
///
/// Created by `iter_by_key` on both object containers.
pub struct KeyOrder<'a> {
    members: &'a [KeyValue],
    index: Option<slice::Iter<'a, usize>>,
    pos: usize,
}

impl<'a> KeyOrder<'a> {
    pub(crate) fn sorted(members: &'a [KeyValue]) -> Self {
        Self {
            members,
            index: None,
            pos: 0,
        }
    }

    pub(crate) fn indexed(members: &'a [KeyValue], index: &'a [usize]) -> Self {
        debug_assert_eq!(members.len(), index.len());
        Self {
            members,
            index: Some(index.iter()),
            pos: 0,
        }
    }
}

impl<'a> Iterator for KeyOrder<'a> {
    type Item = &'a KeyValue;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.index {
            Some(index) => index.next().map(|&i| &self.members[i]),
            None => {
                let kv = self.members.get(self.pos)?;
                self.pos += 1;
                Some(kv)
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remain = match &self.index {
            Some(index) => index.len(),
            None => self.members.len() - self.pos,
        };
        (remain, Some(remain))
    }
}

impl ExactSizeIterator for KeyOrder<'_> {}

impl FusedIterator for KeyOrder<'_> {}

macro_rules! impl_member_iter {
    (($name:ident $($generics:tt)*): $item:ty, |$kv:ident| $map:expr) => {
        impl $($generics)* Iterator for $name $($generics)* {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.0.next().map(|$kv| $map)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.0.size_hint()
            }
        }

        impl $($generics)* DoubleEndedIterator for $name $($generics)* {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.0.next_back().map(|$kv| $map)
            }
        }

        impl $($generics)* ExactSizeIterator for $name $($generics)* {
            #[inline]
            fn len(&self) -> usize {
                self.0.len()
            }
        }

        impl $($generics)* FusedIterator for $name $($generics)* {}
    };
}

/// An iterator over the keys of an object, in the container's order.
pub struct Keys<'a>(pub(crate) slice::Iter<'a, KeyValue>);
impl_member_iter!((Keys<'a>): &'a str, |kv| kv.key());

/// An iterator over the values of an object, in the container's order.
pub struct Values<'a>(pub(crate) slice::Iter<'a, KeyValue>);
impl_member_iter!((Values<'a>): &'a Value, |kv| &kv.value);

/// A mutable iterator over the values of an object.
pub struct ValuesMut<'a>(pub(crate) slice::IterMut<'a, KeyValue>);
impl_member_iter!((ValuesMut<'a>): &'a mut Value, |kv| &mut kv.value);

/// An iterator over `(key, &mut value)` pairs. Keys stay read-only, so the
/// container order cannot be broken through it.
pub struct MembersMut<'a>(pub(crate) slice::IterMut<'a, KeyValue>);
impl_member_iter!((MembersMut<'a>): (&'a str, &'a mut Value), |kv| (kv.key.as_str(), &mut kv.value));

pub(crate) fn eq_by_key(a: KeyOrder<'_>, b: KeyOrder<'_>) -> bool {
    a.len() == b.len() && a.eq(b)
}

pub(crate) fn cmp_by_key(a: KeyOrder<'_>, b: KeyOrder<'_>) -> Ordering {
    a.cmp(b)
}

// Everything both containers do the same way. Each container provides
// `with_capacity_in`, `from_members_in`, `find_pos`, `insert_or_assign_pos`,
// `try_emplace_pos`, `erase_at`, `insert_range`, `insert_sorted_unique`,
// `shrink_storage` and `iter_by_key`.
macro_rules! impl_object_common {
    ($name:ident) => {
        impl $name {
            /// Creates an empty object on the global heap.
            #[inline]
            pub fn new() -> Self {
                Self::with_capacity_in(0, Allocator::global())
            }

            /// Creates an empty object whose values are allocated by `alloc`.
            #[inline]
            pub fn new_in(alloc: Allocator) -> Self {
                Self::with_capacity_in(0, alloc)
            }

            #[inline]
            pub fn with_capacity(capacity: usize) -> Self {
                Self::with_capacity_in(capacity, Allocator::global())
            }

            /// Builds an object from pairs, keeping the first occurrence of
            /// every duplicated key.
            pub fn from_pairs_in<I, K, V>(iter: I, alloc: Allocator) -> Self
            where
                I: IntoIterator<Item = (K, V)>,
                K: AsRef<str>,
                V: Into<Value>,
            {
                let members = iter.into_iter().map(KeyValue::from).collect();
                Self::from_members_in(members, alloc)
            }

            /// Builds an object from pairs whose keys are already strictly
            /// ascending and unique. See [`SortedUniqueRange`].
            pub fn from_sorted_unique<I, K, V>(tag: SortedUniqueRange, iter: I) -> Self
            where
                I: IntoIterator<Item = (K, V)>,
                K: AsRef<str>,
                V: Into<Value>,
            {
                let mut obj = Self::new();
                obj.insert_sorted_unique(tag, iter);
                obj
            }

            #[inline]
            pub fn allocator(&self) -> &Allocator {
                &self.alloc
            }

            #[inline]
            pub fn len(&self) -> usize {
                self.members.len()
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.members.is_empty()
            }

            #[inline]
            pub fn capacity(&self) -> usize {
                self.members.capacity()
            }

            /// The members in the container's order.
            #[inline]
            pub fn as_slice(&self) -> &[KeyValue] {
                &self.members
            }

            /// The value of the member at position `i` in the container's
            /// order.
            ///
            /// # Errors
            ///
            /// Returns an out-of-range error if `i >= self.len()`.
            pub fn at(&self, i: usize) -> Result<&Value> {
                self.members
                    .get(i)
                    .map(|kv| &kv.value)
                    .ok_or_else(|| Error::out_of_range(i, self.members.len()))
            }

            pub fn at_mut(&mut self, i: usize) -> Result<&mut Value> {
                let len = self.members.len();
                self.members
                    .get_mut(i)
                    .map(|kv| &mut kv.value)
                    .ok_or_else(|| Error::out_of_range(i, len))
            }

            /// A cursor at the member with `key`, or the end cursor.
            #[inline]
            pub fn find(&self, key: &str) -> Iter<'_, KeyValue> {
                let pos = self.find_pos(key).unwrap_or(self.members.len());
                Iter::new(&self.members, pos)
            }

            /// Mutable variant of [`find`](Self::find). Replacing a whole
            /// member through the cursor must keep its key.
            #[inline]
            pub fn find_mut(&mut self, key: &str) -> IterMut<'_, KeyValue> {
                let pos = self.find_pos(key).unwrap_or(self.members.len());
                IterMut::new(&mut self.members, pos)
            }

            #[inline]
            pub fn get<Q: AsRef<str> + ?Sized>(&self, key: &Q) -> Option<&Value> {
                let pos = self.find_pos(key.as_ref())?;
                Some(&self.members[pos].value)
            }

            #[inline]
            pub fn get_mut<Q: AsRef<str> + ?Sized>(&mut self, key: &Q) -> Option<&mut Value> {
                let pos = self.find_pos(key.as_ref())?;
                Some(&mut self.members[pos].value)
            }

            #[inline]
            pub fn get_key_value<Q: AsRef<str> + ?Sized>(&self, key: &Q) -> Option<(&str, &Value)> {
                let pos = self.find_pos(key.as_ref())?;
                Some(self.members[pos].as_pair())
            }

            #[inline]
            pub fn contains_key<Q: AsRef<str> + ?Sized>(&self, key: &Q) -> bool {
                self.find_pos(key.as_ref()).is_some()
            }

            /// Inserts `value` under `key`, overwriting the value of an
            /// existing member. Returns a cursor at the member and whether
            /// it was newly inserted.
            pub fn insert_or_assign<K: AsRef<str>, V: Into<Value>>(
                &mut self,
                key: K,
                value: V,
            ) -> (IterMut<'_, KeyValue>, bool) {
                let (pos, inserted) = self.insert_or_assign_pos(key.as_ref(), value.into());
                (IterMut::new(&mut self.members, pos), inserted)
            }

            /// Like [`insert_or_assign`](Self::insert_or_assign), but an
            /// arena that cannot hold the value reports an error instead of
            /// aborting. The object is left untouched on error.
            pub fn try_insert_or_assign<K: AsRef<str>, V: Into<Value>>(
                &mut self,
                key: K,
                value: V,
            ) -> Result<(IterMut<'_, KeyValue>, bool)> {
                let mut value = value.into();
                value.try_adopt_in(&self.alloc).or_error()?;
                Ok(self.insert_or_assign(key, value))
            }

            /// Inserts `value` under `key` unless the key is present, in
            /// which case the existing member is left as is.
            pub fn try_emplace<K: AsRef<str>, V: Into<Value>>(
                &mut self,
                key: K,
                value: V,
            ) -> (IterMut<'_, KeyValue>, bool) {
                let (pos, inserted) = self.try_emplace_pos(key.as_ref(), value.into());
                (IterMut::new(&mut self.members, pos), inserted)
            }

            /// Removes the member with `key`, returning its value.
            pub fn erase<Q: AsRef<str> + ?Sized>(&mut self, key: &Q) -> Option<Value> {
                let pos = self.find_pos(key.as_ref())?;
                Some(self.erase_at(pos).value)
            }

            /// Copies every member of `source` whose key is absent here.
            pub fn merge(&mut self, source: Self) {
                for kv in source.members {
                    self.try_emplace_pos(kv.key.as_str(), kv.value);
                }
            }

            /// Copies every member of `source`, overwriting values of keys
            /// present in both.
            pub fn merge_or_update(&mut self, source: Self) {
                for kv in source.members {
                    self.insert_or_assign_pos(kv.key.as_str(), kv.value);
                }
            }

            /// Shrinks the capacity of the object and of every value in it.
            pub fn shrink_to_fit(&mut self) {
                for kv in self.members.iter_mut() {
                    kv.value.shrink_to_fit();
                }
                self.shrink_storage();
            }

            #[inline]
            pub fn swap(&mut self, other: &mut Self) {
                std::mem::swap(self, other);
            }

            #[inline]
            pub fn begin(&self) -> Iter<'_, KeyValue> {
                Iter::new(&self.members, 0)
            }

            #[inline]
            pub fn end(&self) -> Iter<'_, KeyValue> {
                Iter::new(&self.members, self.members.len())
            }

            /// A mutable cursor at the first member. Replacing a whole
            /// member through the cursor must keep its key.
            #[inline]
            pub fn begin_mut(&mut self) -> IterMut<'_, KeyValue> {
                IterMut::new(&mut self.members, 0)
            }

            /// Walks the members in the container's order.
            #[inline]
            pub fn iter(&self) -> Iter<'_, KeyValue> {
                self.begin()
            }

            #[inline]
            pub fn iter_mut(&mut self) -> MembersMut<'_> {
                MembersMut(self.members.iter_mut())
            }

            #[inline]
            pub fn keys(&self) -> Keys<'_> {
                Keys(self.members.iter())
            }

            #[inline]
            pub fn values(&self) -> Values<'_> {
                Values(self.members.iter())
            }

            #[inline]
            pub fn values_mut(&mut self) -> ValuesMut<'_> {
                ValuesMut(self.members.iter_mut())
            }

            /// The member for a fresh insertion, its value moved into this
            /// object's allocator.
            #[inline]
            pub(crate) fn member(&self, key: &str, mut value: Value) -> KeyValue {
                value.adopt_in(&self.alloc);
                KeyValue {
                    key: FastStr::new(key),
                    value,
                }
            }

            // only reached through `Value` for the backend `Object` names
            #[allow(dead_code)]
            pub(crate) fn try_adopt_in(&mut self, alloc: &Allocator) -> AllocResult<()> {
                if self.alloc.same_as(alloc) {
                    return Ok(());
                }
                for kv in self.members.iter_mut() {
                    kv.value.try_adopt_in(alloc)?;
                }
                self.alloc = alloc.clone();
                Ok(())
            }
        }

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_map()
                    .entries(self.members.iter().map(KeyValue::as_pair))
                    .finish()
            }
        }

        impl<Q: AsRef<str> + ?Sized> std::ops::Index<&Q> for $name {
            type Output = Value;

            /// Returns `null` for a missing key.
            #[inline]
            fn index(&self, key: &Q) -> &Value {
                self.get(key).unwrap_or(&NULL)
            }
        }

        impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for $name {
            fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
                Self::from_pairs_in(iter, Allocator::global())
            }
        }

        impl FromIterator<KeyValue> for $name {
            fn from_iter<T: IntoIterator<Item = KeyValue>>(iter: T) -> Self {
                Self::from_members_in(iter.into_iter().collect(), Allocator::global())
            }
        }

        impl<K: AsRef<str>, V: Into<Value>> Extend<(K, V)> for $name {
            fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
                self.insert_range(iter);
            }
        }

        impl IntoIterator for $name {
            type Item = KeyValue;
            type IntoIter = std::vec::IntoIter<KeyValue>;

            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                self.members.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a KeyValue;
            type IntoIter = Iter<'a, KeyValue>;

            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a> IntoIterator for &'a mut $name {
            type Item = (&'a str, &'a mut Value);
            type IntoIter = MembersMut<'a>;

            #[inline]
            fn into_iter(self) -> Self::IntoIter {
                self.iter_mut()
            }
        }

        impl PartialEq for $name {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                super::eq_by_key(self.iter_by_key(), other.iter_by_key())
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            /// Compares members in ascending key order, entry by entry.
            #[inline]
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                super::cmp_by_key(self.iter_by_key(), other.iter_by_key())
            }
        }
    };
}

pub(crate) use impl_object_common;

impl PartialEq<OrderPreservingObject> for SortedObject {
    #[inline]
    fn eq(&self, other: &OrderPreservingObject) -> bool {
        eq_by_key(self.iter_by_key(), other.iter_by_key())
    }
}

impl PartialEq<SortedObject> for OrderPreservingObject {
    #[inline]
    fn eq(&self, other: &SortedObject) -> bool {
        eq_by_key(self.iter_by_key(), other.iter_by_key())
    }
}

impl PartialOrd<OrderPreservingObject> for SortedObject {
    #[inline]
    fn partial_cmp(&self, other: &OrderPreservingObject) -> Option<Ordering> {
        Some(cmp_by_key(self.iter_by_key(), other.iter_by_key()))
    }
}

impl PartialOrd<SortedObject> for OrderPreservingObject {
    #[inline]
    fn partial_cmp(&self, other: &SortedObject) -> Option<Ordering> {
        Some(cmp_by_key(self.iter_by_key(), other.iter_by_key()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::JsonValueTrait;

    const PAIRS: [(&str, i64); 5] = [("delta", 4), ("alpha", 1), ("echo", 5), ("charlie", 3), ("bravo", 2)];

    #[test]
    fn test_backend_equivalence() {
        let sorted: SortedObject = PAIRS.iter().copied().collect();
        let preserved: OrderPreservingObject = PAIRS.iter().rev().copied().collect();

        assert_eq!(sorted, preserved);
        assert_eq!(preserved, sorted);
        assert_eq!(sorted.partial_cmp(&preserved), Some(Ordering::Equal));

        // the containers disagree on their own order ...
        assert_eq!(sorted.keys().next(), Some("alpha"));
        assert_eq!(preserved.keys().next(), Some("bravo"));
        // ... but agree on key order
        let a: Vec<&str> = sorted.iter_by_key().map(KeyValue::key).collect();
        let b: Vec<&str> = preserved.iter_by_key().map(KeyValue::key).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_backend_inequality() {
        let sorted: SortedObject = PAIRS.iter().copied().collect();
        let mut preserved: OrderPreservingObject = PAIRS.iter().copied().collect();
        preserved.insert_or_assign("alpha", 100);
        assert_ne!(sorted, preserved);
        assert_eq!(sorted.partial_cmp(&preserved), Some(Ordering::Less));

        preserved.insert_or_assign("alpha", 1);
        preserved.erase("echo");
        assert_ne!(preserved, sorted);
        assert_eq!(preserved.partial_cmp(&sorted), Some(Ordering::Less));
    }

    #[test]
    fn test_member_iters() {
        let mut obj: SortedObject = PAIRS.iter().copied().collect();
        assert_eq!(obj.values().len(), 5);
        assert_eq!(obj.keys().next_back(), Some("echo"));
        for v in obj.values_mut() {
            *v = Value::from(0);
        }
        for (k, v) in &mut obj {
            if k == "charlie" {
                *v = Value::from(true);
            }
        }
        assert_eq!(obj["charlie"], true);
        assert_eq!(obj["alpha"], 0);
        assert!(obj["missing"].is_null());
    }
}

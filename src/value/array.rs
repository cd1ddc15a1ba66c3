use std::{
    fmt,
    ops::{Deref, DerefMut, RangeBounds},
    slice, vec,
};

use super::{
    allocator::{AllocResult, AllocResultExt, Allocator},
    iter::{Iter, IterMut},
    node::Value,
};
use crate::{error::Error, util::range::resolve, Result};

/// Array represents a JSON array. Its APIs are like `Vec<Value>`, plus
/// cursor positions shared with the object containers.
///
/// Values pushed into an array created with an arena allocator have their
/// long strings copied into that arena.
///
/// # Example
/// ```
/// use jsontree::{Array, JsonValueTrait};
///
/// let mut arr = Array::new();
/// arr.push("Toronto");
/// arr.push("Vancouver");
/// let it = arr.insert(0, "Montreal");
/// assert_eq!(it.pos(), 0);
///
/// assert_eq!(arr, ["Montreal", "Toronto", "Vancouver"]);
/// assert_eq!(arr[1].as_str(), Some("Toronto"));
/// ```
#[derive(Clone, Default)]
pub struct Array {
    elements: Vec<Value>,
    alloc: Allocator,
}

impl Array {
    /// Constructs a new, empty `Array`.
    ///
    /// The array will not allocate until elements are pushed onto it.
    #[inline]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            alloc: Allocator::global(),
        }
    }

    #[inline]
    pub fn new_in(alloc: Allocator) -> Self {
        Self::with_capacity_in(0, alloc)
    }

    /// Constructs a new, empty `Array` with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Allocator::global())
    }

    #[inline]
    pub fn with_capacity_in(capacity: usize, alloc: Allocator) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            alloc,
        }
    }

    /// An array holding `n` copies of `value`.
    ///
    /// # Examples
    /// ```
    /// use jsontree::{array, Array};
    ///
    /// let grid = Array::from_elem(2, array![0, 0, 0]);
    /// assert_eq!(grid, [array![0, 0, 0], array![0, 0, 0]]);
    /// ```
    pub fn from_elem<V: Into<Value>>(n: usize, value: V) -> Self {
        let mut arr = Self::new();
        arr.resize(n, value);
        arr
    }

    #[inline]
    pub fn allocator(&self) -> &Allocator {
        &self.alloc
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
    }

    /// Resizes the array in place, filling new slots with copies of `value`.
    pub fn resize<V: Into<Value>>(&mut self, new_len: usize, value: V) {
        let mut value = value.into();
        value.adopt_in(&self.alloc);
        self.elements.resize(new_len, value);
    }

    /// Resizes the array in place, filling new slots with the results of `f`.
    pub fn resize_with<F: FnMut() -> Value>(&mut self, new_len: usize, mut f: F) {
        let alloc = &self.alloc;
        self.elements.resize_with(new_len, || {
            let mut value = f();
            value.adopt_in(alloc);
            value
        });
    }

    #[inline]
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Shrinks the capacity of the array and of every container in it.
    pub fn shrink_to_fit(&mut self) {
        for value in self.elements.iter_mut() {
            value.shrink_to_fit();
        }
        self.elements.shrink_to_fit();
    }

    #[inline]
    fn element(&self, value: Value) -> Value {
        let mut value = value;
        value.adopt_in(&self.alloc);
        value
    }

    /// Appends an element to the back of the array.
    #[inline]
    pub fn push<V: Into<Value>>(&mut self, value: V) {
        let value = self.element(value.into());
        self.elements.push(value);
    }

    /// Appends an element, reporting an arena that cannot hold it. The
    /// array is left untouched on error.
    pub fn try_push<V: Into<Value>>(&mut self, value: V) -> Result<()> {
        let mut value = value.into();
        value.try_adopt_in(&self.alloc).or_error()?;
        self.elements.push(value);
        Ok(())
    }

    /// Appends an element and returns it.
    pub fn emplace_back<V: Into<Value>>(&mut self, value: V) -> &mut Value {
        self.push(value);
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Value> {
        self.elements.pop()
    }

    /// Inserts an element at `pos`, shifting the following elements back.
    /// Returns a cursor at the new element.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`.
    pub fn insert<V: Into<Value>>(&mut self, pos: usize, value: V) -> IterMut<'_, Value> {
        let value = self.element(value.into());
        self.elements.insert(pos, value);
        IterMut::new(&mut self.elements, pos)
    }

    /// Inserts every element of `iter` at `pos`, in order. Returns a cursor
    /// at the first inserted element, or at `pos` if nothing was inserted.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len`.
    pub fn insert_range<I, V>(&mut self, pos: usize, iter: I) -> IterMut<'_, Value>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        assert!(
            pos <= self.elements.len(),
            "insertion position {pos} out of range for array of size {}",
            self.elements.len()
        );
        let incoming: Vec<Value> = iter
            .into_iter()
            .map(|v| self.element(v.into()))
            .collect();
        self.elements.splice(pos..pos, incoming);
        IterMut::new(&mut self.elements, pos)
    }

    /// Removes and returns the element at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    #[inline]
    pub fn erase(&mut self, pos: usize) -> Value {
        self.elements.remove(pos)
    }

    /// Removes the elements in `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is reversed or ends past the last element.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let range = resolve(range, self.elements.len());
        self.elements.drain(range);
    }

    /// The element at `i`.
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error if `i >= len`.
    pub fn at(&self, i: usize) -> Result<&Value> {
        self.elements
            .get(i)
            .ok_or_else(|| Error::out_of_range(i, self.elements.len()))
    }

    pub fn at_mut(&mut self, i: usize) -> Result<&mut Value> {
        let len = self.elements.len();
        self.elements
            .get_mut(i)
            .ok_or_else(|| Error::out_of_range(i, len))
    }

    #[inline]
    pub fn begin(&self) -> Iter<'_, Value> {
        Iter::new(&self.elements, 0)
    }

    #[inline]
    pub fn end(&self) -> Iter<'_, Value> {
        Iter::new(&self.elements, self.elements.len())
    }

    #[inline]
    pub fn begin_mut(&mut self) -> IterMut<'_, Value> {
        IterMut::new(&mut self.elements, 0)
    }

    #[inline]
    pub fn end_mut(&mut self) -> IterMut<'_, Value> {
        let len = self.elements.len();
        IterMut::new(&mut self.elements, len)
    }

    #[inline]
    pub fn swap(&mut self, other: &mut Array) {
        std::mem::swap(self, other);
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Value] {
        &mut self.elements
    }

    pub(crate) fn try_adopt_in(&mut self, alloc: &Allocator) -> AllocResult<()> {
        if self.alloc.same_as(alloc) {
            return Ok(());
        }
        for value in self.elements.iter_mut() {
            value.try_adopt_in(alloc)?;
        }
        self.alloc = alloc.clone();
        Ok(())
    }
}

impl Deref for Array {
    type Target = [Value];

    #[inline]
    fn deref(&self) -> &[Value] {
        &self.elements
    }
}

/// Elements replaced through the slice keep their own allocator.
impl DerefMut for Array {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Value] {
        &mut self.elements
    }
}

impl AsRef<[Value]> for Array {
    #[inline]
    fn as_ref(&self) -> &[Value] {
        &self.elements
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements.iter()).finish()
    }
}

impl PartialEq for Array {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for Array {}

impl PartialOrd for Array {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Array {
    /// Lexicographic, element by element.
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.elements.cmp(&other.elements)
    }
}

impl<T: Into<Value>> FromIterator<T> for Array {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().map(Into::into).collect(),
            alloc: Allocator::global(),
        }
    }
}

impl<T: Into<Value>> Extend<T> for Array {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let alloc = self.alloc.clone();
        self.elements.extend(iter.into_iter().map(|v| {
            let mut value = v.into();
            value.adopt_in(&alloc);
            value
        }));
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = vec::IntoIter<Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a mut Array {
    type Item = &'a mut Value;
    type IntoIter = slice::IterMut<'a, Value>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{array, object, JsonValueTrait};

    #[test]
    fn test_push_and_insert_front() {
        let mut arr = Array::new();
        arr.push("Toronto");
        arr.push("Vancouver");
        {
            let it = arr.insert(0, "Montreal");
            assert_eq!(it.pos(), 0);
            assert_eq!(*it, "Montreal");
        }
        assert_eq!(arr.len(), 3);
        assert_eq!(arr, ["Montreal", "Toronto", "Vancouver"]);
    }

    #[test]
    fn test_insert_range() {
        let mut arr: Array = vec![1, 5].into_iter().collect();
        let it = arr.insert_range(1, [2, 3, 4]);
        assert_eq!(it.pos(), 1);
        assert_eq!(*it, 2);
        assert_eq!(arr, [1, 2, 3, 4, 5]);

        let it = arr.insert_range(5, Vec::<Value>::new());
        assert!(it.is_end());
        assert_eq!(arr.len(), 5);
    }

    #[test]
    fn test_erase() {
        let mut arr: Array = (0..6).collect();
        assert_eq!(arr.erase(0), 0);
        arr.erase_range(1..3);
        assert_eq!(arr, [1, 4, 5]);
        arr.erase_range(..);
        assert!(arr.is_empty());
    }

    #[test]
    fn test_at() {
        let arr: Array = vec!["a", "b"].into_iter().collect();
        assert_eq!(arr.at(1).unwrap().as_str(), Some("b"));
        let err = arr.at(2).unwrap_err();
        assert!(err.is_out_of_range());
        assert_eq!(
            err.to_string(),
            "Invalid array subscript: index 2 is out of range for size 2"
        );
        assert!(arr.get(2).is_none());
    }

    #[test]
    fn test_resize_and_capacity() {
        let mut arr = Array::with_capacity(16);
        assert!(arr.capacity() >= 16);
        arr.resize(3, 7);
        assert_eq!(arr, [7, 7, 7]);
        arr.resize(1, 0);
        assert_eq!(arr, [7]);
        let mut n = 0;
        arr.resize_with(3, || {
            n += 1;
            Value::from(n)
        });
        assert_eq!(arr, [7, 1, 2]);

        arr.shrink_to_fit();
        assert_eq!(arr.capacity(), 3);
        arr.reserve(10);
        assert!(arr.capacity() >= 13);
    }

    #[test]
    fn test_nested_shrink() {
        let mut inner = Array::with_capacity(32);
        inner.push(1);
        let mut outer = Array::new();
        outer.push(inner);
        outer.shrink_to_fit();
        assert_eq!(outer[0].capacity(), 1);
    }

    #[test]
    fn test_from_elem_two_levels() {
        let grid = Array::from_elem(2, Array::from_elem(3, 0.0));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1].len(), 3);
        assert_eq!(grid[1][2], 0.0);
    }

    #[test]
    fn test_cursors() {
        let mut arr: Array = (1..=4).collect();
        let begin = arr.begin();
        let end = arr.end();
        assert_eq!(end - begin, 4);
        assert_eq!(begin[2], 3);
        let total: i64 = arr.iter().filter_map(|v| v.as_i64()).sum();
        assert_eq!(total, 10);

        let mut it = arr.begin_mut();
        it += 3;
        *it = Value::from("last");
        assert!(arr.end_mut().is_end());
        assert_eq!(arr[3], "last");
    }

    #[test]
    fn test_order() {
        let a: Array = vec![1, 2].into_iter().collect();
        let b: Array = vec![1, 3].into_iter().collect();
        let c: Array = vec![1, 2, 0].into_iter().collect();
        assert!(a < b);
        assert!(a < c);
        assert!(c < b);
        assert_eq!(a.clone().max(b.clone()), b);
    }

    #[test]
    fn test_emplace_back_and_pop() {
        let mut arr = Array::new();
        *arr.emplace_back(Value::new_object()) = object! {"k": 1};
        arr.emplace_back(array![]).push(2).unwrap();
        assert_eq!(arr[0]["k"], 1);
        assert_eq!(arr[1][0], 2);
        assert_eq!(arr.pop(), Some(array![2]));
        assert_eq!(arr.len(), 1);

        let mut other = Array::new();
        other.swap(&mut arr);
        assert!(arr.is_empty());
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_arena() {
        let alloc = Allocator::arena();
        let mut arr = Array::new_in(alloc.clone());
        arr.push("a string that is too long to be stored inline");
        let used = alloc.allocated_bytes();
        assert!(used > 0);
        arr.extend(["another string that is too long to be stored inline"]);
        assert!(alloc.allocated_bytes() > used);

        let limited = Allocator::arena_with(crate::ArenaCfg::default().limit(0));
        let mut arr = Array::new_in(limited);
        let err = arr.try_push("x".repeat(4096).as_str()).unwrap_err();
        assert!(err.is_alloc());
        assert!(arr.is_empty());
        arr.try_push("short").unwrap();
        assert_eq!(arr, ["short"]);
    }
}

//! Random-access cursors over the contiguous storage of arrays and objects.
//!
//! A cursor is a position in a borrowed slice. It supports the usual cursor
//! arithmetic: stepping, jumping by a signed offset, distance between two
//! cursors of the same container, subscripts relative to the position and
//! ordering by position. [`Iter`] additionally walks forward as a
//! [`std::iter::Iterator`]. [`IterMut`] hands out `&mut` access to a single
//! element at a time and converts into an `Iter`, never the other way round.
//!
//! Arithmetic is unchecked in release builds; moving a cursor outside
//! `[begin, end]` of its container is a logic error caught only by debug
//! assertions. Dereferencing goes through slice indexing, so dereferencing the
//! end cursor panics instead of reading out of bounds.

use std::{
    cmp::Ordering,
    fmt,
    iter::FusedIterator,
    ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Sub, SubAssign},
};

#[inline]
fn offset(pos: usize, len: usize, n: isize) -> usize {
    let new = pos.wrapping_add_signed(n);
    debug_assert!(new <= len, "cursor moved outside of its container");
    new
}

/// A read-only cursor.
pub struct Iter<'a, T> {
    slice: &'a [T],
    pos: usize,
}

impl<'a, T> Iter<'a, T> {
    #[inline]
    pub(crate) fn new(slice: &'a [T], pos: usize) -> Self {
        debug_assert!(pos <= slice.len());
        Self { slice, pos }
    }

    /// Position of the cursor from the beginning of its container.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos >= self.slice.len()
    }

    /// The element under the cursor, `None` at the end.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        self.slice.get(self.pos)
    }

    /// The elements from the cursor to the end of the container.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        &self.slice[self.pos.min(self.slice.len())..]
    }

    #[inline]
    pub fn inc(&mut self) -> &mut Self {
        *self += 1;
        self
    }

    #[inline]
    pub fn dec(&mut self) -> &mut Self {
        *self -= 1;
        self
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Iter<'_, T> {}

impl<T> Deref for Iter<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.slice[self.pos]
    }
}

impl<T> Index<isize> for Iter<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, n: isize) -> &T {
        &self.slice[self.pos.wrapping_add_signed(n)]
    }
}

impl<T> AddAssign<isize> for Iter<'_, T> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.pos = offset(self.pos, self.slice.len(), n);
    }
}

impl<T> SubAssign<isize> for Iter<'_, T> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.pos = offset(self.pos, self.slice.len(), n.wrapping_neg());
    }
}

impl<T> Add<isize> for Iter<'_, T> {
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self += n;
        self
    }
}

impl<T> Sub<isize> for Iter<'_, T> {
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self -= n;
        self
    }
}

impl<'a, T> Sub<Iter<'a, T>> for Iter<'a, T> {
    type Output = isize;

    /// Signed distance between two cursors of the same container.
    #[inline]
    fn sub(self, rhs: Iter<'a, T>) -> isize {
        debug_assert!(std::ptr::eq(self.slice, rhs.slice));
        self.pos as isize - rhs.pos as isize
    }
}

impl<T> PartialEq for Iter<'_, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(std::ptr::eq(self.slice, other.slice));
        self.pos == other.pos
    }
}

impl<T> Eq for Iter<'_, T> {}

impl<T> PartialOrd for Iter<'_, T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl<T> Ord for Iter<'_, T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert!(std::ptr::eq(self.slice, other.slice));
        self.pos.cmp(&other.pos)
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let item = self.slice.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remain = self.slice.len().saturating_sub(self.pos);
        (remain, Some(remain))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("pos", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

/// A mutable cursor.
///
/// Unlike [`Iter`] it is not an iterator itself, because handing out
/// several `&mut` from one cursor would alias. Use
/// [`IterMut::into_slice_iter`] to walk the rest of the container mutably.
pub struct IterMut<'a, T> {
    slice: &'a mut [T],
    pos: usize,
}

impl<'a, T> IterMut<'a, T> {
    #[inline]
    pub(crate) fn new(slice: &'a mut [T], pos: usize) -> Self {
        debug_assert!(pos <= slice.len());
        Self { slice, pos }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos >= self.slice.len()
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.slice.get(self.pos)
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.slice.get_mut(self.pos)
    }

    /// A read-only cursor at the same position, borrowing from this one.
    #[inline]
    pub fn as_iter(&self) -> Iter<'_, T> {
        Iter::new(self.slice, self.pos)
    }

    /// Consumes the cursor, returning the element under it for the whole
    /// borrow of the container. Panics at the end.
    #[inline]
    pub fn into_mut(self) -> &'a mut T {
        &mut self.slice[self.pos]
    }

    /// Consumes the cursor, returning a mutable iterator over the elements
    /// from the cursor to the end.
    #[inline]
    pub fn into_slice_iter(self) -> std::slice::IterMut<'a, T> {
        let pos = self.pos.min(self.slice.len());
        self.slice[pos..].iter_mut()
    }

    #[inline]
    pub fn inc(&mut self) -> &mut Self {
        *self += 1;
        self
    }

    #[inline]
    pub fn dec(&mut self) -> &mut Self {
        *self -= 1;
        self
    }
}

impl<'a, T> From<IterMut<'a, T>> for Iter<'a, T> {
    #[inline]
    fn from(it: IterMut<'a, T>) -> Self {
        let IterMut { slice, pos } = it;
        Iter::new(slice, pos)
    }
}

impl<T> Deref for IterMut<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.slice[self.pos]
    }
}

impl<T> DerefMut for IterMut<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.slice[self.pos]
    }
}

impl<T> Index<isize> for IterMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, n: isize) -> &T {
        &self.slice[self.pos.wrapping_add_signed(n)]
    }
}

impl<T> IndexMut<isize> for IterMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, n: isize) -> &mut T {
        &mut self.slice[self.pos.wrapping_add_signed(n)]
    }
}

impl<T> AddAssign<isize> for IterMut<'_, T> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.pos = offset(self.pos, self.slice.len(), n);
    }
}

impl<T> SubAssign<isize> for IterMut<'_, T> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.pos = offset(self.pos, self.slice.len(), n.wrapping_neg());
    }
}

impl<T> Add<isize> for IterMut<'_, T> {
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self += n;
        self
    }
}

impl<T> Sub<isize> for IterMut<'_, T> {
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self -= n;
        self
    }
}

impl<T> PartialEq for IterMut<'_, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<T> Eq for IterMut<'_, T> {}

impl<T> PartialOrd for IterMut<'_, T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.pos.cmp(&other.pos))
    }
}

impl<T> Ord for IterMut<'_, T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos.cmp(&other.pos)
    }
}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("pos", &self.pos)
            .field("len", &self.slice.len())
            .finish()
    }
}

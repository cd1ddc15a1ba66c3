use std::ops::{Bound, Range, RangeBounds};

/// Resolves `range` against a container of `len` elements.
///
/// Panics like slice indexing does when the range is reversed or reaches
/// past `len`.
#[inline]
#[track_caller]
pub(crate) fn resolve<R>(range: R, len: usize) -> Range<usize>
where
    R: RangeBounds<usize>,
{
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start
            .checked_add(1)
            .unwrap_or_else(|| panic!("range start overflows usize")),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end
            .checked_add(1)
            .unwrap_or_else(|| panic!("range end overflows usize")),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    if start > end {
        panic!("range starts at {start} but ends at {end}");
    }
    if end > len {
        panic!("range end {end} out of range for container of size {len}");
    }
    start..end
}

#[cfg(test)]
mod test {
    use super::resolve;

    #[test]
    fn test_resolve() {
        assert_eq!(resolve(.., 4), 0..4);
        assert_eq!(resolve(1..=2, 4), 1..3);
        assert_eq!(resolve(2.., 4), 2..4);
        assert_eq!(resolve(..0, 4), 0..0);
    }

    #[test]
    #[should_panic]
    fn test_resolve_past_end() {
        resolve(0..5, 4);
    }
}

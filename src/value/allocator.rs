//! Allocators for string payloads.
//!
//! A value tree either lives on the global heap, where long strings and byte
//! strings are reference counted and shared between clones, or inside an
//! arena. Arena payloads keep their arena alive, so a value can outlive the
//! container that created it.

use std::{
    alloc::{handle_alloc_error, Layout},
    fmt,
    ptr::NonNull,
    sync::Arc,
};

use bumpalo::Bump;
use parking_lot::Mutex;

use crate::{config::ArenaCfg, error::Error, Result};

/// Internal allocation result, carrying the refused layout.
pub(crate) type AllocResult<T> = std::result::Result<T, Layout>;

/// Turns a refused allocation into either a reported error or an abort.
pub(crate) trait AllocResultExt<T> {
    /// For the `try_*` entry points.
    fn or_error(self) -> Result<T>;

    /// For the infallible entry points, which behave like a failed `Vec`
    /// growth.
    fn or_abort(self) -> T;
}

impl<T> AllocResultExt<T> for AllocResult<T> {
    #[inline]
    fn or_error(self) -> Result<T> {
        self.map_err(|layout| Error::alloc_failed(layout.size()))
    }

    #[inline]
    fn or_abort(self) -> T {
        match self {
            Ok(v) => v,
            Err(layout) => handle_alloc_error(layout),
        }
    }
}

struct ArenaInner {
    bump: Bump,
    // payload bytes copied in so far, not chunk capacity
    used: usize,
    limit: Option<usize>,
}

/// A bump arena shared by every payload allocated from it.
pub(crate) struct Arena(Mutex<ArenaInner>);

impl Arena {
    fn new(cfg: ArenaCfg) -> Self {
        Self(Mutex::new(ArenaInner {
            bump: Bump::with_capacity(cfg.initial_capacity),
            used: 0,
            limit: cfg.allocation_limit,
        }))
    }

    fn try_copy(&self, bytes: &[u8]) -> AllocResult<NonNull<u8>> {
        let layout = Layout::for_value(bytes);
        if bytes.is_empty() {
            return Ok(NonNull::dangling());
        }
        let mut inner = self.0.lock();
        let used = inner.used.checked_add(bytes.len()).ok_or(layout)?;
        if inner.limit.is_some_and(|limit| used > limit) {
            return Err(layout);
        }
        let ptr = inner.bump.try_alloc_layout(layout).map_err(|_| layout)?;
        inner.used = used;
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
        }
        Ok(ptr)
    }

    fn used(&self) -> usize {
        self.0.lock().used
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.lock();
        f.debug_struct("Arena")
            .field("allocated_bytes", &inner.used)
            .field("limit", &inner.limit)
            .finish()
    }
}

/// The allocator a container hands to the values it creates.
///
/// `Allocator::global()` is stateless: payloads go to the global heap and
/// every allocator-threading step short-circuits. `Allocator::arena()` is
/// stateful: long strings and byte strings inserted into containers created
/// with it are copied into the arena.
///
/// # Examples
/// ```
/// use jsontree::{Allocator, Array, Value};
///
/// let alloc = Allocator::arena();
/// let mut arr = Array::new_in(alloc.clone());
/// arr.push(Value::from("a string that is too long to be stored inline"));
/// assert!(alloc.allocated_bytes() > 0);
/// assert!(Allocator::global().is_stateless());
/// ```
#[derive(Clone, Default)]
pub struct Allocator {
    arena: Option<Arc<Arena>>,
}

impl Allocator {
    /// The stateless global-heap allocator.
    pub const fn global() -> Self {
        Self { arena: None }
    }

    /// A fresh arena with default options.
    pub fn arena() -> Self {
        Self::arena_with(ArenaCfg::default())
    }

    /// A fresh arena configured by `cfg`.
    pub fn arena_with(cfg: ArenaCfg) -> Self {
        Self {
            arena: Some(Arc::new(Arena::new(cfg))),
        }
    }

    #[inline]
    pub fn is_stateless(&self) -> bool {
        self.arena.is_none()
    }

    /// Whether both handles allocate from the same place.
    pub fn same_as(&self, other: &Allocator) -> bool {
        match (&self.arena, &other.arena) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Payload bytes copied into the arena so far, or zero for the global
    /// heap. Chunk capacity reserved but not yet used is not counted.
    pub fn allocated_bytes(&self) -> usize {
        self.arena.as_ref().map_or(0, |arena| arena.used())
    }

    /// Copy `bytes` into the arena. Returns `None` for the stateless
    /// allocator, the caller keeps its heap representation then.
    pub(crate) fn copy(&self, bytes: &[u8]) -> AllocResult<Option<ArenaSlice>> {
        let Some(arena) = &self.arena else {
            return Ok(None);
        };
        let ptr = arena.try_copy(bytes)?;
        Ok(Some(ArenaSlice {
            arena: arena.clone(),
            ptr,
            len: bytes.len(),
        }))
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arena {
            None => f.write_str("Allocator::Global"),
            Some(arena) => fmt::Debug::fmt(arena, f),
        }
    }
}

/// Immutable bytes living in an arena. Holding the slice keeps the arena
/// alive; bump chunks never move, so the pointer stays valid.
#[derive(Clone)]
pub(crate) struct ArenaSlice {
    arena: Arc<Arena>,
    ptr: NonNull<u8>,
    len: usize,
}

// The bytes are never written after the copy and the arena is `Sync`.
unsafe impl Send for ArenaSlice {}
unsafe impl Sync for ArenaSlice {}

impl ArenaSlice {
    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn allocator(&self) -> Allocator {
        Allocator {
            arena: Some(self.arena.clone()),
        }
    }
}

impl fmt::Debug for ArenaSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaSlice").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_global_is_stateless() {
        let alloc = Allocator::global();
        assert!(alloc.is_stateless());
        assert!(alloc.copy(b"abc").unwrap().is_none());
        assert_eq!(alloc.allocated_bytes(), 0);
        assert!(alloc.same_as(&Allocator::default()));
    }

    #[test]
    fn test_arena_copy() {
        let alloc = Allocator::arena();
        assert!(!alloc.is_stateless());
        let slice = alloc.copy(b"hello arena").or_error().unwrap().unwrap();
        assert_eq!(slice.as_bytes(), b"hello arena");
        assert!(slice.allocator().same_as(&alloc));
        assert!(!alloc.same_as(&Allocator::arena()));

        let empty = alloc.copy(b"").or_abort().unwrap();
        assert!(empty.as_bytes().is_empty());
    }

    #[test]
    fn test_arena_outlives_handle() {
        let slice = {
            let alloc = Allocator::arena();
            alloc.copy(b"kept alive").or_abort().unwrap()
        };
        assert_eq!(slice.as_bytes(), b"kept alive");
    }

    #[test]
    fn test_arena_limit() {
        let alloc = Allocator::arena_with(ArenaCfg::default().limit(0));
        let err = alloc.copy(&[0u8; 4096]).or_error().unwrap_err();
        assert!(err.is_alloc());
    }

    #[test]
    fn test_arena_counts_copied_bytes() {
        let alloc = Allocator::arena_with(ArenaCfg::with_capacity(4096));
        alloc.copy(&[1u8; 40]).or_abort();
        assert_eq!(alloc.allocated_bytes(), 40);
        // fits in the first chunk, still counted
        alloc.copy(&[2u8; 24]).or_abort();
        assert_eq!(alloc.allocated_bytes(), 64);
        alloc.copy(b"").or_abort();
        assert_eq!(alloc.allocated_bytes(), 64);
    }

    #[test]
    fn test_arena_limit_below_first_chunk() {
        let alloc = Allocator::arena_with(ArenaCfg::with_capacity(4096).limit(16));
        let err = alloc.copy(&[0u8; 100]).or_error().unwrap_err();
        assert!(err.is_alloc());
        assert_eq!(alloc.allocated_bytes(), 0);

        alloc.copy(&[0u8; 16]).or_abort();
        assert_eq!(alloc.allocated_bytes(), 16);
        assert!(alloc.copy(&[0u8; 1]).or_error().is_err());
    }
}

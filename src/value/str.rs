//! String payloads: inline short strings, shared or arena-backed long strings
//! and byte strings.

use bytes::Bytes;
use faststr::FastStr;

use super::allocator::{AllocResult, Allocator, ArenaSlice};

/// Strings up to this many bytes are stored inline in the value.
pub const SHORT_STR_CAP: usize = 14;

#[derive(Clone, Copy)]
pub(crate) struct ShortStr {
    len: u8,
    buf: [u8; SHORT_STR_CAP],
}

impl ShortStr {
    #[inline]
    pub(crate) fn new(s: &str) -> Option<Self> {
        if s.len() > SHORT_STR_CAP {
            return None;
        }
        let mut buf = [0u8; SHORT_STR_CAP];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        Some(Self {
            len: s.len() as u8,
            buf,
        })
    }

    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        // only ever filled from a `&str`
        unsafe { std::str::from_utf8_unchecked(&self.buf[..self.len as usize]) }
    }
}

#[derive(Clone)]
pub(crate) enum LongStr {
    Shared(FastStr),
    Arena(ArenaSlice),
}

impl LongStr {
    #[inline]
    pub(crate) fn as_str(&self) -> &str {
        match self {
            LongStr::Shared(s) => s.as_str(),
            // only ever filled from a `&str`
            LongStr::Arena(s) => unsafe { std::str::from_utf8_unchecked(s.as_bytes()) },
        }
    }

    pub(crate) fn in_arena(&self, alloc: &Allocator) -> bool {
        matches!(self, LongStr::Arena(s) if s.allocator().same_as(alloc))
    }

    pub(crate) fn new_in(s: &str, alloc: &Allocator) -> AllocResult<Self> {
        Ok(match alloc.copy(s.as_bytes())? {
            Some(slice) => LongStr::Arena(slice),
            None => LongStr::Shared(FastStr::new(s)),
        })
    }
}

#[derive(Clone)]
pub(crate) enum ByteStr {
    Shared(Bytes),
    Arena(ArenaSlice),
}

impl ByteStr {
    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            ByteStr::Shared(b) => b,
            ByteStr::Arena(s) => s.as_bytes(),
        }
    }

    pub(crate) fn in_arena(&self, alloc: &Allocator) -> bool {
        matches!(self, ByteStr::Arena(s) if s.allocator().same_as(alloc))
    }

    pub(crate) fn new_in(b: &[u8], alloc: &Allocator) -> AllocResult<Self> {
        Ok(match alloc.copy(b)? {
            Some(slice) => ByteStr::Arena(slice),
            None => ByteStr::Shared(Bytes::copy_from_slice(b)),
        })
    }
}

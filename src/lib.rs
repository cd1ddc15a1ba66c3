//! An in-memory JSON document model.
//!
//! [`Value`] is a tagged union over null, booleans, 64-bit integers, half and
//! double precision floats, UTF-8 strings, byte strings, arrays and objects.
//! Objects come in two flavours sharing one interface: [`SortedObject`]
//! keeps its members in key order, [`OrderPreservingObject`] keeps them in
//! insertion order behind a sorted index. The `preserve_order` feature picks
//! which of them backs [`Object`].

mod config;
mod error;
mod util;

pub mod prelude;
pub mod value;

pub use crate::config::ArenaCfg;
pub use crate::error::*;
pub use crate::value::*;

//! Imports the various traits about JSON values. `use jsontree::prelude::*`
//! to make the accessor methods available.

pub use crate::value::{Index, JsonContainerTrait, JsonValueMutTrait, JsonValueTrait};

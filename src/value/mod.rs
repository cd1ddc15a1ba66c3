//! A dynamic type representing any JSON document node, with arrays and two
//! interchangeable object containers.

mod allocator;
pub mod array;
mod cmp;
mod de;
mod from;
mod index;
pub mod iter;
mod kv;
#[macro_use]
mod macros;
pub(crate) mod node;
pub mod object;
mod partial_eq;
mod ser;
mod str;
mod value_trait;

#[doc(inline)]
pub use self::allocator::Allocator;
#[doc(inline)]
pub use self::array::Array;
#[doc(inline)]
pub use self::index::Index;
#[doc(inline)]
pub use self::iter::{Iter, IterMut};
#[doc(inline)]
pub use self::kv::KeyValue;
#[doc(inline)]
pub use self::node::Value;
#[doc(inline)]
pub use self::object::{
    KeyOrder, Keys, MembersMut, Object, OrderPreservingObject, SortedObject, SortedUniqueRange,
    Values, ValuesMut,
};
#[doc(inline)]
pub use self::str::SHORT_STR_CAP;
#[doc(inline)]
pub use self::value_trait::{
    JsonContainerTrait, JsonType, JsonValueMutTrait, JsonValueTrait, SemanticTag, StorageKind,
};

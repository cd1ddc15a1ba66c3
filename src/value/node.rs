use std::{fmt, mem, ptr::NonNull};

use bytes::Bytes;
use faststr::FastStr;

use super::{
    allocator::{AllocResult, AllocResultExt, Allocator},
    array::Array,
    index::Index,
    iter::IterMut,
    kv::KeyValue,
    object::{KeyOrder, Object},
    str::{ByteStr, LongStr, ShortStr},
    value_trait::{
        JsonContainerTrait, JsonType, JsonValueMutTrait, JsonValueTrait, SemanticTag, StorageKind,
    },
};
use crate::{error::Error, util::half::half_to_f64, Result};

pub(crate) static NULL: Value = Value::new();

static EMPTY_OBJECT: Object = Object::EMPTY;

/// Value is a node in a JSON document tree.
///
/// A value holds exactly one payload at a time, selected by its
/// [`StorageKind`]. Scalars and strings up to [`SHORT_STR_CAP`] bytes live
/// inline. Longer strings and byte strings are either reference counted or
/// live in an arena. Arrays and objects own their elements.
///
/// Every value also carries a [`SemanticTag`], which never takes part in
/// equality or ordering.
///
/// [`SHORT_STR_CAP`]: crate::SHORT_STR_CAP
///
/// # Examples
/// ```
/// use jsontree::{array, object, JsonValueTrait, StorageKind, Value};
///
/// let mut v = object! {"name": "jsontree", "tags": array!["json", "tree"]};
/// assert_eq!(v["name"].as_str(), Some("jsontree"));
/// assert_eq!(v["tags"][1], "tree");
///
/// v["version"] = Value::from(1);
/// assert_eq!(v.len(), 3);
///
/// let empty = Value::new_object();
/// assert_eq!(empty.storage_kind(), StorageKind::EmptyObject);
/// assert_eq!(empty, object! {});
/// ```
#[derive(Clone)]
pub struct Value {
    pub(crate) tag: SemanticTag,
    pub(crate) data: Data,
}

#[derive(Clone)]
pub(crate) enum Data {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    Half(u16),
    F64(f64),
    ShortStr(ShortStr),
    LongStr(LongStr),
    ByteStr(ByteStr),
    Array(Box<Array>),
    EmptyObject,
    Object(Box<Object>),
    ConstPtr(NonNull<Value>),
}

// Every payload is either owned or shared through thread-safe handles. The
// const pointer is a read-only reference whose referent outlives it, as
// promised to `new_const_ref`.
unsafe impl Send for Value {}
unsafe impl Sync for Value {}

impl Default for Value {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Value {
    /// Creates a `null` value.
    #[inline]
    pub const fn new() -> Self {
        Self::from_data(Data::Null)
    }

    #[inline]
    pub(crate) const fn from_data(data: Data) -> Self {
        Self {
            tag: SemanticTag::None,
            data,
        }
    }

    #[inline]
    pub const fn new_bool(val: bool) -> Self {
        Self::from_data(Data::Bool(val))
    }

    #[inline]
    pub const fn new_i64(val: i64) -> Self {
        Self::from_data(Data::I64(val))
    }

    /// Creates a value stored as `uint64`, even when it would fit an `i64`.
    #[inline]
    pub const fn new_u64(val: u64) -> Self {
        Self::from_data(Data::U64(val))
    }

    /// Creates a double. NaN and infinities are stored as they are.
    #[inline]
    pub const fn new_f64(val: f64) -> Self {
        Self::from_data(Data::F64(val))
    }

    /// Creates a half precision float from its IEEE 754 binary16 bits.
    #[inline]
    pub const fn new_half(bits: u16) -> Self {
        Self::from_data(Data::Half(bits))
    }

    /// Creates a string on the global heap. Strings up to
    /// [`SHORT_STR_CAP`](crate::SHORT_STR_CAP) bytes are stored inline.
    #[inline]
    pub fn new_str(s: &str) -> Self {
        Self::new_str_in(s, &Allocator::global())
    }

    /// Creates a string, copying a long one into `alloc`.
    ///
    /// Aborts through [`std::alloc::handle_alloc_error`] if the arena
    /// refuses the copy; see [`try_new_str_in`](Self::try_new_str_in).
    #[inline]
    pub fn new_str_in(s: &str, alloc: &Allocator) -> Self {
        Self::str_in(s, alloc).or_abort()
    }

    /// Creates a string, reporting an arena that cannot hold it.
    #[inline]
    pub fn try_new_str_in(s: &str, alloc: &Allocator) -> Result<Self> {
        Self::str_in(s, alloc).or_error()
    }

    fn str_in(s: &str, alloc: &Allocator) -> AllocResult<Self> {
        let data = match ShortStr::new(s) {
            Some(short) => Data::ShortStr(short),
            None => Data::LongStr(LongStr::new_in(s, alloc)?),
        };
        Ok(Self::from_data(data))
    }

    /// Creates a string sharing the buffer of `s` when it is too long to be
    /// stored inline.
    #[inline]
    pub fn new_faststr(s: FastStr) -> Self {
        let data = match ShortStr::new(&s) {
            Some(short) => Data::ShortStr(short),
            None => Data::LongStr(LongStr::Shared(s)),
        };
        Self::from_data(data)
    }

    #[inline]
    pub fn new_bytes(b: &[u8]) -> Self {
        Self::new_bytes_in(b, &Allocator::global())
    }

    #[inline]
    pub fn new_bytes_in(b: &[u8], alloc: &Allocator) -> Self {
        Self::bytes_in(b, alloc).or_abort()
    }

    #[inline]
    pub fn try_new_bytes_in(b: &[u8], alloc: &Allocator) -> Result<Self> {
        Self::bytes_in(b, alloc).or_error()
    }

    fn bytes_in(b: &[u8], alloc: &Allocator) -> AllocResult<Self> {
        Ok(Self::from_data(Data::ByteStr(ByteStr::new_in(b, alloc)?)))
    }

    /// Creates a byte string sharing the buffer of `b`.
    #[inline]
    pub fn new_shared_bytes(b: Bytes) -> Self {
        Self::from_data(Data::ByteStr(ByteStr::Shared(b)))
    }

    #[inline]
    pub fn new_array() -> Self {
        Self::new_array_in(Allocator::global())
    }

    #[inline]
    pub fn new_array_in(alloc: Allocator) -> Self {
        Array::new_in(alloc).into()
    }

    /// Creates an empty object without allocating. The value switches to a
    /// full object on its first mutable object access.
    #[inline]
    pub const fn new_object() -> Self {
        Self::from_data(Data::EmptyObject)
    }

    /// Creates an empty object whose members are allocated by `alloc`. The
    /// global allocator gets the allocation-free empty object.
    #[inline]
    pub fn new_object_in(alloc: Allocator) -> Self {
        if alloc.is_stateless() {
            Self::new_object()
        } else {
            Object::new_in(alloc).into()
        }
    }

    #[inline]
    pub(crate) fn from_array(arr: Array) -> Self {
        Self::from_data(Data::Array(Box::new(arr)))
    }

    #[inline]
    pub(crate) fn from_object(obj: Object) -> Self {
        Self::from_data(Data::Object(Box::new(obj)))
    }

    /// Creates a read-only view of `target`. Reading through the view reads
    /// `target`; copying the view copies the reference only. A view of a
    /// view refers to the original value.
    ///
    /// # Safety
    ///
    /// `target` must outlive the returned value and every copy of it, and
    /// must not be mutated while any of them is alive.
    #[inline]
    pub unsafe fn new_const_ref(target: &Value) -> Self {
        Self::from_data(Data::ConstPtr(NonNull::from(target.resolve())))
    }

    /// The value itself, or the value a const reference points at.
    #[inline]
    pub fn resolve(&self) -> &Value {
        match &self.data {
            // see `new_const_ref`
            Data::ConstPtr(ptr) => unsafe { ptr.as_ref() },
            _ => self,
        }
    }

    #[inline]
    pub fn with_tag(mut self, tag: SemanticTag) -> Self {
        self.tag = tag;
        self
    }

    #[inline]
    pub fn tag(&self) -> SemanticTag {
        self.tag
    }

    #[inline]
    pub fn set_tag(&mut self, tag: SemanticTag) {
        self.tag = tag;
    }

    pub fn storage_kind(&self) -> StorageKind {
        match &self.data {
            Data::Null => StorageKind::Null,
            Data::Bool(_) => StorageKind::Boolean,
            Data::I64(_) => StorageKind::Int64,
            Data::U64(_) => StorageKind::Uint64,
            Data::Half(_) => StorageKind::HalfFloat,
            Data::F64(_) => StorageKind::Float64,
            Data::ShortStr(_) => StorageKind::ShortStr,
            Data::LongStr(_) => StorageKind::LongStr,
            Data::ByteStr(_) => StorageKind::ByteStr,
            Data::Array(_) => StorageKind::Array,
            Data::EmptyObject => StorageKind::EmptyObject,
            Data::Object(_) => StorageKind::Object,
            Data::ConstPtr(_) => StorageKind::ConstJsonPointer,
        }
    }

    /// Number of elements or members. Zero for everything else.
    pub fn len(&self) -> usize {
        match &self.resolve().data {
            Data::Array(arr) => arr.len(),
            Data::Object(obj) => obj.len(),
            _ => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match &self.resolve().data {
            Data::Array(arr) => arr.capacity(),
            Data::Object(obj) => obj.capacity(),
            _ => 0,
        }
    }

    /// The element at position `i` of an array, or the value of the member
    /// at position `i` of an object.
    ///
    /// # Errors
    ///
    /// Returns an out-of-range error past the end and a type error for any
    /// other kind of value.
    pub fn at(&self, i: usize) -> Result<&Value> {
        let this = self.resolve();
        match &this.data {
            Data::Array(arr) => arr.at(i),
            Data::Object(obj) => obj.at(i),
            Data::EmptyObject => Err(Error::out_of_range(i, 0)),
            _ => Err(Error::not_an_array()),
        }
    }

    pub fn at_mut(&mut self, i: usize) -> Result<&mut Value> {
        match &mut self.data {
            Data::Array(arr) => arr.at_mut(i),
            Data::Object(obj) => obj.at_mut(i),
            Data::EmptyObject => Err(Error::out_of_range(i, 0)),
            _ => Err(Error::not_an_array()),
        }
    }

    /// Appends to an array.
    pub fn push<V: Into<Value>>(&mut self, value: V) -> Result<()> {
        self.as_array_mut()
            .ok_or_else(Error::not_an_array)?
            .push(value);
        Ok(())
    }

    /// Inserts into an array at `pos`, shifting the following elements.
    pub fn insert<V: Into<Value>>(&mut self, pos: usize, value: V) -> Result<()> {
        let arr = self.as_array_mut().ok_or_else(Error::not_an_array)?;
        if pos > arr.len() {
            return Err(Error::out_of_range(pos, arr.len()));
        }
        arr.insert(pos, value);
        Ok(())
    }

    /// Removes the array element at `pos`.
    pub fn erase(&mut self, pos: usize) -> Result<Value> {
        let arr = self.as_array_mut().ok_or_else(Error::not_an_array)?;
        if pos >= arr.len() {
            return Err(Error::out_of_range(pos, arr.len()));
        }
        Ok(arr.erase(pos))
    }

    /// Inserts or overwrites an object member. Returns whether the key was
    /// new.
    pub fn insert_or_assign<K: AsRef<str>, V: Into<Value>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<bool> {
        let obj = self.as_object_mut().ok_or_else(Error::not_an_object)?;
        Ok(obj.insert_or_assign(key, value).1)
    }

    /// Inserts an object member unless the key is present. Returns whether
    /// the key was new.
    pub fn try_emplace<K: AsRef<str>, V: Into<Value>>(&mut self, key: K, value: V) -> Result<bool> {
        let obj = self.as_object_mut().ok_or_else(Error::not_an_object)?;
        Ok(obj.try_emplace(key, value).1)
    }

    /// Removes an object member, returning its value.
    pub fn erase_key<Q: AsRef<str> + ?Sized>(&mut self, key: &Q) -> Result<Option<Value>> {
        match &mut self.data {
            Data::Object(obj) => Ok(obj.erase(key)),
            Data::EmptyObject => Ok(None),
            _ => Err(Error::not_an_object()),
        }
    }

    /// A cursor at the object member with `key`, or `None` for any other
    /// kind of value.
    pub fn find_mut(&mut self, key: &str) -> Option<IterMut<'_, KeyValue>> {
        match &mut self.data {
            Data::Object(obj) => Some(obj.find_mut(key)),
            _ => None,
        }
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|obj| obj.contains_key(key))
    }

    /// Copies the members of the object `source` whose keys are absent here.
    pub fn merge(&mut self, source: Value) -> Result<()> {
        let source = source.into_object()?;
        let obj = self.as_object_mut().ok_or_else(Error::not_an_object)?;
        obj.merge(source);
        Ok(())
    }

    /// Copies every member of the object `source`, overwriting values of
    /// shared keys.
    pub fn merge_or_update(&mut self, source: Value) -> Result<()> {
        let source = source.into_object()?;
        let obj = self.as_object_mut().ok_or_else(Error::not_an_object)?;
        obj.merge_or_update(source);
        Ok(())
    }

    fn into_object(self) -> Result<Object> {
        if let Data::ConstPtr(_) = self.data {
            return self.resolve().clone().into_object();
        }
        match self.data {
            Data::Object(obj) => Ok(*obj),
            Data::EmptyObject => Ok(Object::new()),
            _ => Err(Error::not_an_object()),
        }
    }

    /// Reserves room in an array or object. Does nothing for other kinds.
    pub fn reserve(&mut self, additional: usize) {
        match &mut self.data {
            Data::Array(arr) => arr.reserve(additional),
            Data::Object(obj) => obj.reserve(additional),
            Data::EmptyObject if additional > 0 => {
                let mut obj = Object::new();
                obj.reserve(additional);
                self.data = Data::Object(Box::new(obj));
            }
            _ => {}
        }
    }

    /// Resizes an array, filling new slots with copies of `value`.
    pub fn resize<V: Into<Value>>(&mut self, len: usize, value: V) -> Result<()> {
        self.as_array_mut()
            .ok_or_else(Error::not_an_array)?
            .resize(len, value);
        Ok(())
    }

    /// Removes every element or member. Does nothing for other kinds.
    pub fn clear(&mut self) {
        match &mut self.data {
            Data::Array(arr) => arr.clear(),
            Data::Object(obj) => obj.clear(),
            _ => {}
        }
    }

    /// Releases spare capacity, recursively.
    pub fn shrink_to_fit(&mut self) {
        match &mut self.data {
            Data::Array(arr) => arr.shrink_to_fit(),
            Data::Object(obj) => obj.shrink_to_fit(),
            _ => {}
        }
    }

    /// Takes the value out, leaving `null` behind. Containers move without
    /// touching their elements.
    #[inline]
    pub fn take(&mut self) -> Value {
        mem::take(self)
    }

    #[inline]
    pub fn swap(&mut self, other: &mut Value) {
        mem::swap(self, other);
    }

    /// Replaces the value. The new value is fully built before the old one
    /// is dropped.
    #[inline]
    pub fn assign<V: Into<Value>>(&mut self, value: V) {
        let mut value = value.into();
        self.swap(&mut value);
    }

    /// Replaces the value with a string allocated by `alloc`.
    #[inline]
    pub fn set_str_in(&mut self, s: &str, alloc: &Allocator) {
        self.assign(Value::new_str_in(s, alloc));
    }

    /// Replaces the value with a string allocated by `alloc`. On error the
    /// value is left as it was.
    pub fn try_set_str_in(&mut self, s: &str, alloc: &Allocator) -> Result<()> {
        self.assign(Value::try_new_str_in(s, alloc)?);
        Ok(())
    }

    /// Moves heap payloads into `alloc`, recursively. Payloads already in
    /// `alloc` stay where they are. Does nothing for the global allocator.
    pub(crate) fn try_adopt_in(&mut self, alloc: &Allocator) -> AllocResult<()> {
        if alloc.is_stateless() {
            return Ok(());
        }
        match &mut self.data {
            Data::LongStr(s) if !s.in_arena(alloc) => *s = LongStr::new_in(s.as_str(), alloc)?,
            Data::ByteStr(b) if !b.in_arena(alloc) => *b = ByteStr::new_in(b.as_bytes(), alloc)?,
            Data::Array(arr) => arr.try_adopt_in(alloc)?,
            Data::Object(obj) => obj.try_adopt_in(alloc)?,
            // promoted now, members inserted later must land in `alloc` too
            Data::EmptyObject => self.data = Data::Object(Box::new(Object::new_in(alloc.clone()))),
            _ => {}
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn adopt_in(&mut self, alloc: &Allocator) {
        self.try_adopt_in(alloc).or_abort()
    }

    /// Members in key order, for either object representation.
    #[inline]
    pub(crate) fn key_order(&self) -> Option<KeyOrder<'_>> {
        self.as_object().map(Object::iter_by_key)
    }
}

impl JsonValueTrait for Value {
    type ValueType<'v> = &'v Value;

    #[inline]
    fn json_type(&self) -> JsonType {
        match &self.data {
            Data::Null => JsonType::Null,
            Data::Bool(_) => JsonType::Boolean,
            Data::I64(_) => JsonType::Int64,
            Data::U64(_) => JsonType::Uint64,
            Data::Half(_) => JsonType::Half,
            Data::F64(_) => JsonType::Double,
            Data::ShortStr(_) | Data::LongStr(_) => JsonType::String,
            Data::ByteStr(_) => JsonType::ByteString,
            Data::Array(_) => JsonType::Array,
            Data::EmptyObject | Data::Object(_) => JsonType::Object,
            Data::ConstPtr(_) => self.resolve().json_type(),
        }
    }

    #[inline]
    fn as_i64(&self) -> Option<i64> {
        match self.resolve().data {
            Data::I64(i) => Some(i),
            Data::U64(u) => i64::try_from(u).ok(),
            _ => None,
        }
    }

    #[inline]
    fn as_u64(&self) -> Option<u64> {
        match self.resolve().data {
            Data::I64(i) => u64::try_from(i).ok(),
            Data::U64(u) => Some(u),
            _ => None,
        }
    }

    #[inline]
    fn as_f64(&self) -> Option<f64> {
        match self.resolve().data {
            Data::I64(i) => Some(i as f64),
            Data::U64(u) => Some(u as f64),
            Data::Half(h) => Some(half_to_f64(h)),
            Data::F64(f) => Some(f),
            _ => None,
        }
    }

    #[inline]
    fn as_bool(&self) -> Option<bool> {
        match self.resolve().data {
            Data::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    fn as_str(&self) -> Option<&str> {
        match &self.resolve().data {
            Data::ShortStr(s) => Some(s.as_str()),
            Data::LongStr(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    fn as_bytes(&self) -> Option<&[u8]> {
        match &self.resolve().data {
            Data::ByteStr(b) => Some(b.as_bytes()),
            _ => None,
        }
    }

    #[inline]
    fn get<I: Index>(&self, index: I) -> Option<&Value> {
        index.value_index_into(self)
    }
}

impl JsonContainerTrait for Value {
    type ObjectType = Object;
    type ArrayType = Array;

    #[inline]
    fn as_array(&self) -> Option<&Array> {
        match &self.resolve().data {
            Data::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    fn as_object(&self) -> Option<&Object> {
        match &self.resolve().data {
            Data::Object(obj) => Some(obj),
            Data::EmptyObject => Some(&EMPTY_OBJECT),
            _ => None,
        }
    }
}

impl JsonValueMutTrait for Value {
    type ValueType = Value;
    type ObjectType = Object;
    type ArrayType = Array;

    #[inline]
    fn as_array_mut(&mut self) -> Option<&mut Array> {
        match &mut self.data {
            Data::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Switches an empty object to full object storage.
    #[inline]
    fn as_object_mut(&mut self) -> Option<&mut Object> {
        if let Data::EmptyObject = self.data {
            self.data = Data::Object(Box::default());
        }
        match &mut self.data {
            Data::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Value> {
        index.index_into_mut(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Data::Null => f.write_str("Null"),
            Data::Bool(b) => write!(f, "Bool({b})"),
            Data::I64(i) => write!(f, "Number({i})"),
            Data::U64(u) => write!(f, "Number({u})"),
            Data::Half(h) => write!(f, "Half({:?})", half_to_f64(*h)),
            Data::F64(v) => write!(f, "Number({v:?})"),
            Data::ShortStr(s) => write!(f, "String({:?})", s.as_str()),
            Data::LongStr(s) => write!(f, "String({:?})", s.as_str()),
            Data::ByteStr(b) => write!(f, "Bytes({:?})", b.as_bytes()),
            Data::Array(arr) => {
                f.write_str("Array ")?;
                fmt::Debug::fmt(arr, f)
            }
            Data::EmptyObject => f.write_str("Object {}"),
            Data::Object(obj) => {
                f.write_str("Object ")?;
                fmt::Debug::fmt(obj, f)
            }
            Data::ConstPtr(_) => fmt::Debug::fmt(self.resolve(), f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{array, object, ArenaCfg};

    #[test]
    fn test_storage_kinds() {
        let long = "a string that does not fit inline";
        let cases = [
            (Value::new(), StorageKind::Null, JsonType::Null),
            (Value::from(true), StorageKind::Boolean, JsonType::Boolean),
            (Value::from(-1), StorageKind::Int64, JsonType::Int64),
            (Value::from(7u64), StorageKind::Int64, JsonType::Int64),
            (Value::from(u64::MAX), StorageKind::Uint64, JsonType::Uint64),
            (Value::new_u64(7), StorageKind::Uint64, JsonType::Uint64),
            (Value::from(1.5), StorageKind::Float64, JsonType::Double),
            (Value::new_half(0x3c00), StorageKind::HalfFloat, JsonType::Half),
            (Value::from("short"), StorageKind::ShortStr, JsonType::String),
            (Value::from(long), StorageKind::LongStr, JsonType::String),
            (Value::new_bytes(b"\x01\x02"), StorageKind::ByteStr, JsonType::ByteString),
            (array![], StorageKind::Array, JsonType::Array),
            (Value::new_object(), StorageKind::EmptyObject, JsonType::Object),
            (object! {"a": 1}, StorageKind::Object, JsonType::Object),
        ];
        for (value, kind, typ) in cases {
            assert_eq!(value.storage_kind(), kind, "{value:?}");
            assert_eq!(value.json_type(), typ, "{value:?}");
        }
    }

    #[test]
    fn test_short_str_boundary() {
        let fits = "x".repeat(crate::SHORT_STR_CAP);
        let spills = "x".repeat(crate::SHORT_STR_CAP + 1);
        assert_eq!(Value::from(fits.as_str()).storage_kind(), StorageKind::ShortStr);
        assert_eq!(Value::from(spills.as_str()).storage_kind(), StorageKind::LongStr);
        assert_eq!(Value::from(fits.as_str()), Value::new_faststr(FastStr::new(&fits)));
        assert_eq!(Value::from(spills.as_str()).as_str(), Some(spills.as_str()));
    }

    #[test]
    fn test_numeric_accessors() {
        let v = Value::from(-5);
        assert_eq!(v.as_i64(), Some(-5));
        assert_eq!(v.as_u64(), None);
        assert_eq!(v.as_f64(), Some(-5.0));
        assert!(v.is_number() && v.is_i64() && !v.is_f64());

        let v = Value::new_u64(u64::MAX);
        assert_eq!(v.as_i64(), None);
        assert_eq!(v.as_u64(), Some(u64::MAX));

        let v = Value::new_half(0xc000);
        assert_eq!(v.as_f64(), Some(-2.0));
        assert_eq!(v.as_i64(), None);
        assert!(v.is_f64());
    }

    #[test]
    fn test_tags_travel() {
        let v = Value::from("2024-01-01T00:00:00Z").with_tag(SemanticTag::Datetime);
        let copy = v.clone();
        assert_eq!(copy.tag(), SemanticTag::Datetime);
        assert_eq!(copy, Value::from("2024-01-01T00:00:00Z"));

        let mut v = Value::from(1_700_000_000);
        v.set_tag(SemanticTag::EpochSecond);
        assert_eq!(v.take().tag(), SemanticTag::EpochSecond);
        assert_eq!(v.tag(), SemanticTag::None);
    }

    #[test]
    fn test_empty_object_promotes() {
        let mut v = Value::new_object();
        assert_eq!(v.len(), 0);
        assert!(v.as_object().is_some_and(|obj| obj.is_empty()));
        assert_eq!(v.storage_kind(), StorageKind::EmptyObject);

        assert!(v.insert_or_assign("a", 1).unwrap());
        assert_eq!(v.storage_kind(), StorageKind::Object);
        assert_eq!(v["a"], 1);

        let mut v = Value::new_object();
        v.reserve(8);
        assert_eq!(v.storage_kind(), StorageKind::Object);
        assert!(v.capacity() >= 8);
    }

    #[test]
    fn test_wrong_kind_errors() {
        let mut v = Value::from(1);
        assert!(v.push(2).unwrap_err().is_type());
        assert!(v.insert_or_assign("k", 2).unwrap_err().is_type());
        assert!(v.try_emplace("k", 2).unwrap_err().is_type());
        assert!(v.erase_key("k").unwrap_err().is_type());
        assert!(v.resize(3, 0).unwrap_err().is_type());
        assert!(v.at(0).unwrap_err().is_type());
        assert!(v.merge(object! {}).unwrap_err().is_type());
        assert_eq!(v, 1);

        let mut obj = object! {};
        assert!(obj.merge(Value::from(1)).unwrap_err().is_type());
        assert!(obj.push(1).unwrap_err().is_type());
    }

    #[test]
    fn test_array_shortcuts() {
        let mut v = array![1, 2];
        v.push(3).unwrap();
        v.insert(0, 0).unwrap();
        assert_eq!(v, array![0, 1, 2, 3]);
        assert!(v.insert(9, 0).unwrap_err().is_out_of_range());
        assert_eq!(v.erase(1).unwrap(), 1);
        assert!(v.erase(3).unwrap_err().is_out_of_range());
        v.resize(5, "x").unwrap();
        assert_eq!(v, array![0, 2, 3, "x", "x"]);
        assert_eq!(*v.at(1).unwrap(), 2);
        *v.at_mut(0).unwrap() = Value::from(false);
        assert_eq!(v[0], false);
        v.clear();
        assert!(v.is_empty());
    }

    #[test]
    fn test_object_shortcuts() {
        let mut v = object! {"b": 2, "a": 1};
        assert!(!v.try_emplace("a", 10).unwrap());
        assert!(!v.insert_or_assign("b", 20).unwrap());
        assert_eq!(v, object! {"a": 1, "b": 20});
        assert_eq!(v.erase_key("a").unwrap(), Some(Value::from(1)));
        assert_eq!(v.erase_key("a").unwrap(), None);
        assert!(v.contains_key("b"));

        v.merge(object! {"b": 0, "c": 3}).unwrap();
        assert_eq!(v, object! {"b": 20, "c": 3});
        v.merge_or_update(object! {"b": 0}).unwrap();
        assert_eq!(v["b"], 0);
        v.merge(Value::new_object()).unwrap();
        assert_eq!(v.len(), 2);

        if let Some(mut it) = v.find_mut("c") {
            it.set_value("three");
        }
        assert_eq!(v["c"], "three");
    }

    #[test]
    fn test_move_keeps_container() {
        let mut src = object! {
            "a": array![1, 2, 3],
            "b": "a string long enough to live on the heap",
        };
        let array_addr = src["a"].as_array().map(|arr| arr.as_ptr());
        let member_addr = &src["b"] as *const Value;

        let dst = src.take();
        assert!(src.is_null());
        assert_eq!(src.storage_kind(), StorageKind::Null);

        assert_eq!(dst["a"].as_array().map(|arr| arr.as_ptr()), array_addr);
        assert_eq!(&dst["b"] as *const Value, member_addr);
        assert_eq!(dst["b"], "a string long enough to live on the heap");

        let mut other = Value::from(1);
        let mut dst = dst;
        dst.swap(&mut other);
        assert_eq!(dst, 1);
        assert_eq!(&other["b"] as *const Value, member_addr);
    }

    #[test]
    fn test_const_ref() {
        let target = object! {"k": array![1, "two"]};
        let view = unsafe { Value::new_const_ref(&target) };
        assert_eq!(view.storage_kind(), StorageKind::ConstJsonPointer);
        assert_eq!(view.json_type(), JsonType::Object);
        assert_eq!(view, target);
        assert_eq!(view["k"][1], "two");
        assert_eq!(view.len(), 1);

        let copy = view.clone();
        assert!(std::ptr::eq(copy.resolve(), &target));
        let nested = unsafe { Value::new_const_ref(&view) };
        assert!(std::ptr::eq(nested.resolve(), &target));

        let mut view = view;
        assert!(view.as_object_mut().is_none());
        assert!(view.push(1).is_err());
        assert_eq!(format!("{view:?}"), format!("{target:?}"));
    }

    #[test]
    fn test_assign_keeps_old_on_error() {
        let alloc = Allocator::arena_with(ArenaCfg::default().limit(0));
        let mut v = Value::from(42);
        let err = v
            .try_set_str_in(&"y".repeat(10_000), &alloc)
            .unwrap_err();
        assert!(err.is_alloc());
        assert_eq!(v, 42);

        v.set_str_in("short", &alloc);
        assert_eq!(v, "short");
        v.assign(array![1]);
        assert!(v.is_array());
    }

    #[test]
    fn test_arena_rehoming() {
        let alloc = Allocator::arena();
        let mut arr = Value::new_array_in(alloc.clone());
        let inner = array!["another string that is too long to be stored inline"];
        arr.push(inner).unwrap();
        assert!(alloc.allocated_bytes() > 0);

        // the arena outlives the handle
        drop(alloc);
        assert_eq!(
            arr[0][0],
            "another string that is too long to be stored inline"
        );
    }

    #[test]
    fn test_arena_limit_counts_payload_bytes() {
        let alloc = Allocator::arena_with(ArenaCfg::with_capacity(4096).limit(16));
        let err = Value::try_new_str_in(&"z".repeat(100), &alloc).unwrap_err();
        assert!(err.is_alloc());
        assert_eq!(alloc.allocated_bytes(), 0);
        let v = Value::try_new_str_in("exactly sixteen!", &alloc).unwrap();
        assert_eq!(v, "exactly sixteen!");
        assert_eq!(alloc.allocated_bytes(), 16);
    }

    #[test]
    fn test_empty_object_joins_arena() {
        let alloc = Allocator::arena();
        let mut arr = Value::new_array_in(alloc.clone());
        arr.push(Value::new_object()).unwrap();
        let inner = arr.get_mut(0).unwrap();
        assert_eq!(inner.storage_kind(), StorageKind::Object);
        assert!(inner.as_object().unwrap().allocator().same_as(&alloc));

        let before = alloc.allocated_bytes();
        inner
            .insert_or_assign("k", "a string that is too long to be stored inline")
            .unwrap();
        assert!(alloc.allocated_bytes() > before);
        assert_eq!(arr[0]["k"], "a string that is too long to be stored inline");
    }

    #[test]
    fn test_debug() {
        let v = object! {"a": array![Value::new(), true, 1.5, "s"]};
        assert_eq!(
            format!("{v:?}"),
            r#"Object {"a": Array [Null, Bool(true), Number(1.5), String("s")]}"#
        );
        assert_eq!(format!("{:?}", Value::new_object()), "Object {}");
        assert_eq!(format!("{:?}", Value::new_bytes(&[1, 2])), "Bytes([1, 2])");
    }
}

use std::fmt;

use super::index::Index;

/// JsonType is the logical type of a JSON value, independent of how it is
/// stored.
///
/// Short and long strings are both `String`, empty and populated objects are
/// both `Object`, and a const pointer reports the type of its referent.
///
/// # Examples
/// ```
/// use jsontree::{object, JsonType, JsonValueTrait};
///
/// let obj = object! {"a": 1, "b": true};
///
/// assert_eq!(obj.json_type(), JsonType::Object);
/// assert_eq!(obj["a"].json_type(), JsonType::Int64);
/// assert_eq!(obj.get("c").json_type(), JsonType::Null);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum JsonType {
    Null = 0,
    Boolean = 1,
    Int64 = 2,
    Uint64 = 3,
    Half = 4,
    Double = 5,
    String = 6,
    ByteString = 7,
    Array = 8,
    Object = 9,
}

impl JsonType {
    /// Whether the type is one of the four numeric types.
    #[inline]
    pub fn is_number(self) -> bool {
        matches!(
            self,
            JsonType::Int64 | JsonType::Uint64 | JsonType::Half | JsonType::Double
        )
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JsonType::Null => "null",
            JsonType::Boolean => "bool",
            JsonType::Int64 => "int64",
            JsonType::Uint64 => "uint64",
            JsonType::Half => "half",
            JsonType::Double => "double",
            JsonType::String => "string",
            JsonType::ByteString => "byte_string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        })
    }
}

/// The physical representation a value currently holds.
///
/// The discriminants are stable codes and may be exchanged with other
/// implementations of the same model.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum StorageKind {
    Null = 0x00,
    Boolean = 0x01,
    Int64 = 0x02,
    Uint64 = 0x03,
    EmptyObject = 0x04,
    Float64 = 0x05,
    HalfFloat = 0x06,
    ShortStr = 0x07,
    ConstJsonPointer = 0x08,
    ByteStr = 0x0c,
    Object = 0x0d,
    Array = 0x0e,
    LongStr = 0x0f,
}

impl StorageKind {
    /// The numeric storage code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_string_storage(self) -> bool {
        matches!(self, StorageKind::ShortStr | StorageKind::LongStr)
    }

    /// Whether the payload owns nothing outside the value itself. Trivial
    /// values are copied bitwise and need no destruction.
    #[inline]
    pub fn is_trivial_storage(self) -> bool {
        self.code() < StorageKind::ByteStr.code()
    }
}

impl TryFrom<u8> for StorageKind {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        Ok(match code {
            0x00 => StorageKind::Null,
            0x01 => StorageKind::Boolean,
            0x02 => StorageKind::Int64,
            0x03 => StorageKind::Uint64,
            0x04 => StorageKind::EmptyObject,
            0x05 => StorageKind::Float64,
            0x06 => StorageKind::HalfFloat,
            0x07 => StorageKind::ShortStr,
            0x08 => StorageKind::ConstJsonPointer,
            0x0c => StorageKind::ByteStr,
            0x0d => StorageKind::Object,
            0x0e => StorageKind::Array,
            0x0f => StorageKind::LongStr,
            _ => return Err(code),
        })
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageKind::Null => "null",
            StorageKind::Boolean => "bool",
            StorageKind::Int64 => "int64",
            StorageKind::Uint64 => "uint64",
            StorageKind::EmptyObject => "empty_object",
            StorageKind::Float64 => "double",
            StorageKind::HalfFloat => "half",
            StorageKind::ShortStr => "short_string",
            StorageKind::ConstJsonPointer => "const_json_pointer",
            StorageKind::ByteStr => "byte_string",
            StorageKind::Object => "object",
            StorageKind::Array => "array",
            StorageKind::LongStr => "string",
        })
    }
}

/// What a value means in an interchange format, independent of its storage.
///
/// Tags travel with a value through copies and moves but never take part in
/// equality or ordering.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum SemanticTag {
    #[default]
    None = 0,
    Undefined,
    Datetime,
    EpochSecond,
    EpochMilli,
    EpochNano,
    Bigint,
    Bigdec,
    Bigfloat,
    Float128,
    Base16,
    Base64,
    Base64Url,
    Uri,
    Clamped,
    MultiDimRowMajor,
    MultiDimColumnMajor,
    Ext,
    Id,
    Regex,
    Code,
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SemanticTag::None => "n/a",
            SemanticTag::Undefined => "undefined",
            SemanticTag::Datetime => "datetime",
            SemanticTag::EpochSecond => "epoch-second",
            SemanticTag::EpochMilli => "epoch-milli",
            SemanticTag::EpochNano => "epoch-nano",
            SemanticTag::Bigint => "bigint",
            SemanticTag::Bigdec => "bigdec",
            SemanticTag::Bigfloat => "bigfloat",
            SemanticTag::Float128 => "float128",
            SemanticTag::Base16 => "base16",
            SemanticTag::Base64 => "base64",
            SemanticTag::Base64Url => "base64url",
            SemanticTag::Uri => "uri",
            SemanticTag::Clamped => "clamped",
            SemanticTag::MultiDimRowMajor => "multi-dim-row-major",
            SemanticTag::MultiDimColumnMajor => "multi-dim-column-major",
            SemanticTag::Ext => "ext",
            SemanticTag::Id => "id",
            SemanticTag::Regex => "regex",
            SemanticTag::Code => "code",
        })
    }
}

/// A trait for all JSON values. Used by `Value`.
pub trait JsonValueTrait {
    type ValueType<'v>
    where
        Self: 'v;

    /// Gets the logical type of the value. Returns `JsonType::Null` if `self`
    /// is `Option::None` or `Result::Err(_)`.
    ///
    /// # Examples
    /// ```
    /// use jsontree::{array, JsonType, JsonValueTrait, Value};
    ///
    /// let arr = array![1, "two", 3.0];
    ///
    /// assert_eq!(arr.json_type(), JsonType::Array);
    /// assert_eq!(arr.get(1).json_type(), JsonType::String);
    ///
    /// let v: Option<&Value> = arr.get(5);
    /// assert!(v.is_none());
    /// assert_eq!(v.json_type(), JsonType::Null);
    /// ```
    fn json_type(&self) -> JsonType;

    /// Returns true if the value is a `bool`.
    #[inline]
    fn is_boolean(&self) -> bool {
        self.json_type() == JsonType::Boolean
    }

    /// Returns true if the value is `true`.
    #[inline]
    fn is_true(&self) -> bool {
        self.as_bool().unwrap_or_default()
    }

    /// Returns true if the value is `false`.
    #[inline]
    fn is_false(&self) -> bool {
        self.as_bool() == Some(false)
    }

    #[inline]
    fn is_null(&self) -> bool {
        self.json_type() == JsonType::Null
    }

    /// Returns true for any of the four numeric types.
    #[inline]
    fn is_number(&self) -> bool {
        self.json_type().is_number()
    }

    #[inline]
    fn is_str(&self) -> bool {
        self.json_type() == JsonType::String
    }

    #[inline]
    fn is_bytes(&self) -> bool {
        self.json_type() == JsonType::ByteString
    }

    #[inline]
    fn is_array(&self) -> bool {
        self.json_type() == JsonType::Array
    }

    #[inline]
    fn is_object(&self) -> bool {
        self.json_type() == JsonType::Object
    }

    /// Returns true if the value is an integer representable as `i64`.
    #[inline]
    fn is_i64(&self) -> bool {
        self.as_i64().is_some()
    }

    /// Returns true if the value is an integer representable as `u64`.
    #[inline]
    fn is_u64(&self) -> bool {
        self.as_u64().is_some()
    }

    /// Returns true if the value is a half or double precision float.
    #[inline]
    fn is_f64(&self) -> bool {
        matches!(self.json_type(), JsonType::Half | JsonType::Double)
    }

    /// Returns the integer if it fits an `i64`. Floats are not converted.
    fn as_i64(&self) -> Option<i64>;

    /// Returns the integer if it fits a `u64`. Floats are not converted.
    fn as_u64(&self) -> Option<u64>;

    /// Returns any number converted to `f64`.
    fn as_f64(&self) -> Option<f64>;

    fn as_bool(&self) -> Option<bool>;

    /// Returns the str if the value is a string, whichever way it is stored.
    fn as_str(&self) -> Option<&str>;

    fn as_bytes(&self) -> Option<&[u8]>;

    /// Returns the value at `index` if the value is an array or an object.
    /// A `usize` index reads an array element, a `&str` index reads an
    /// object member. Returns None otherwise.
    ///
    /// # Examples
    /// ```
    /// use jsontree::{array, object, JsonValueTrait};
    ///
    /// let obj = object! {"a": 1, "b": array![true]};
    ///
    /// assert!(obj.get("a").is_number());
    /// assert!(obj.get("b").get(0).is_true());
    /// assert!(obj.get("unknown").is_none());
    /// assert!(obj.get(0).is_none());
    /// ```
    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>>;
}

/// A trait for JSON values that may hold a container.
pub trait JsonContainerTrait {
    type ObjectType;
    type ArrayType;

    /// Returns the object if the value is an object.
    fn as_object(&self) -> Option<&Self::ObjectType>;

    /// Returns the array if the value is an array.
    fn as_array(&self) -> Option<&Self::ArrayType>;
}

/// Mutable access to the containers of a JSON value.
pub trait JsonValueMutTrait {
    type ValueType;
    type ObjectType;
    type ArrayType;

    /// Returns the mutable object if the value is an object.
    fn as_object_mut(&mut self) -> Option<&mut Self::ObjectType>;

    /// Returns the mutable array if the value is an array.
    fn as_array_mut(&mut self) -> Option<&mut Self::ArrayType>;

    /// Returns the value at `index` if the value is an array or an object.
    fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Self::ValueType>;
}

// A helper trait for Option types
impl<V: JsonValueTrait> JsonValueTrait for Option<V> {
    type ValueType<'v>
        = V::ValueType<'v>
    where
        V: 'v,
        Self: 'v;

    fn json_type(&self) -> JsonType {
        self.as_ref().map_or(JsonType::Null, |v| v.json_type())
    }

    fn as_i64(&self) -> Option<i64> {
        self.as_ref().and_then(|v| v.as_i64())
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_ref().and_then(|v| v.as_u64())
    }

    fn as_f64(&self) -> Option<f64> {
        self.as_ref().and_then(|v| v.as_f64())
    }

    fn as_bool(&self) -> Option<bool> {
        self.as_ref().and_then(|v| v.as_bool())
    }

    fn as_str(&self) -> Option<&str> {
        self.as_ref().and_then(|v| v.as_str())
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        self.as_ref().and_then(|v| v.as_bytes())
    }

    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>> {
        self.as_ref().and_then(|v| v.get(index))
    }
}

impl<V: JsonContainerTrait> JsonContainerTrait for Option<V> {
    type ArrayType = V::ArrayType;
    type ObjectType = V::ObjectType;

    fn as_array(&self) -> Option<&Self::ArrayType> {
        self.as_ref().and_then(|v| v.as_array())
    }

    fn as_object(&self) -> Option<&Self::ObjectType> {
        self.as_ref().and_then(|v| v.as_object())
    }
}

impl<V: JsonValueMutTrait> JsonValueMutTrait for Option<V> {
    type ValueType = V::ValueType;
    type ArrayType = V::ArrayType;
    type ObjectType = V::ObjectType;

    fn as_array_mut(&mut self) -> Option<&mut Self::ArrayType> {
        self.as_mut().and_then(|v| v.as_array_mut())
    }

    fn as_object_mut(&mut self) -> Option<&mut Self::ObjectType> {
        self.as_mut().and_then(|v| v.as_object_mut())
    }

    fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Self::ValueType> {
        self.as_mut().and_then(|v| v.get_mut(index))
    }
}

// A helper trait for Result types
impl<V: JsonValueTrait, E> JsonValueTrait for Result<V, E> {
    type ValueType<'v>
        = V::ValueType<'v>
    where
        V: 'v,
        Self: 'v;

    fn json_type(&self) -> JsonType {
        self.as_ref().ok().map_or(JsonType::Null, |v| v.json_type())
    }

    fn as_i64(&self) -> Option<i64> {
        self.as_ref().ok().and_then(|v| v.as_i64())
    }

    fn as_u64(&self) -> Option<u64> {
        self.as_ref().ok().and_then(|v| v.as_u64())
    }

    fn as_f64(&self) -> Option<f64> {
        self.as_ref().ok().and_then(|v| v.as_f64())
    }

    fn as_bool(&self) -> Option<bool> {
        self.as_ref().ok().and_then(|v| v.as_bool())
    }

    fn as_str(&self) -> Option<&str> {
        self.as_ref().ok().and_then(|v| v.as_str())
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        self.as_ref().ok().and_then(|v| v.as_bytes())
    }

    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>> {
        self.as_ref().ok().and_then(|v| v.get(index))
    }
}

impl<V: JsonContainerTrait, E> JsonContainerTrait for Result<V, E> {
    type ArrayType = V::ArrayType;
    type ObjectType = V::ObjectType;

    fn as_array(&self) -> Option<&Self::ArrayType> {
        self.as_ref().ok().and_then(|v| v.as_array())
    }

    fn as_object(&self) -> Option<&Self::ObjectType> {
        self.as_ref().ok().and_then(|v| v.as_object())
    }
}

impl<V: JsonValueMutTrait, E> JsonValueMutTrait for Result<V, E> {
    type ValueType = V::ValueType;
    type ArrayType = V::ArrayType;
    type ObjectType = V::ObjectType;

    fn as_array_mut(&mut self) -> Option<&mut Self::ArrayType> {
        self.as_mut().ok().and_then(|v| v.as_array_mut())
    }

    fn as_object_mut(&mut self) -> Option<&mut Self::ObjectType> {
        self.as_mut().ok().and_then(|v| v.as_object_mut())
    }

    fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Self::ValueType> {
        self.as_mut().ok().and_then(|v| v.get_mut(index))
    }
}

impl<V: JsonValueTrait> JsonValueTrait for &V {
    type ValueType<'v>
        = V::ValueType<'v>
    where
        V: 'v,
        Self: 'v;

    fn json_type(&self) -> JsonType {
        (*self).json_type()
    }

    fn as_i64(&self) -> Option<i64> {
        (*self).as_i64()
    }

    fn as_u64(&self) -> Option<u64> {
        (*self).as_u64()
    }

    fn as_f64(&self) -> Option<f64> {
        (*self).as_f64()
    }

    fn as_bool(&self) -> Option<bool> {
        (*self).as_bool()
    }

    fn as_str(&self) -> Option<&str> {
        (*self).as_str()
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        (*self).as_bytes()
    }

    fn get<I: Index>(&self, index: I) -> Option<Self::ValueType<'_>> {
        (*self).get(index)
    }
}

impl<V: JsonContainerTrait> JsonContainerTrait for &V {
    type ArrayType = V::ArrayType;
    type ObjectType = V::ObjectType;

    fn as_array(&self) -> Option<&Self::ArrayType> {
        (*self).as_array()
    }

    fn as_object(&self) -> Option<&Self::ObjectType> {
        (*self).as_object()
    }
}

impl<V: JsonValueMutTrait> JsonValueMutTrait for &mut V {
    type ValueType = V::ValueType;
    type ArrayType = V::ArrayType;
    type ObjectType = V::ObjectType;

    fn as_array_mut(&mut self) -> Option<&mut Self::ArrayType> {
        (**self).as_array_mut()
    }

    fn as_object_mut(&mut self) -> Option<&mut Self::ObjectType> {
        (**self).as_object_mut()
    }

    fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Self::ValueType> {
        (**self).get_mut(index)
    }
}

use std::fmt;

use bytes::Bytes;
use faststr::FastStr;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use super::{
    allocator::Allocator,
    array::Array,
    node::Value,
    object::{Object, OrderPreservingObject, SortedObject},
};

// Size hints come from the input, don't trust them for more than a page.
#[inline]
fn cautious(hint: Option<usize>) -> usize {
    hint.unwrap_or(0).min(4096)
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    #[inline]
    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::new_bool(v))
    }

    #[inline]
    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::new_i64(v))
    }

    // `int64` when it fits, like `From<u64>`.
    #[inline]
    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    #[inline]
    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::new_f64(v))
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::new_str(v))
    }

    #[inline]
    fn visit_string<E>(self, v: String) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    #[inline]
    fn visit_bytes<E>(self, v: &[u8]) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::new_bytes(v))
    }

    #[inline]
    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::new_shared_bytes(Bytes::from(v)))
    }

    #[inline]
    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::new())
    }

    #[inline]
    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::new())
    }

    #[inline]
    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        ArrayVisitor.visit_seq(seq).map(Value::from_array)
    }

    fn visit_map<A>(self, map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let pairs = collect_pairs(map)?;
        if pairs.is_empty() {
            return Ok(Value::new_object());
        }
        Ok(Value::from_object(Object::from_pairs_in(
            pairs,
            Allocator::global(),
        )))
    }
}

impl<'de> Deserialize<'de> for Value {
    /// Objects are built from their pairs in arrival order. When a key
    /// repeats, the first occurrence is kept.
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ArrayVisitor;

impl<'de> Visitor<'de> for ArrayVisitor {
    type Value = Array;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Array, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut arr = Array::with_capacity(cautious(seq.size_hint()));
        while let Some(elem) = seq.next_element::<Value>()? {
            arr.push(elem);
        }
        Ok(arr)
    }
}

impl<'de> Deserialize<'de> for Array {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Array, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ArrayVisitor)
    }
}

fn collect_pairs<'de, A>(mut map: A) -> Result<Vec<(FastStr, Value)>, A::Error>
where
    A: MapAccess<'de>,
{
    let mut pairs = Vec::with_capacity(cautious(map.size_hint()));
    while let Some((key, value)) = map.next_entry::<FastStr, Value>()? {
        pairs.push((key, value));
    }
    Ok(pairs)
}

macro_rules! impl_object_deserialize {
    ($($ty:ident),*) => {
        $(
            impl<'de> Deserialize<'de> for $ty {
                /// The first occurrence of a repeated key is kept.
                fn deserialize<D>(deserializer: D) -> Result<$ty, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    struct ObjectVisitor;

                    impl<'de> Visitor<'de> for ObjectVisitor {
                        type Value = $ty;

                        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                            formatter.write_str("a JSON object")
                        }

                        fn visit_map<A>(self, map: A) -> Result<$ty, A::Error>
                        where
                            A: MapAccess<'de>,
                        {
                            let pairs = collect_pairs(map)?;
                            Ok($ty::from_pairs_in(pairs, Allocator::global()))
                        }
                    }

                    deserializer.deserialize_map(ObjectVisitor)
                }
            }
        )*
    };
}

impl_object_deserialize!(SortedObject, OrderPreservingObject);

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{
    array::Array,
    node::{Data, Value},
    object::{OrderPreservingObject, SortedObject},
};
use crate::util::half::half_to_f64;

impl Serialize for Value {
    /// Half-precision numbers are widened to `f64`, byte strings go through
    /// `serialize_bytes` and semantic tags are not part of the output.
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.resolve().data {
            Data::Null => serializer.serialize_unit(),
            Data::Bool(b) => serializer.serialize_bool(*b),
            Data::I64(i) => serializer.serialize_i64(*i),
            Data::U64(u) => serializer.serialize_u64(*u),
            Data::Half(h) => serializer.serialize_f64(half_to_f64(*h)),
            Data::F64(f) => serializer.serialize_f64(*f),
            Data::ShortStr(s) => serializer.serialize_str(s.as_str()),
            Data::LongStr(s) => serializer.serialize_str(s.as_str()),
            Data::ByteStr(b) => serializer.serialize_bytes(b.as_bytes()),
            Data::Array(arr) => arr.serialize(serializer),
            Data::EmptyObject => serializer.serialize_map(Some(0))?.end(),
            Data::Object(obj) => obj.serialize(serializer),
            // `resolve` never returns a reference
            Data::ConstPtr(_) => serializer.serialize_unit(),
        }
    }
}

impl Serialize for Array {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for elem in self.iter() {
            seq.serialize_element(elem)?;
        }
        seq.end()
    }
}

macro_rules! impl_object_serialize {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                /// Members are written in container order.
                #[inline]
                fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    let mut map = serializer.serialize_map(Some(self.len()))?;
                    for kv in self.iter() {
                        map.serialize_entry(kv.key(), kv.value())?;
                    }
                    map.end()
                }
            }
        )*
    };
}

impl_object_serialize!(SortedObject, OrderPreservingObject);

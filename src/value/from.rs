use std::borrow::Cow;

use bytes::Bytes;
use faststr::FastStr;

use super::{
    array::Array,
    node::Value,
    object::{Object, OrderPreservingObject, SortedObject},
};

macro_rules! impl_from_int {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(val: $ty) -> Self {
                    Value::new_i64(val as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

macro_rules! impl_from_unsigned {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Value {
                /// Stored as `int64` when the value fits, `uint64` otherwise.
                #[inline]
                fn from(val: $ty) -> Self {
                    match i64::try_from(val) {
                        Ok(i) => Value::new_i64(i),
                        Err(_) => Value::new_u64(val as u64),
                    }
                }
            }
        )*
    };
}

impl_from_unsigned!(u64, usize);

impl From<f32> for Value {
    #[inline]
    fn from(val: f32) -> Self {
        Value::new_f64(val as f64)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(val: f64) -> Self {
        Value::new_f64(val)
    }
}

impl From<bool> for Value {
    /// Convert `bool` to a boolean `Value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsontree::{JsonValueTrait, Value};
    ///
    /// let x: Value = true.into();
    /// assert!(x.is_true());
    /// ```
    #[inline]
    fn from(val: bool) -> Self {
        Value::new_bool(val)
    }
}

macro_rules! impl_from_str {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                /// The string is copied into the `Value`, inline when it is
                /// short enough.
                #[inline]
                fn from(val: $ty) -> Self {
                    Value::new_str(val.as_ref())
                }
            }
        )*
    };
}

impl_from_str!(&str, &String, String, &mut str);

impl From<FastStr> for Value {
    #[inline]
    fn from(val: FastStr) -> Self {
        Value::new_faststr(val)
    }
}

impl From<&FastStr> for Value {
    #[inline]
    fn from(val: &FastStr) -> Self {
        Value::new_faststr(val.clone())
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    /// Convert copy-on-write string to a string `Value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::borrow::Cow;
    ///
    /// use jsontree::Value;
    ///
    /// let s1: Cow<str> = Cow::Borrowed("hello");
    /// let x1 = Value::from(s1);
    ///
    /// let s2: Cow<str> = Cow::Owned("hello".to_string());
    /// let x2 = Value::from(s2);
    ///
    /// assert_eq!(x1, x2);
    /// ```
    #[inline]
    fn from(value: Cow<'a, str>) -> Self {
        Value::new_str(value.as_ref())
    }
}

impl From<char> for Value {
    #[inline]
    fn from(val: char) -> Self {
        let mut buf = [0u8; 4];
        Value::new_str(val.encode_utf8(&mut buf))
    }
}

impl From<Bytes> for Value {
    /// A byte string sharing the buffer of `val`.
    #[inline]
    fn from(val: Bytes) -> Self {
        Value::new_shared_bytes(val)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    /// Convert a `Vec` to an array `Value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsontree::{array, Value};
    ///
    /// assert_eq!(Value::from(vec!["hi", "hello"]), array!["hi", "hello"]);
    /// assert_eq!(Value::from(Vec::<i32>::new()), array![]);
    /// ```
    #[inline]
    fn from(val: Vec<T>) -> Self {
        Value::from_array(val.into_iter().collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    #[inline]
    fn from(val: &[T]) -> Self {
        Value::from_array(val.iter().cloned().collect())
    }
}

impl From<()> for Value {
    /// Convert `()` to `null`.
    #[inline]
    fn from(_: ()) -> Self {
        Value::new()
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    /// `None` becomes `null`.
    ///
    /// # Examples
    /// ```
    /// use jsontree::{JsonValueTrait, Value};
    ///
    /// assert!(Value::from(None::<i32>).is_null());
    /// assert_eq!(Value::from(Some(2)), 2);
    /// ```
    #[inline]
    fn from(opt: Option<T>) -> Self {
        match opt {
            None => Value::new(),
            Some(value) => value.into(),
        }
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    /// Collects into an array `Value`.
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::from_array(iter.into_iter().collect())
    }
}

impl From<Array> for Value {
    #[inline]
    fn from(val: Array) -> Self {
        Value::from_array(val)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Array {
    #[inline]
    fn from(val: Vec<T>) -> Self {
        val.into_iter().collect()
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Array {
    #[inline]
    fn from(val: [T; N]) -> Self {
        val.into_iter().collect()
    }
}

// A value stores whichever object representation is selected by the
// `preserve_order` feature; the other one is converted on the way in.
impl From<SortedObject> for Value {
    #[inline]
    fn from(val: SortedObject) -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "preserve_order")] {
                let alloc = val.allocator().clone();
                Value::from_object(Object::from_members_in(val.members, alloc))
            } else {
                Value::from_object(val)
            }
        }
    }
}

impl From<OrderPreservingObject> for Value {
    #[inline]
    fn from(val: OrderPreservingObject) -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "preserve_order")] {
                Value::from_object(val)
            } else {
                let alloc = val.allocator().clone();
                Value::from_object(Object::from_members_in(val.members, alloc))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{JsonValueTrait, StorageKind};

    #[test]
    fn test_integer_dispatch() {
        assert_eq!(Value::from(u8::MAX).storage_kind(), StorageKind::Int64);
        assert_eq!(Value::from(u32::MAX).storage_kind(), StorageKind::Int64);
        assert_eq!(Value::from(i64::MAX as u64).storage_kind(), StorageKind::Int64);
        assert_eq!(Value::from(i64::MAX as u64 + 1).storage_kind(), StorageKind::Uint64);
        assert_eq!(Value::from(usize::MAX).storage_kind(), StorageKind::Uint64);
        assert_eq!(Value::from(i8::MIN).as_i64(), Some(-128));
    }

    #[test]
    fn test_strings() {
        assert_eq!(Value::from('é'), "é");
        assert_eq!(Value::from(String::from("owned")), "owned");
        let shared = FastStr::from_static_str("a static string that is rather long");
        let v = Value::from(&shared);
        assert_eq!(v.storage_kind(), StorageKind::LongStr);
        assert_eq!(v, shared);
    }

    #[test]
    fn test_bytes() {
        let v = Value::from(Bytes::from_static(b"\x00\xff"));
        assert_eq!(v.storage_kind(), StorageKind::ByteStr);
        assert_eq!(v.as_bytes(), Some(&b"\x00\xff"[..]));
        assert_eq!(v, Value::new_bytes(b"\x00\xff"));
        assert!(v.as_str().is_none());
    }

    #[test]
    fn test_containers() {
        let v: Value = (1..=3).collect();
        assert_eq!(v, Value::from(vec![1, 2, 3]));
        assert_eq!(v, Value::from(&[1, 2, 3][..]));
        assert_eq!(Value::from(()), Value::new());
        assert_eq!(Array::from([true, false]).len(), 2);

        let sorted: SortedObject = vec![("b", 1), ("a", 2)].into_iter().collect();
        let preserved: OrderPreservingObject = vec![("b", 1), ("a", 2)].into_iter().collect();
        let a = Value::from(sorted);
        let b = Value::from(preserved);
        assert_eq!(a, b);
        assert_eq!(a.storage_kind(), StorageKind::Object);
    }
}

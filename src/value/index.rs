use faststr::FastStr;

use super::{
    node::{Value, NULL},
    value_trait::{JsonContainerTrait, JsonValueMutTrait, JsonValueTrait},
};
use crate::util::private::Sealed;

impl<I> std::ops::Index<I> for Value
where
    I: Index,
{
    type Output = Value;

    /// Index into an array `Value` using the syntax `value[0]` and index into
    /// an object `Value` using the syntax `value["k"]`.
    ///
    /// Returns a null `Value` if the `Value` type does not match the index,
    /// or the index does not exist in the array or object.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsontree::{array, object, Value};
    ///
    /// let data = object! {"x": object! {"y": array!["z", "zz"]}};
    ///
    /// assert_eq!(data["x"]["y"], array!["z", "zz"]);
    /// assert_eq!(data["x"]["y"][0], "z");
    ///
    /// assert_eq!(data["a"], Value::new()); // returns null for undefined values
    /// assert_eq!(data["a"]["b"], Value::new()); // does not panic
    /// ```
    #[inline]
    fn index(&self, index: I) -> &Value {
        index.value_index_into(self).unwrap_or(&NULL)
    }
}

impl<I: Index> std::ops::IndexMut<I> for Value {
    /// Write the index of a mutable `Value`, and use the syntax
    /// `value[0] = ...` in an array and `value["k"] = ...` in an object.
    ///
    /// If the index is a number, the value must be an array of length bigger
    /// than the index. Indexing into a value that is not an array or an
    /// array that is too small will panic.
    ///
    /// If the index is a string, the value must be an object or null which
    /// is treated like an empty object. If the key is not already present in
    /// the object, it will be inserted with a value of null. Indexing into a
    /// value that is neither an object nor null will panic.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsontree::{array, object, Value};
    ///
    /// let mut data = object! {"x": 0, "z": Value::new()};
    ///
    /// // replace an existing key
    /// data["x"] = Value::from(1);
    ///
    /// // insert a new key
    /// data["y"] = array![1, 2, 3];
    ///
    /// // replace an array value
    /// data["y"][0] = Value::from(true);
    ///
    /// // insert a deeply nested key
    /// data["a"]["b"]["c"] = Value::from(true);
    ///
    /// // insert a key in a null value
    /// data["z"]["zz"] = Value::from("insert in null");
    ///
    /// assert_eq!(
    ///     data,
    ///     object! {
    ///         "x": 1,
    ///         "y": array![true, 2, 3],
    ///         "a": object! {"b": object! {"c": true}},
    ///         "z": object! {"zz": "insert in null"},
    ///     }
    /// );
    /// ```
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Value {
        index.index_or_insert(self)
    }
}

/// An indexing trait for `Value`. Implemented by `usize` for arrays and by
/// string types for objects.
pub trait Index: Sealed {
    /// Return None if the index is not already in the array or object.
    #[doc(hidden)]
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value>;

    /// Return None if the key is not already in the array or object.
    #[doc(hidden)]
    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value>;

    /// Panic if array index out of bounds. If key is not already in the
    /// object, insert it with a value of null. Panic if Value is a type that
    /// cannot be indexed into, except if Value is null then it can be
    /// treated as an empty object.
    #[doc(hidden)]
    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value;
}

impl Index for usize {
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        v.as_array()?.get(*self)
    }

    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        v.as_array_mut()?.get_mut(*self)
    }

    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
        let typ = v.json_type();
        let Some(arr) = v.as_array_mut() else {
            panic!("cannot access index {} of JSON {}", self, typ);
        };
        let len = arr.len();
        match arr.get_mut(*self) {
            Some(elem) => elem,
            None => panic!("index {} out of bounds (len: {})", self, len),
        }
    }
}

impl Index for str {
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        v.as_object()?.get(self)
    }

    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        v.as_object_mut()?.get_mut(self)
    }

    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
        if v.is_null() {
            *v = Value::new_object();
        }
        let typ = v.json_type();
        let Some(obj) = v.as_object_mut() else {
            panic!("cannot access key {:?} in JSON {}", self, typ);
        };
        let (member, _) = obj.try_emplace(self, Value::new());
        member.into_mut().value_mut()
    }
}

macro_rules! impl_owned_str_index {
    ($($t:ty),*) => {
        $(
            impl Index for $t {
                #[inline]
                fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
                    self.as_str().value_index_into(v)
                }

                #[inline]
                fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
                    self.as_str().index_into_mut(v)
                }

                #[inline]
                fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
                    self.as_str().index_or_insert(v)
                }
            }
        )*
    };
}

impl_owned_str_index!(String, FastStr);

impl<T> Index for &T
where
    T: ?Sized + Index,
{
    fn value_index_into<'v>(&self, v: &'v Value) -> Option<&'v Value> {
        (**self).value_index_into(v)
    }

    fn index_into_mut<'v>(&self, v: &'v mut Value) -> Option<&'v mut Value> {
        (**self).index_into_mut(v)
    }

    fn index_or_insert<'v>(&self, v: &'v mut Value) -> &'v mut Value {
        (**self).index_or_insert(v)
    }
}

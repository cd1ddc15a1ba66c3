use faststr::FastStr;

use super::{
    array::Array,
    cmp::cmp_numbers,
    node::{Data, Value},
    object::{eq_by_key, OrderPreservingObject, SortedObject},
    value_trait::{JsonContainerTrait, JsonValueTrait},
};

impl Eq for Value {}

impl PartialEq for Value {
    /// Structural equality. Numbers compare by numeric value across integer
    /// and float storage, strings by content, objects by their members
    /// whatever their order. Semantic tags are ignored.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.resolve(), other.resolve());
        if std::ptr::eq(a, b) {
            return true;
        }

        if let (Some(x), Some(y)) = (a.number(), b.number()) {
            return cmp_numbers(x, y).is_eq();
        }

        match (&a.data, &b.data) {
            (Data::Null, Data::Null) => true,
            (Data::Bool(x), Data::Bool(y)) => x == y,
            (Data::ByteStr(x), Data::ByteStr(y)) => x.as_bytes() == y.as_bytes(),
            (Data::Array(x), Data::Array(y)) => x == y,
            _ => {
                if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
                    return x == y;
                }
                match (a.key_order(), b.key_order()) {
                    (Some(x), Some(y)) => eq_by_key(x, y),
                    _ => false,
                }
            }
        }
    }
}

macro_rules! impl_str_eq {
    ($($eq:ident [$($ty:ty)*])*) => {
        $($(
            impl PartialEq<$ty> for Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    let s: &str = other.as_ref();
                    $eq(self, s)
                }
            }

            impl PartialEq<Value> for $ty {
                #[inline]
                fn eq(&self, other: &Value) -> bool {
                    let s: &str = self.as_ref();
                    $eq(other, s)
                }
            }

            impl PartialEq<$ty> for &Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    let s: &str = other.as_ref();
                    $eq(*self, s)
                }
            }

            impl PartialEq<$ty> for &mut Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    let s: &str = other.as_ref();
                    $eq(*self, s)
                }
            }
        )*)*
    }
}

impl_str_eq! {
    eq_str[str String FastStr]
}

impl PartialEq<&str> for Value {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        eq_str(self, other)
    }
}

impl PartialEq<Value> for &str {
    #[inline]
    fn eq(&self, other: &Value) -> bool {
        eq_str(other, self)
    }
}

#[inline]
fn eq_i64(value: &Value, other: i64) -> bool {
    value.as_i64() == Some(other)
}

#[inline]
fn eq_u64(value: &Value, other: u64) -> bool {
    value.as_u64() == Some(other)
}

// Goes through `as_f64`, so a float compares equal to an integer of the same
// value and NaN equals nothing.
#[inline]
fn eq_f64(value: &Value, other: f64) -> bool {
    value.as_f64() == Some(other)
}

#[inline]
fn eq_bool(value: &Value, other: bool) -> bool {
    value.as_bool() == Some(other)
}

#[inline]
fn eq_str(value: &Value, other: &str) -> bool {
    value.as_str() == Some(other)
}

macro_rules! impl_numeric_eq {
    ($($eq:ident [$($ty:ty)*])*) => {
        $($(
            impl PartialEq<$ty> for Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    $eq(self, *other as _)
                }
            }

            impl PartialEq<Value> for $ty {
                #[inline]
                fn eq(&self, other: &Value) -> bool {
                    $eq(other, *self as _)
                }
            }

            impl PartialEq<$ty> for &Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    $eq(*self, *other as _)
                }
            }

            impl PartialEq<$ty> for &mut Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    $eq(*self, *other as _)
                }
            }
        )*)*
    }
}

impl_numeric_eq! {
    eq_i64[i8 i16 i32 i64 isize]
    eq_u64[u8 u16 u32 u64 usize]
    eq_f64[f32 f64]
    eq_bool[bool]
}

macro_rules! impl_slice_eq {
    ([$($vars:tt)*], $rhs:ty) => {
        impl<U, $($vars)*> PartialEq<$rhs> for Array
        where
            Value: PartialEq<U>,
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool {
                let other: &[U] = other.as_ref();
                self.len() == other.len() && self.iter().zip(other).all(|(a, b)| *a == *b)
            }
        }

        impl<U, $($vars)*> PartialEq<$rhs> for Value
        where
            Value: PartialEq<U>,
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool {
                self.as_array().is_some_and(|arr| arr == other)
            }
        }
    };
}

impl_slice_eq!([], &[U]);
impl_slice_eq!([], [U]);
impl_slice_eq!([const N: usize], [U; N]);
impl_slice_eq!([], Vec<U>);

macro_rules! impl_container_eq {
    ($($ty:ty)*) => {
        $(
            impl PartialEq<$ty> for Value {
                #[inline]
                fn eq(&self, other: &$ty) -> bool {
                    match self.key_order() {
                        Some(members) => eq_by_key(members, other.iter_by_key()),
                        None => false,
                    }
                }
            }

            impl PartialEq<Value> for $ty {
                #[inline]
                fn eq(&self, other: &Value) -> bool {
                    other == self
                }
            }
        )*
    }
}

impl_container_eq!(SortedObject OrderPreservingObject);

impl PartialEq<Array> for Value {
    #[inline]
    fn eq(&self, other: &Array) -> bool {
        self.as_array().is_some_and(|arr| arr == other)
    }
}

impl PartialEq<Value> for Array {
    #[inline]
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

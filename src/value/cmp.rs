//! Total ordering of values.
//!
//! Values of different categories order as
//! `null < bool < number < string < byte string < array < object`. Numbers
//! compare by exact numeric value whatever their storage, NaN above every
//! other number and `-0.0` equal to `0.0`. Arrays compare lexicographically
//! and objects compare their members in key order.

use std::cmp::Ordering;

use super::{
    node::{Data, Value},
    object::cmp_by_key,
    value_trait::{JsonContainerTrait, JsonValueTrait},
};
use crate::util::half::half_to_f64;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Number {
    Int(i64),
    Uint(u64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Category {
    Null,
    Bool,
    Number,
    String,
    Bytes,
    Array,
    Object,
}

impl Value {
    #[inline]
    pub(crate) fn number(&self) -> Option<Number> {
        match self.resolve().data {
            Data::I64(i) => Some(Number::Int(i)),
            Data::U64(u) => Some(Number::Uint(u)),
            Data::Half(h) => Some(Number::Float(half_to_f64(h))),
            Data::F64(f) => Some(Number::Float(f)),
            _ => None,
        }
    }

    fn category(&self) -> Category {
        match &self.resolve().data {
            Data::Null => Category::Null,
            Data::Bool(_) => Category::Bool,
            Data::I64(_) | Data::U64(_) | Data::Half(_) | Data::F64(_) => Category::Number,
            Data::ShortStr(_) | Data::LongStr(_) => Category::String,
            Data::ByteStr(_) => Category::Bytes,
            Data::Array(_) => Category::Array,
            Data::EmptyObject | Data::Object(_) => Category::Object,
            // `resolve` never returns a reference
            Data::ConstPtr(_) => Category::Null,
        }
    }
}

pub(crate) fn cmp_numbers(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x.cmp(&y),
        (Number::Uint(x), Number::Uint(y)) => x.cmp(&y),
        (Number::Int(x), Number::Uint(y)) => i128::from(x).cmp(&i128::from(y)),
        (Number::Uint(x), Number::Int(y)) => i128::from(x).cmp(&i128::from(y)),
        (Number::Int(x), Number::Float(y)) => cmp_int_float(i128::from(x), y),
        (Number::Uint(x), Number::Float(y)) => cmp_int_float(i128::from(x), y),
        (Number::Float(x), Number::Int(y)) => cmp_int_float(i128::from(y), x).reverse(),
        (Number::Float(x), Number::Uint(y)) => cmp_int_float(i128::from(y), x).reverse(),
        (Number::Float(x), Number::Float(y)) => cmp_floats(x, y),
    }
}

fn cmp_floats(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer of either storage with a float.
fn cmp_int_float(i: i128, f: f64) -> Ordering {
    // 2^64, every integer of either kind lies strictly inside +-BOUND
    const BOUND: f64 = 18_446_744_073_709_551_616.0;

    if f.is_nan() || f >= BOUND {
        return Ordering::Less;
    }
    if f <= -BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i128)) {
        Ordering::Equal => 0f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

impl PartialOrd for Value {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.resolve(), other.resolve());
        let category = a.category();
        if category != b.category() {
            return category.cmp(&b.category());
        }

        match category {
            Category::Null => Ordering::Equal,
            Category::Bool => a.as_bool().cmp(&b.as_bool()),
            Category::Number => match (a.number(), b.number()) {
                (Some(x), Some(y)) => cmp_numbers(x, y),
                _ => Ordering::Equal,
            },
            Category::String => a.as_str().cmp(&b.as_str()),
            Category::Bytes => a.as_bytes().cmp(&b.as_bytes()),
            Category::Array => a.as_array().cmp(&b.as_array()),
            Category::Object => match (a.key_order(), b.key_order()) {
                (Some(x), Some(y)) => cmp_by_key(x, y),
                _ => Ordering::Equal,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{array, object};

    #[test]
    fn test_category_order() {
        let ascending = [
            Value::new(),
            Value::from(false),
            Value::from(true),
            Value::from(-1),
            Value::from(""),
            Value::from("a"),
            Value::new_bytes(b""),
            array![],
            array![0],
            Value::new_object(),
            object! {"a": 0},
        ];
        for pair in ascending.windows(2) {
            assert!(pair[0] < pair[1], "{:?} < {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_numbers_exact() {
        let big = u64::MAX;
        // both round to 2^64 as doubles
        assert!(Value::new_u64(big) < Value::from(big as f64));
        assert!(Value::new_u64(big - 1) < Value::new_u64(big));
        assert!(Value::from(i64::MIN) < Value::new_u64(0));
        assert!(Value::from(2) > Value::from(1.5));
        assert!(Value::from(-2) < Value::from(-1.5));
        assert!(Value::from(1) < Value::from(1.0000001));
        assert!(Value::from(-1) > Value::from(-1.0000001));
        assert!(Value::from(f64::INFINITY) > Value::new_u64(u64::MAX));
        assert!(Value::from(f64::NEG_INFINITY) < Value::from(i64::MIN));
        assert_eq!(Value::from(-0.0).cmp(&Value::from(0.0)), Ordering::Equal);
        assert_eq!(Value::new_half(0x4000).cmp(&Value::from(2)), Ordering::Equal);
    }

    #[test]
    fn test_nan_sorts_last() {
        let mut values = vec![
            Value::from(f64::NAN),
            Value::from(f64::INFINITY),
            Value::from(3),
            Value::new_u64(u64::MAX),
            Value::from(-0.5),
        ];
        values.sort();
        assert_eq!(values[0], -0.5);
        assert_eq!(values[1], 3);
        assert!(values[4].as_f64().is_some_and(f64::is_nan));
        assert_eq!(Value::from(f64::NAN).cmp(&Value::from(f64::NAN)), Ordering::Equal);
        assert!(Value::from(f64::NAN) > Value::new_u64(u64::MAX));
    }

    #[test]
    fn test_containers() {
        assert!(array![1, 2] < array![1, 3]);
        assert!(array![1, 2] < array![1, 2, 0]);
        assert!(object! {"a": 1} < object! {"a": 2});
        assert!(object! {"a": 9} < object! {"b": 0});
        assert!(object! {"a": 1} < object! {"a": 1, "b": 0});
        assert_eq!(
            object! {"b": 1, "a": 2}.cmp(&object! {"a": 2, "b": 1}),
            Ordering::Equal
        );
    }
}

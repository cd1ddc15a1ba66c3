/// Construct an array [`Value`](crate::Value) from a list of expressions.
/// Every element goes through `Value::from`, so nested `array!` and
/// `object!` calls and plain Rust literals can be mixed.
///
/// ```
/// use jsontree::{array, object, JsonValueTrait};
///
/// let v = array![1, "two", array![3.0], object! {"four": 4}];
/// assert_eq!(v.len(), 4);
/// assert_eq!(v[1].as_str(), Some("two"));
/// assert_eq!(v[3]["four"], 4);
///
/// // a 2x3 matrix of zeros
/// let m = array![array![0, 0, 0], array![0, 0, 0]];
/// assert_eq!(m[1].len(), 3);
/// ```
#[macro_export]
macro_rules! array {
    () => {
        $crate::Value::new_array()
    };

    ($($elem:expr),+ $(,)?) => {
        <$crate::Value as ::core::iter::FromIterator<$crate::Value>>::from_iter([
            $($crate::Value::from($elem)),+
        ])
    };
}

/// Construct an object [`Value`](crate::Value) from `"key": value` pairs.
/// Keys are string literals; values go through `Value::from`. When a key is
/// repeated, the first occurrence is kept.
///
/// ```
/// use jsontree::{array, object, JsonValueTrait};
///
/// let v = object! {
///     "code": 200,
///     "features": array!["serde", "json"],
///     "code": 404,
/// };
/// assert_eq!(v.len(), 2);
/// assert_eq!(v["code"], 200);
/// assert!(object! {}.is_object());
/// ```
#[macro_export]
macro_rules! object {
    () => {
        $crate::Value::new_object()
    };

    ($($key:literal : $value:expr),+ $(,)?) => {
        $crate::Value::from(
            <$crate::Object as ::core::iter::FromIterator<(&'static str, $crate::Value)>>::from_iter([
                $(($key, $crate::Value::from($value))),+
            ])
        )
    };
}

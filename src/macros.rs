/// Builds a [`Value`](crate::Value) from JSON-like literal syntax.
///
/// Leaves that are not `null`, `true`, `false`, an array or an object go
/// through [`to_value`](crate::to_value), so wide integer literals such as
/// `7_i128` become [`Value::BigInt`](crate::Value::BigInt). Negative numbers
/// and other multi-token expressions need parentheses inside arrays and
/// objects.
///
/// A leaf that [`to_value`](crate::to_value) rejects, such as a map whose keys
/// are not string-like, silently becomes [`Value::Null`](crate::Value::Null).
/// Call `to_value` directly when that error matters.
///
/// ```rust
/// use serde_safenum::{value, Value};
///
/// let tree = value!({
///     "id": 9_007_199_254_740_993_i128,
///     "tags": ["a", null, (-1)],
///     "meta": {}
/// });
/// assert!(tree.get("id").is_some_and(Value::is_bigint));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}

//! Dynamic value tree.
//!
//! This module provides the [`Value`] enum, the input and output type of the
//! normalizer. A `Value` is a tree of scalars, sequences and string-keyed
//! mappings, close to what a JSON document can hold, plus two kinds of leaf
//! that JSON cannot carry directly:
//!
//! - [`Value::BigInt`]: an arbitrary-precision integer
//! - [`Value::Absent`]: a member that is present in the tree but has no value,
//!   distinct from an explicit [`Value::Null`]
//!
//! ## Core Types
//!
//! - [`Value`]: null, absent, bool, number, string, date, bigint, array, object
//! - [`Number`]: an `i64` integer or an `f64` float
//!
//! ## Creating Values
//!
//! ```rust
//! use serde_safenum::{value, BigInt, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//! let big = Value::from(BigInt::from(1u64 << 60));
//!
//! let obj = value!({
//!     "name": "Alice",
//!     "tags": ["a", "b"]
//! });
//! assert!(obj.is_object());
//! assert!(big.is_bigint());
//! ```
//!
//! ## Wide Rust integers
//!
//! `i128` and `u128` always become [`Value::BigInt`], as do `u64` values above
//! `i64::MAX`. Every other Rust integer becomes a [`Number::Integer`].
//!
//! ```rust
//! use serde_safenum::Value;
//!
//! assert!(Value::from(7_i128).is_bigint());
//! assert!(Value::from(u64::MAX).is_bigint());
//! assert!(Value::from(7_u64).is_number());
//! ```

use crate::Map;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Largest integer magnitude an `f64` represents exactly, together with all
/// smaller magnitudes: 2^53 - 1.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// A dynamically-typed value tree.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{Number, Value};
///
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(Value::Null.is_null());
/// assert!(Value::Absent.is_absent());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    /// A slot that exists but holds nothing. Encoded as `null` in sequences and
    /// left out of mappings.
    Absent,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    Array(Vec<Value>),
    Object(Map),
}

/// An ordinary numeric scalar.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// Floats qualify when they have no fractional part and lie inside the
    /// `i64` range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_safenum::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Float(f64::INFINITY).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => float_to_i64(*f),
        }
    }

    /// Converts this number to an `f64`, rounding integers above 2^53 to the
    /// nearest representable value.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

/// Returns the `i64` holding exactly `f`, if there is one.
///
/// `i64::MAX as f64` rounds up to 2^63, which is out of range, hence the
/// half-open upper bound.
pub(crate) fn float_to_i64(f: f64) -> Option<i64> {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() == 0.0 && f >= -TWO_POW_63 && f < TWO_POW_63 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

macro_rules! number_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::Integer(i64::from(value))
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(f64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Returns `true` for both [`Value::Null`] and [`Value::Absent`].
    #[inline]
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Absent)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bigint(&self) -> bool {
        matches!(self, Value::BigInt(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if a [`Value::BigInt`] occurs anywhere in this tree.
    ///
    /// A normalized tree never contains one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_safenum::{value, Value};
    ///
    /// let tree = value!({ "ids": [1, 2, (7_i128)] });
    /// assert!(tree.contains_bigint());
    /// assert!(!tree.normalized().contains_bigint());
    /// ```
    #[must_use]
    pub fn contains_bigint(&self) -> bool {
        match self {
            Value::BigInt(_) => true,
            Value::Array(items) => items.iter().any(Value::contains_bigint),
            Value::Object(map) => map.values().any(Value::contains_bigint),
            Value::Null
            | Value::Absent
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Date(_) => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an `i64` when it is a whole number that fits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_safenum::{BigInt, Number, Value};
    ///
    /// assert_eq!(Value::Number(Number::Float(42.0)).as_i64(), Some(42));
    /// assert_eq!(Value::BigInt(BigInt::from(-5)).as_i64(), Some(-5));
    /// assert_eq!(Value::from(u64::MAX).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            Value::BigInt(bi) => bi.to_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(bi) => Some(bi),
            _ => None,
        }
    }

    /// Looks up `key` if this value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Absent => write!(f, "absent"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Date(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::BigInt(bi) => write!(f, "{}n", bi),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => {
                write!(f, "{{")?;
                for (i, (k, v)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Newtype name that marks a large integer on its way through serde.
///
/// [`ValueSerializer`](crate::ValueSerializer) recognizes it and rebuilds a
/// [`Value::BigInt`]; every other serializer just sees the inner number.
pub(crate) const BIGINT_TOKEN: &str = "$serde_safenum::private::BigInt";

/// Encodes a large integer with the narrowest serde integer method that holds
/// it exactly, falling back to a decimal string past 128 bits.
///
/// Encoders that cannot take `i128`/`u128` will reject the wider cases; run
/// [`normalize`](crate::normalize) first for those.
pub(crate) struct BigIntRepr<'a>(pub(crate) &'a BigInt);

impl Serialize for BigIntRepr<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bi = self.0;
        if let Some(i) = bi.to_i64() {
            serializer.serialize_i64(i)
        } else if let Some(u) = bi.to_u64() {
            serializer.serialize_u64(u)
        } else if let Some(i) = bi.to_i128() {
            serializer.serialize_i128(i)
        } else if let Some(u) = bi.to_u128() {
            serializer.serialize_u128(u)
        } else {
            serializer.serialize_str(&bi.to_string())
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Absent => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::BigInt(bi) => {
                serializer.serialize_newtype_struct(BIGINT_TOKEN, &BigIntRepr(bi))
            }
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let present = obj.values().filter(|v| !v.is_absent()).count();
                let mut map = serializer.serialize_map(Some(present))?;
                for (k, v) in obj.iter().filter(|(_, v)| !v.is_absent()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::from(value))
            }

            fn visit_i128<E>(self, value: i128) -> Result<Self::Value, E> {
                Ok(Value::BigInt(BigInt::from(value)))
            }

            fn visit_u128<E>(self, value: u128) -> Result<Self::Value, E> {
                Ok(Value::BigInt(BigInt::from(value)))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| crate::Error::custom(format!("expected integer, found {}", value)))
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            Value::BigInt(bi) => Ok(crate::normalize::bigint_to_f64(&bi)),
            _ => Err(crate::Error::custom(format!(
                "expected number, found {}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for BigInt {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::BigInt(bi) => Ok(bi),
            Value::Number(Number::Integer(i)) => Ok(BigInt::from(i)),
            _ => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::custom(format!(
                "expected bool, found {}",
                value
            ))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::custom(format!(
                "expected string, found {}",
                value
            ))),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Value::Number(Number::Integer(i)),
            Err(_) => Value::BigInt(BigInt::from(value)),
        }
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(BigInt::from(value))
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        Value::BigInt(BigInt::from(value))
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_i64() {
        let result: i64 = TryFrom::try_from(Value::Number(Number::Float(42.0))).unwrap();
        assert_eq!(result, 42);

        let result: i64 = TryFrom::try_from(Value::BigInt(BigInt::from(-7))).unwrap();
        assert_eq!(result, -7);

        assert!(i64::try_from(Value::from(u128::MAX)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_f64_rounds_bigint() {
        let big = Value::BigInt(BigInt::from(9_007_199_254_740_993_i64));
        let result: f64 = TryFrom::try_from(big).unwrap();
        assert_eq!(result, 9_007_199_254_740_992.0);
    }

    #[test]
    fn test_tryfrom_bigint() {
        let result: BigInt = TryFrom::try_from(Value::from(5)).unwrap();
        assert_eq!(result, BigInt::from(5));
        assert!(BigInt::try_from(Value::from(5.5)).is_err());
    }

    #[test]
    fn test_wide_integers_become_bigint() {
        assert_eq!(Value::from(3_i128), Value::BigInt(BigInt::from(3)));
        assert_eq!(Value::from(3_u128), Value::BigInt(BigInt::from(3)));
        assert_eq!(Value::from(3_u64), Value::Number(Number::Integer(3)));
        assert_eq!(
            Value::from(u64::MAX),
            Value::BigInt(BigInt::from(u64::MAX))
        );
    }

    #[test]
    fn test_float_to_i64_bounds() {
        assert_eq!(float_to_i64(-9_223_372_036_854_775_808.0), Some(i64::MIN));
        assert_eq!(float_to_i64(9_223_372_036_854_775_808.0), None);
        assert_eq!(float_to_i64(f64::NAN), None);
        assert_eq!(float_to_i64(0.5), None);
    }

    #[test]
    fn test_display() {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(7_i128));
        map.insert("tags".to_string(), Value::from(vec![Value::from("a"), Value::Null]));
        assert_eq!(Value::Object(map).to_string(), r#"{"id": 7n, "tags": ["a", null]}"#);
    }

    #[test]
    fn test_contains_bigint() {
        let nested = Value::from(vec![Value::from(vec![Value::from(1_u128)])]);
        assert!(nested.contains_bigint());
        assert!(!Value::from(vec![Value::from(1)]).contains_bigint());
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}

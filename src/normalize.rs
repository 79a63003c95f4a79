//! Large-integer normalization.
//!
//! JSON numbers are read back as IEEE-754 doubles by most consumers, so an
//! integer with a magnitude above 2^53 - 1 cannot cross a JSON boundary
//! intact. [`normalize`] rewrites every [`Value::BigInt`] leaf of a tree into a
//! [`Value::Number`] and copies everything else as is.
//!
//! # Precision loss
//!
//! The conversion rounds to the nearest `f64` (ties to even). Integers inside
//! `-(2^53 - 1)..=2^53 - 1` survive exactly; larger magnitudes are silently
//! rounded, and magnitudes beyond `f64::MAX` become signed infinity. This is
//! not an error. Use [`try_normalize`] with [`PrecisionPolicy::Strict`] or
//! [`PrecisionPolicy::Stringify`] if rounding is unacceptable.
//!
//! A converted value whose rounded result is a whole number inside the `i64`
//! range is stored as [`Number::Integer`], so it still encodes as `5` rather
//! than `5.0`. The stored integer is the rounded double, never the original.
//!
//! # Recursion
//!
//! Both entry points recurse once per nesting level. For untrusted input set
//! [`NormalizeOptions::max_depth`] so a hostile document fails with
//! [`Error::DepthLimitExceeded`] instead of exhausting the stack.
//!
//! ```rust
//! use serde_safenum::{normalize, value, Value};
//!
//! let input = value!({ "id": (9_007_199_254_740_993_i128), "name": "x" });
//! let output = normalize(&input);
//!
//! assert_eq!(output, value!({ "id": 9_007_199_254_740_992_i64, "name": "x" }));
//! assert!(input.contains_bigint());
//! ```

use crate::value::{float_to_i64, MAX_SAFE_INTEGER};
use crate::{Error, Map, NormalizeOptions, Number, PrecisionPolicy, Result, Value};
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use std::fmt::Write;

/// Returns a copy of `value` with every large integer replaced by the nearest
/// `f64`-representable number.
///
/// Never fails and never touches its input. Sequences keep their length and
/// order; mappings keep their keys in insertion order. See the
/// [module documentation](self) for the rounding rules.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{normalize, value};
///
/// let input = value!({ "a": null, "b": { "c": (5_i128) } });
/// assert_eq!(normalize(&input), value!({ "a": null, "b": { "c": 5 } }));
/// ```
#[must_use]
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Absent => Value::Absent,
        Value::BigInt(bi) => {
            #[cfg(feature = "tracing")]
            if !is_safe_integer(bi) {
                tracing::debug!(value = %bi, "large integer rounded to nearest f64");
            }
            bigint_to_value(bi)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map.iter() {
                out.insert(k.clone(), normalize(v));
            }
            Value::Object(out)
        }
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(*n),
        Value::String(s) => Value::String(s.clone()),
        Value::Date(dt) => Value::Date(*dt),
    }
}

/// Normalizes `value` under `options`.
///
/// With [`NormalizeOptions::default`] this returns the same tree as
/// [`normalize`] and cannot fail.
///
/// # Errors
///
/// - [`Error::PrecisionLoss`] under [`PrecisionPolicy::Strict`] when a large
///   integer lies outside the safe range
/// - [`Error::DepthLimitExceeded`] when a node sits deeper than
///   [`NormalizeOptions::max_depth`]
///
/// Both carry the JSON Pointer of the first offending node in document order.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{try_normalize, value, NormalizeOptions};
///
/// let input = value!({ "users": [{ "id": (18_446_744_073_709_551_615_u128) }] });
///
/// let err = try_normalize(&input, &NormalizeOptions::strict()).unwrap_err();
/// assert_eq!(err.path(), Some("/users/0/id"));
///
/// let out = try_normalize(&input, &NormalizeOptions::stringify()).unwrap();
/// assert_eq!(out, value!({ "users": [{ "id": "18446744073709551615" }] }));
/// ```
pub fn try_normalize(value: &Value, options: &NormalizeOptions) -> Result<Value> {
    Walker::new(options).walk(value)
}

impl Value {
    /// Shorthand for [`normalize`].
    #[must_use]
    pub fn normalized(&self) -> Value {
        normalize(self)
    }

    /// Shorthand for [`try_normalize`].
    ///
    /// # Errors
    ///
    /// See [`try_normalize`].
    pub fn try_normalized(&self, options: &NormalizeOptions) -> Result<Value> {
        try_normalize(self, options)
    }
}

/// Returns `true` if `n` lies in `-(2^53 - 1)..=2^53 - 1` and so converts to
/// `f64` without rounding.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{is_safe_integer, BigInt};
///
/// assert!(is_safe_integer(&BigInt::from(9_007_199_254_740_991_i64)));
/// assert!(!is_safe_integer(&BigInt::from(9_007_199_254_740_992_i64)));
/// assert!(is_safe_integer(&BigInt::from(-9_007_199_254_740_991_i64)));
/// ```
#[must_use]
pub fn is_safe_integer(n: &BigInt) -> bool {
    n.to_i64()
        .is_some_and(|i| i.unsigned_abs() <= MAX_SAFE_INTEGER as u64)
}

/// Nearest `f64` to `bi`, ties to even, saturating to signed infinity.
pub(crate) fn bigint_to_f64(bi: &BigInt) -> f64 {
    if let Some(i) = bi.to_i128() {
        return i as f64;
    }
    bi.to_f64().unwrap_or(match bi.sign() {
        Sign::Minus => f64::NEG_INFINITY,
        _ => f64::INFINITY,
    })
}

fn bigint_to_value(bi: &BigInt) -> Value {
    let f = bigint_to_f64(bi);
    match float_to_i64(f) {
        Some(i) => Value::Number(Number::Integer(i)),
        None => Value::Number(Number::Float(f)),
    }
}

enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Option-aware traversal that remembers where it is, for error paths.
struct Walker<'o, 'a> {
    options: &'o NormalizeOptions,
    path: Vec<Segment<'a>>,
}

impl<'o, 'a> Walker<'o, 'a> {
    fn new(options: &'o NormalizeOptions) -> Self {
        Walker {
            options,
            path: Vec::new(),
        }
    }

    fn walk(&mut self, value: &'a Value) -> Result<Value> {
        if let Some(limit) = self.options.max_depth {
            if self.path.len() > limit {
                #[cfg(feature = "tracing")]
                tracing::trace!(path = %self.pointer(), limit, "depth limit exceeded");
                return Err(Error::depth_limit_exceeded(&self.pointer(), limit));
            }
        }

        match value {
            Value::Null => Ok(Value::Null),
            Value::Absent => Ok(Value::Absent),
            Value::BigInt(bi) => self.convert(bi),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    let converted = self.walk(item);
                    self.path.pop();
                    out.push(converted?);
                }
                Ok(Value::Array(out))
            }
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (k, v) in map.iter() {
                    self.path.push(Segment::Key(k.as_str()));
                    let converted = self.walk(v);
                    self.path.pop();
                    out.insert(k.clone(), converted?);
                }
                Ok(Value::Object(out))
            }
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Number(n) => Ok(Value::Number(*n)),
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Date(dt) => Ok(Value::Date(*dt)),
        }
    }

    fn convert(&self, bi: &BigInt) -> Result<Value> {
        if is_safe_integer(bi) {
            return Ok(bigint_to_value(bi));
        }
        match self.options.precision {
            PrecisionPolicy::Lossy => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %self.pointer(), value = %bi, "large integer rounded to nearest f64");
                Ok(bigint_to_value(bi))
            }
            PrecisionPolicy::Strict => {
                #[cfg(feature = "tracing")]
                tracing::trace!(path = %self.pointer(), value = %bi, "large integer rejected");
                Err(Error::precision_loss(&self.pointer(), bi))
            }
            PrecisionPolicy::Stringify => Ok(Value::String(bi.to_string())),
        }
    }

    /// Renders the current position as an RFC 6901 JSON Pointer.
    fn pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            out.push('/');
            match segment {
                Segment::Key(k) => {
                    for ch in k.chars() {
                        match ch {
                            '~' => out.push_str("~0"),
                            '/' => out.push_str("~1"),
                            _ => out.push(ch),
                        }
                    }
                }
                Segment::Index(i) => {
                    let _ = write!(out, "{}", i);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> Value {
        Value::BigInt(s.parse().unwrap())
    }

    #[test]
    fn test_safe_boundary_exact() {
        let max = normalize(&big("9007199254740991"));
        assert_eq!(max, Value::Number(Number::Integer(MAX_SAFE_INTEGER)));

        let min = normalize(&big("-9007199254740991"));
        assert_eq!(min, Value::Number(Number::Integer(-MAX_SAFE_INTEGER)));
    }

    #[test]
    fn test_rounds_half_to_even() {
        // 2^53 + 1 sits halfway between 2^53 and 2^53 + 2
        assert_eq!(
            normalize(&big("9007199254740993")),
            Value::Number(Number::Integer(9_007_199_254_740_992))
        );
        // 2^53 + 3 sits halfway between 2^53 + 2 and 2^53 + 4
        assert_eq!(
            normalize(&big("9007199254740995")),
            Value::Number(Number::Integer(9_007_199_254_740_996))
        );
    }

    #[test]
    fn test_beyond_i64_becomes_float() {
        let out = normalize(&big("18446744073709551617"));
        assert_eq!(out, Value::Number(Number::Float(18_446_744_073_709_551_616.0)));

        let out = normalize(&Value::from(i64::MAX as i128));
        assert_eq!(out, Value::Number(Number::Float(9_223_372_036_854_775_808.0)));

        let out = normalize(&Value::from(i64::MIN as i128));
        assert_eq!(out, Value::Number(Number::Integer(i64::MIN)));
    }

    #[test]
    fn test_overflow_saturates_to_infinity() {
        let huge = BigInt::from(10).pow(400);
        assert_eq!(
            normalize(&Value::BigInt(huge.clone())),
            Value::Number(Number::Float(f64::INFINITY))
        );
        assert_eq!(
            normalize(&Value::BigInt(-huge)),
            Value::Number(Number::Float(f64::NEG_INFINITY))
        );
    }

    #[test]
    fn test_wider_than_128_bits_rounds_half_to_even() {
        let base = BigInt::from(2).pow(200);
        let half_ulp = BigInt::from(2).pow(147);
        let expected_low = 2f64.powi(200);
        let expected_high = 2f64.powi(200) + 2f64.powi(148);

        // exactly halfway: the even neighbour 2^200 wins
        let tie = &base + &half_ulp;
        assert_eq!(
            normalize(&Value::BigInt(tie.clone())),
            Value::Number(Number::Float(expected_low))
        );
        assert_eq!(
            normalize(&Value::BigInt(-tie)),
            Value::Number(Number::Float(-expected_low))
        );

        // one past halfway rounds up
        let above: BigInt = &base + &half_ulp + 1;
        assert_eq!(
            normalize(&Value::BigInt(above.clone())),
            Value::Number(Number::Float(expected_high))
        );
        assert_eq!(
            normalize(&Value::BigInt(-above)),
            Value::Number(Number::Float(-expected_high))
        );
    }

    #[test]
    fn test_terminal_values_untouched() {
        assert_eq!(normalize(&Value::Null), Value::Null);
        assert_eq!(normalize(&Value::Absent), Value::Absent);
    }

    #[test]
    fn test_pointer_escaping() {
        let options = NormalizeOptions::strict();
        let mut inner = Map::new();
        inner.insert("a/b~c".to_string(), big("9007199254740993"));
        let tree = Value::Array(vec![Value::Null, Value::Object(inner)]);

        let err = try_normalize(&tree, &options).unwrap_err();
        assert_eq!(err.path(), Some("/1/a~1b~0c"));
    }

    #[test]
    fn test_depth_limit_at_root() {
        let options = NormalizeOptions::new().with_max_depth(0);
        assert!(try_normalize(&Value::from(1), &options).is_ok());
        assert!(try_normalize(&Value::Array(vec![]), &options).is_ok());

        let err = try_normalize(&Value::Array(vec![Value::Null]), &options).unwrap_err();
        assert_eq!(err, Error::depth_limit_exceeded("/0", 0));
    }

    #[test]
    fn test_walker_matches_plain_normalize() {
        let mut map = Map::new();
        map.insert("n".to_string(), big("-18446744073709551617"));
        map.insert("s".to_string(), big("42"));
        let tree = Value::Array(vec![Value::Object(map), Value::Absent, Value::from(1.5)]);

        assert_eq!(
            try_normalize(&tree, &NormalizeOptions::default()).unwrap(),
            normalize(&tree)
        );
    }
}

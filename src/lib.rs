//! # serde_safenum
//!
//! Make value trees holding arbitrary-precision integers safe to encode as JSON.
//!
//! ## The problem
//!
//! Identifiers and counters are often wider than 53 bits: database `BIGINT`
//! keys, snowflake ids, `u128` balances. JSON has no integer type of its own,
//! and nearly every consumer parses numbers into IEEE-754 doubles, so such a
//! value either fails to encode or arrives altered. The fix applied at the
//! response boundary is to normalize the tree first: every large integer is
//! replaced by the nearest double, and the rest of the tree is copied as is.
//!
//! ## Key Features
//!
//! - **Structure-preserving**: sequences keep their order and length,
//!   mappings keep their keys in insertion order
//! - **Pure**: the input is borrowed, never mutated; the output is a fresh tree
//! - **Explicit about loss**: lossy by default, with strict and stringify
//!   policies when rounding is unacceptable
//! - **Bounded**: an optional depth limit for untrusted input
//! - **Serde compatible**: any `T: Serialize` converts into a [`Value`] with
//!   wide integers captured, not truncated
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_safenum::{normalize, value};
//!
//! let input = value!([1_i128, 2_i128, 3_i128]);
//! assert_eq!(normalize(&input), value!([1, 2, 3]));
//! ```
//!
//! ### At a serialization boundary
//!
//! ```rust
//! use serde::Serialize;
//! use serde_safenum::to_json_string;
//!
//! #[derive(Serialize)]
//! struct Row { id: u128, name: String }
//!
//! let json = to_json_string(&Row { id: 9_007_199_254_740_993, name: "x".into() }).unwrap();
//! assert_eq!(json, r#"{"id":9007199254740992,"name":"x"}"#);
//! ```
//!
//! ### Refusing to round
//!
//! ```rust
//! use serde_safenum::{to_json_string_with_options, NormalizeOptions};
//!
//! let ids = vec![1_u128, 1 << 64];
//!
//! assert!(to_json_string_with_options(&ids, &NormalizeOptions::strict()).is_err());
//!
//! let json = to_json_string_with_options(&ids, &NormalizeOptions::stringify()).unwrap();
//! assert_eq!(json, r#"[1,"18446744073709551616"]"#);
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature enabled, each lossy conversion emits a `debug`
//! event and each policy failure a `trace` event.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - [`normalize`] never panics and never fails
//! - `Value` is `Send + Sync`; normalization holds no shared state

pub mod error;
pub mod macros;
pub mod map;
pub mod normalize;
pub mod options;
pub mod ser;
pub mod value;

pub use error::{Error, Result};
pub use map::Map;
pub use normalize::{is_safe_integer, normalize, try_normalize};
pub use num_bigint::BigInt;
pub use options::{NormalizeOptions, PrecisionPolicy};
pub use ser::ValueSerializer;
pub use value::{Number, Value, MAX_SAFE_INTEGER};

use serde::Serialize;
use std::io;

/// Convert any `T: Serialize` to a [`Value`].
///
/// Wide integers (`i128`, `u128`, `u64` above `i64::MAX`) become
/// [`Value::BigInt`]; nothing is rounded at this stage.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if a map key is not string-like or the type's
/// `Serialize` impl reports a custom error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    ser::to_value(value)
}

/// Convert any `T: Serialize` to a [`Value`] and normalize it.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{to_normalized_value, value};
///
/// let out = to_normalized_value(&vec![5_u128]).unwrap();
/// assert_eq!(out, value!([5]));
/// ```
///
/// # Errors
///
/// Same as [`to_value`]. Normalization itself cannot fail.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_normalized_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    Ok(normalize(&to_value(value)?))
}

/// Convert, normalize and encode any `T: Serialize` as compact JSON.
///
/// # Errors
///
/// Returns an error if conversion fails or the JSON encoder rejects the tree.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_json_string_with_options(value, &NormalizeOptions::default())
}

/// Like [`to_json_string`], normalizing under `options`.
///
/// # Errors
///
/// Returns an error if conversion fails, normalization fails under `options`,
/// or the JSON encoder rejects the tree.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_string_with_options<T>(value: &T, options: &NormalizeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let normalized = try_normalize(&to_value(value)?, options)?;
    Ok(serde_json::to_string(&normalized)?)
}

/// Convert, normalize and write any `T: Serialize` as compact JSON.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{to_json_writer, NormalizeOptions};
///
/// let mut buffer = Vec::new();
/// to_json_writer(&mut buffer, &vec![u64::MAX], &NormalizeOptions::default()).unwrap();
///
/// let back: Vec<f64> = serde_json::from_slice(&buffer).unwrap();
/// assert_eq!(back, vec![18_446_744_073_709_551_616.0]);
/// ```
///
/// # Errors
///
/// Returns an error if conversion or normalization fails, or writing to the
/// writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json_writer<W, T>(writer: W, value: &T, options: &NormalizeOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let normalized = try_normalize(&to_value(value)?, options)?;
    serde_json::to_writer(writer, &normalized)?;
    Ok(())
}

//! Error types for value conversion and normalization.
//!
//! [`normalize`](crate::normalize) itself never fails. Errors only come out of
//! the fallible entry points:
//!
//! - [`try_normalize`](crate::try_normalize) when a strict precision policy or
//!   a depth bound is configured
//! - [`to_value`](crate::to_value) when a Rust type cannot be represented as a
//!   [`Value`](crate::Value)
//! - the JSON helpers when the encoder or the writer fails
//!
//! Paths are JSON Pointers (RFC 6901), so `/users/3/id` names the `id` field of
//! the fourth element of `users`. The root is the empty string.
//!
//! ## Examples
//!
//! ```rust
//! use serde_safenum::{try_normalize, BigInt, Error, NormalizeOptions, Value};
//!
//! let value = Value::BigInt(BigInt::from(9_007_199_254_740_993_i64));
//! let err = try_normalize(&value, &NormalizeOptions::strict()).unwrap_err();
//!
//! assert!(matches!(err, Error::PrecisionLoss { .. }));
//! assert!(err.to_string().contains("9007199254740993"));
//! ```

use std::fmt;
use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A large integer could not be represented exactly and the strict policy was in force.
    #[error("Precision loss at '{path}': {value} is outside the exact f64 integer range")]
    PrecisionLoss { path: String, value: String },

    /// The input tree is deeper than the configured bound.
    #[error("Depth limit exceeded at '{path}': maximum depth is {limit}")]
    DepthLimitExceeded { path: String, limit: usize },

    /// A map key serialized to something other than a string-like scalar
    #[error("Unsupported map key: {0}")]
    UnsupportedKey(String),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(String),

    /// IO error during writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a precision-loss error for the large integer at `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_safenum::Error;
    ///
    /// let err = Error::precision_loss("/id", "9007199254740993");
    /// assert!(err.to_string().contains("'/id'"));
    /// ```
    pub fn precision_loss(path: &str, value: impl fmt::Display) -> Self {
        Error::PrecisionLoss {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    /// Creates a depth-limit error for the node at `path`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_safenum::Error;
    ///
    /// let err = Error::depth_limit_exceeded("/a/b", 1);
    /// assert!(err.to_string().contains("maximum depth is 1"));
    /// ```
    pub fn depth_limit_exceeded(path: &str, limit: usize) -> Self {
        Error::DepthLimitExceeded {
            path: path.to_string(),
            limit,
        }
    }

    /// Creates an unsupported-key error.
    pub fn unsupported_key(found: &str) -> Self {
        Error::UnsupportedKey(found.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_safenum::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the JSON Pointer of the offending node, if the error has one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::PrecisionLoss { path, .. } | Error::DepthLimitExceeded { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::io(&err.to_string())
        } else {
            Error::Json(err.to_string())
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_accessor() {
        assert_eq!(Error::precision_loss("/id", 1).path(), Some("/id"));
        assert_eq!(Error::depth_limit_exceeded("", 0).path(), Some(""));
        assert_eq!(Error::custom("x").path(), None);
    }

    #[test]
    fn test_display_messages() {
        let err = Error::unsupported_key("array");
        assert_eq!(err.to_string(), "Unsupported map key: array");

        let err = Error::io("broken pipe");
        assert_eq!(err.to_string(), "IO error: broken pipe");
    }
}

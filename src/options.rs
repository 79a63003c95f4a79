//! Configuration for [`try_normalize`](crate::try_normalize).
//!
//! - [`NormalizeOptions`]: main configuration struct
//! - [`PrecisionPolicy`]: what to do with a large integer that an `f64`
//!   cannot hold exactly
//!
//! ## Examples
//!
//! ```rust
//! use serde_safenum::{NormalizeOptions, PrecisionPolicy};
//!
//! // Reject unsafe integers and deeply nested input
//! let options = NormalizeOptions::strict().with_max_depth(64);
//! assert_eq!(options.precision, PrecisionPolicy::Strict);
//! assert_eq!(options.max_depth, Some(64));
//! ```

/// Handling of large integers whose magnitude exceeds
/// [`MAX_SAFE_INTEGER`](crate::MAX_SAFE_INTEGER).
///
/// Integers inside the safe range are always converted exactly, whatever the
/// policy.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::PrecisionPolicy;
///
/// assert_eq!(PrecisionPolicy::default(), PrecisionPolicy::Lossy);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PrecisionPolicy {
    /// Round to the nearest `f64` without complaint.
    #[default]
    Lossy,
    /// Fail with [`Error::PrecisionLoss`](crate::Error::PrecisionLoss).
    Strict,
    /// Replace the integer with its exact decimal string.
    Stringify,
}

/// Configuration options for normalization.
///
/// # Examples
///
/// ```rust
/// use serde_safenum::{NormalizeOptions, PrecisionPolicy};
///
/// let options = NormalizeOptions::new();
/// assert_eq!(options.precision, PrecisionPolicy::Lossy);
/// assert_eq!(options.max_depth, None);
///
/// let options = NormalizeOptions::new()
///     .with_precision(PrecisionPolicy::Stringify)
///     .with_max_depth(8);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub precision: PrecisionPolicy,
    /// Deepest nesting accepted. The root sits at depth 0, its direct
    /// children at depth 1. `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl NormalizeOptions {
    /// Creates default options: lossy rounding, no depth bound.
    ///
    /// With these options [`try_normalize`](crate::try_normalize) cannot fail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject any large integer an `f64` cannot hold exactly.
    #[must_use]
    pub fn strict() -> Self {
        NormalizeOptions {
            precision: PrecisionPolicy::Strict,
            ..Default::default()
        }
    }

    /// Creates options that turn unsafe large integers into decimal strings.
    #[must_use]
    pub fn stringify() -> Self {
        NormalizeOptions {
            precision: PrecisionPolicy::Stringify,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionPolicy) -> Self {
        self.precision = precision;
        self
    }

    /// Bounds the nesting depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_safenum::NormalizeOptions;
    ///
    /// let options = NormalizeOptions::new().with_max_depth(0);
    /// assert_eq!(options.max_depth, Some(0));
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Returns `true` when normalization under these options cannot fail.
    #[must_use]
    pub fn is_infallible(&self) -> bool {
        self.max_depth.is_none() && self.precision != PrecisionPolicy::Strict
    }
}

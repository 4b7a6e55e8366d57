//! Error type for color construction and parsing.

use std::num::ParseIntError;

use thiserror::Error;

/// Error returned when a user-supplied color is invalid.
///
/// Colors produced by conversions never fail: they clamp to range instead.
/// Only explicit constructors and parsers report errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// A channel value lies outside its valid range.
    #[error("channel {channel} value {value} outside of range [{min}, {max}]")]
    ChannelOutOfRange {
        /// Channel name (`r`, `g` or `b`)
        channel: &'static str,
        /// Rejected value
        value: f64,
        /// Lower bound of the valid range
        min: f64,
        /// Upper bound of the valid range
        max: f64,
    },
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

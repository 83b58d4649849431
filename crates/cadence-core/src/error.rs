//! Error types for parameter catalog construction.

use thiserror::Error;

/// Contract violations detected while building a parameter catalog.
///
/// These are startup errors: a correctly configured plugin never produces
/// them, so callers usually abort initialization when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// Two descriptors share the same id.
    #[error("duplicate parameter id: {0}")]
    DuplicateId(String),

    /// A descriptor was registered with an empty id.
    #[error("parameter id must not be empty (name: '{0}')")]
    EmptyId(String),

    /// The range is empty, inverted or uses a non-finite bound.
    #[error("invalid range for '{id}': min {min}, max {max}")]
    InvalidRange {
        /// Parameter id.
        id: String,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// The default value lies outside the parameter range.
    #[error("default {default} for '{id}' is outside [{min}, {max}]")]
    DefaultOutOfRange {
        /// Parameter id.
        id: String,
        /// Offending default.
        default: f32,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// Step size or skew factor is negative, zero or non-finite.
    #[error("invalid {what} {value} for '{id}'")]
    InvalidShape {
        /// Parameter id.
        id: String,
        /// Which shape attribute is wrong ("step" or "skew").
        what: &'static str,
        /// Offending value.
        value: f32,
    },

    /// A skew midpoint was requested outside the open range.
    #[error("skew midpoint {mid} is outside ({min}, {max})")]
    InvalidMidpoint {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
        /// Requested midpoint.
        mid: f32,
    },
}

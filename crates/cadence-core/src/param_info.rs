//! Parameter descriptors.
//!
//! A [`ParamDescriptor`] is the immutable definition of one plugin parameter:
//! its stable string id, display name and unit label, value range, default,
//! host capability flags, category and the converters used to format and
//! parse its value. Descriptors are collected into a
//! [`ParameterSet`](crate::ParameterSet) once at startup and never change
//! afterwards.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{ParamDescriptor, ParamFlags, ParamRange};
//!
//! let cutoff = ParamDescriptor::new("cutoff", "Cutoff", ParamRange::new(20.0, 20000.0), 1000.0)
//!     .with_label("Hz");
//!
//! assert_eq!(cutoff.id, "cutoff");
//! assert!(cutoff.flags.contains(ParamFlags::AUTOMATABLE));
//! assert_eq!(cutoff.value_to_text(440.0), "440.00");
//! ```

use std::fmt;

use crate::range::ParamRange;
use crate::text::{self, TextToValue, ValueToText};

/// Parameter capability flags for plugin host communication.
///
/// Use [`union`](Self::union) to combine.
///
/// # Example
///
/// ```rust
/// use cadence_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::DISCRETE);
/// assert!(flags.contains(ParamFlags::DISCRETE));
/// assert!(!flags.contains(ParamFlags::META));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter changes other parameters when set.
    pub const META: Self = Self(1 << 1);
    /// Parameter has discrete steps (enum-like, integer values).
    pub const DISCRETE: Self = Self(1 << 2);
    /// Parameter is an on/off switch.
    pub const BOOLEAN: Self = Self(1 << 3);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` without the bits in `other`.
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Host-facing role of a parameter.
///
/// Hosts use this to route gain and metering parameters to dedicated UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamCategory {
    /// Ordinary parameter.
    #[default]
    Generic,
    /// Input gain control.
    InputGain,
    /// Output gain control.
    OutputGain,
    /// Input level meter.
    InputMeter,
    /// Output level meter.
    OutputMeter,
    /// Compressor or limiter gain-reduction meter.
    CompressorGainReductionMeter,
    /// Expander or gate gain-reduction meter.
    ExpanderGainReductionMeter,
    /// Analysis meter.
    AnalysisMeter,
    /// Any other meter.
    OtherMeter,
}

/// Immutable definition of a single parameter.
#[derive(Clone)]
pub struct ParamDescriptor {
    /// Stable unique id, used as key in state trees and preset files.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit label appended by UIs (e.g., "dB", "Hz").
    pub label: String,
    /// Plain value range.
    pub range: ParamRange,
    /// Value applied on reset.
    pub default: f32,
    /// Host capability flags.
    pub flags: ParamFlags,
    /// Host-facing category.
    pub category: ParamCategory,
    value_to_text: ValueToText,
    text_to_value: TextToValue,
}

impl ParamDescriptor {
    /// Continuous automatable parameter with two-decimal text conversion.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        range: ParamRange,
        default: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: String::new(),
            range,
            default,
            flags: ParamFlags::AUTOMATABLE,
            category: ParamCategory::Generic,
            value_to_text: text::float_to_text(2),
            text_to_value: text::float_from_text(),
        }
    }

    /// Gain parameter in decibels with one decimal of display precision.
    pub fn gain_db(
        id: impl Into<String>,
        name: impl Into<String>,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::new(id, name, ParamRange::new(min, max), default)
            .with_label("dB")
            .with_value_to_text(text::float_to_text(1))
    }

    /// On/off switch stored as `0.0` / `1.0`.
    pub fn toggle(id: impl Into<String>, name: impl Into<String>, default: bool) -> Self {
        let labels = ["Off", "On"];
        Self::new(
            id,
            name,
            ParamRange::stepped(0.0, 1.0, 1.0),
            if default { 1.0 } else { 0.0 },
        )
        .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::BOOLEAN))
        .with_value_to_text(text::choice_to_text(&labels))
        .with_text_to_value(text::choice_from_text(&labels))
    }

    /// Discrete choice among `labels`, stored as the choice index.
    ///
    /// `labels` must not be empty; the default is the first choice.
    pub fn choice(id: impl Into<String>, name: impl Into<String>, labels: &[&str]) -> Self {
        let last = labels.len().saturating_sub(1).max(1) as f32;
        Self::new(id, name, ParamRange::stepped(0.0, last, 1.0), 0.0)
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::DISCRETE))
            .with_value_to_text(text::choice_to_text(labels))
            .with_text_to_value(text::choice_from_text(labels))
    }

    /// Sets the unit label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the parameter flags.
    pub fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the host category.
    pub fn with_category(mut self, category: ParamCategory) -> Self {
        self.category = category;
        self
    }

    /// Replaces the value formatter.
    pub fn with_value_to_text(mut self, f: ValueToText) -> Self {
        self.value_to_text = f;
        self
    }

    /// Replaces the text parser.
    pub fn with_text_to_value(mut self, f: TextToValue) -> Self {
        self.text_to_value = f;
        self
    }

    /// Formats a plain value.
    pub fn value_to_text(&self, value: f32) -> String {
        (self.value_to_text)(value)
    }

    /// Parses text into a plain value, clamped to the range.
    pub fn text_to_value(&self, text: &str) -> f32 {
        self.range.clamp((self.text_to_value)(text))
    }

    /// Returns `true` if hosts may automate this parameter.
    pub fn is_automatable(&self) -> bool {
        self.flags.contains(ParamFlags::AUTOMATABLE)
    }

    /// Returns `true` if setting this parameter changes others.
    pub fn is_meta(&self) -> bool {
        self.flags.contains(ParamFlags::META)
    }

    /// Returns `true` for stepped, enum-like parameters.
    pub fn is_discrete(&self) -> bool {
        self.flags.contains(ParamFlags::DISCRETE)
    }

    /// Returns `true` for on/off switches.
    pub fn is_boolean(&self) -> bool {
        self.flags.contains(ParamFlags::BOOLEAN)
    }

    /// Snaps and clamps a value into the legal set for this parameter.
    #[inline]
    pub fn legalize(&self, value: f32) -> f32 {
        self.range.snap(value)
    }

    /// Converts a plain value to `[0.0, 1.0]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        self.range.to_normalized(value)
    }

    /// Converts a normalized value back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.range.from_normalized(normalized)
    }

    /// Default value in normalized space.
    pub fn default_normalized(&self) -> f32 {
        self.range.to_normalized(self.default)
    }
}

impl fmt::Debug for ParamDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("label", &self.label)
            .field("range", &self.range)
            .field("default", &self.default)
            .field("flags", &self.flags)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

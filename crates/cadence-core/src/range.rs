//! Value ranges with step snapping and skewed normalization.
//!
//! A [`ParamRange`] maps a parameter's plain value (Hz, dB, ms, ...) to the
//! normalized `[0.0, 1.0]` space seen by automation hosts and back.
//!
//! # Normalization Formulas
//!
//! - **to normalized**: `((value - min) / (max - min)).powf(skew)`
//! - **from normalized**: `min + (max - min) * normalized.powf(1.0 / skew)`
//!
//! A skew of `1.0` is linear. Skews below `1.0` give more resolution to the
//! low end of the range, which suits frequency and time parameters. Use
//! [`ParamRange::with_centre`] to derive the skew from the value that should
//! sit at the middle of a slider.

use crate::error::ParamError;

/// Computes the skew factor that places `mid` at normalized `0.5`.
///
/// Returns [`ParamError::InvalidMidpoint`] unless `start < mid < end`.
///
/// # Example
///
/// ```rust
/// use cadence_core::skew_factor;
///
/// let skew = skew_factor(20.0, 20000.0, 1000.0).unwrap();
/// assert!(skew < 1.0);
/// ```
pub fn skew_factor(start: f32, end: f32, mid: f32) -> Result<f32, ParamError> {
    if !(mid > start && mid < end) {
        return Err(ParamError::InvalidMidpoint {
            min: start,
            max: end,
            mid,
        });
    }
    Ok(libm::logf(0.5) / libm::logf((mid - start) / (end - start)))
}

/// Plain value range of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Lower bound (inclusive).
    pub min: f32,
    /// Upper bound (inclusive).
    pub max: f32,
    /// Snapping interval. `0.0` means continuous.
    pub step: f32,
    /// Normalization skew. `1.0` means linear.
    pub skew: f32,
}

impl ParamRange {
    /// Continuous linear range.
    pub const fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            step: 0.0,
            skew: 1.0,
        }
    }

    /// Linear range snapped to `step`.
    pub const fn stepped(min: f32, max: f32, step: f32) -> Self {
        Self {
            min,
            max,
            step,
            skew: 1.0,
        }
    }

    /// Skewed range whose slider midpoint lands on `mid`.
    pub fn with_centre(min: f32, max: f32, mid: f32) -> Result<Self, ParamError> {
        let skew = skew_factor(min, max, mid)?;
        Ok(Self {
            min,
            max,
            step: 0.0,
            skew,
        })
    }

    /// Sets the snapping interval.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the normalization skew.
    pub const fn with_skew(mut self, skew: f32) -> Self {
        self.skew = skew;
        self
    }

    /// Checks the range shape, naming `id` in any error.
    pub fn validate(&self, id: &str) -> Result<(), ParamError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max <= self.min {
            return Err(ParamError::InvalidRange {
                id: id.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        if !self.step.is_finite() || self.step < 0.0 {
            return Err(ParamError::InvalidShape {
                id: id.to_string(),
                what: "step",
                value: self.step,
            });
        }
        if !self.skew.is_finite() || self.skew <= 0.0 {
            return Err(ParamError::InvalidShape {
                id: id.to_string(),
                what: "skew",
                value: self.skew,
            });
        }
        Ok(())
    }

    /// Returns `true` if `value` lies inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps a value to the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Snaps a value to the step grid, then clamps it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cadence_core::ParamRange;
    ///
    /// let range = ParamRange::stepped(0.0, 10.0, 0.5);
    /// assert_eq!(range.snap(3.3), 3.5);
    /// assert_eq!(range.snap(12.0), 10.0);
    /// ```
    #[inline]
    pub fn snap(&self, value: f32) -> f32 {
        if self.step > 0.0 {
            let steps = libm::floorf((value - self.min) / self.step + 0.5);
            self.clamp(self.min + self.step * steps)
        } else {
            self.clamp(value)
        }
    }

    /// Converts a plain value to `[0.0, 1.0]`.
    #[inline]
    pub fn to_normalized(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        let proportion = ((value - self.min) / span).clamp(0.0, 1.0);
        if self.skew == 1.0 {
            proportion
        } else {
            libm::powf(proportion, self.skew)
        }
    }

    /// Converts a normalized value back to the plain range, snapped to the step.
    #[inline]
    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let mut proportion = normalized.clamp(0.0, 1.0);
        if self.skew != 1.0 && proportion > 0.0 {
            proportion = libm::expf(libm::logf(proportion) / self.skew);
        }
        self.snap(self.min + (self.max - self.min) * proportion)
    }
}

impl Default for ParamRange {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

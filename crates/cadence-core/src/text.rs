//! Value/text converters for parameter display and entry.
//!
//! Descriptors carry a pair of converters: one formats a plain value for a
//! label or host display, the other parses user-typed text back into a
//! plain value. This module provides the common ones.

use std::sync::Arc;

/// Formats a plain value for display.
pub type ValueToText = Arc<dyn Fn(f32) -> String + Send + Sync>;

/// Parses display text back into a plain value.
pub type TextToValue = Arc<dyn Fn(&str) -> f32 + Send + Sync>;

/// Converter printing a fixed number of decimals.
///
/// # Example
///
/// ```rust
/// use cadence_core::text::float_to_text;
///
/// let fmt = float_to_text(2);
/// assert_eq!(fmt(0.5), "0.50");
/// ```
pub fn float_to_text(decimals: usize) -> ValueToText {
    Arc::new(move |value| format!("{value:.decimals$}"))
}

/// Lenient float parser.
///
/// Reads the longest numeric prefix after leading whitespace, so `"-6 dB"`
/// parses as `-6.0`. Text without a numeric prefix yields `0.0`.
///
/// # Example
///
/// ```rust
/// use cadence_core::text::text_to_float;
///
/// assert_eq!(text_to_float("  440Hz"), 440.0);
/// assert_eq!(text_to_float("-6 dB"), -6.0);
/// assert_eq!(text_to_float("loud"), 0.0);
/// ```
pub fn text_to_float(text: &str) -> f32 {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '+' | '-' if seen_exp && text[..i].ends_with(|p| p == 'e' || p == 'E') => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot && !seen_exp => seen_dot = true,
            'e' | 'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    // Back off trailing exponent markers or signs that never got digits.
    let mut candidate = &text[..end];
    while !candidate.is_empty() {
        if let Ok(value) = candidate.parse::<f32>() {
            return value;
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    0.0
}

/// Wraps [`text_to_float`] as a descriptor converter.
pub fn float_from_text() -> TextToValue {
    Arc::new(text_to_float)
}

/// Converter mapping a choice index to its label.
///
/// The value is floored to an index; indices outside the label list format
/// as an empty string.
pub fn choice_to_text(labels: &[&str]) -> ValueToText {
    let labels: Vec<String> = labels.iter().map(|s| (*s).to_string()).collect();
    Arc::new(move |value| {
        let index = libm::floorf(value);
        if index >= 0.0 && (index as usize) < labels.len() {
            labels[index as usize].clone()
        } else {
            tracing::warn!(value, "choice index out of range");
            String::new()
        }
    })
}

/// Converter mapping a label (case-insensitive) to its choice index.
///
/// Unknown labels map to index `0.0`.
pub fn choice_from_text(labels: &[&str]) -> TextToValue {
    let labels: Vec<String> = labels.iter().map(|s| (*s).to_string()).collect();
    Arc::new(move |text| {
        let text = text.trim();
        match labels.iter().position(|l| l.eq_ignore_ascii_case(text)) {
            Some(index) => index as f32,
            None => {
                tracing::warn!(label = text, "unknown choice label");
                0.0
            }
        }
    })
}

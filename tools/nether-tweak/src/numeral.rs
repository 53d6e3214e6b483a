//! Replacement numerals and their text form
//!
//! Matched tokens are always parsed as floats, but a rule decides whether the
//! value it writes back reads as an integer (`7`) or a float (`12.01`, `10.0`).
//! Carrying that choice in the type keeps the output text deterministic.

use std::fmt;

/// Replacement value for a matched numeral token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeral {
    /// Written as a plain integer, no decimal point. Holds an already
    /// truncated value; every digit of it is printed.
    Integer(f64),
    /// Written in float form, always with a fraction or an exponent
    Float(f64),
}

impl Numeral {
    /// Truncate toward zero, keeping integer form.
    ///
    /// Returns `None` for non-finite values.
    pub fn truncate(value: f64) -> Option<Self> {
        value.is_finite().then(|| Self::Integer(value.trunc()))
    }

    pub fn is_finite(&self) -> bool {
        match *self {
            Numeral::Integer(v) | Numeral::Float(v) => v.is_finite(),
        }
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            // + 0.0 folds -0.0 into 0
            Numeral::Integer(v) => write!(f, "{:.0}", v.trunc() + 0.0),
            Numeral::Float(v) => f.write_str(&format_float(v)),
        }
    }
}

/// Format a float in shortest round-trip form.
///
/// Integral values keep a `.0` suffix. Magnitudes from `1e16` up or below
/// `1e-4` switch to exponent form with a signed two-digit minimum exponent
/// (`1e+16`, `2.5e-05`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug already switches to exponent form at the same thresholds
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}

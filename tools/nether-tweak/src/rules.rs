//! Tweak rules
//!
//! A rule picks the token to rewrite on a line (leftmost match of its pattern),
//! may skip a line outright, and computes the replacement value. Matching is
//! byte based so lines that are not valid UTF-8 still pass through verbatim.

use regex::bytes::Regex;
use std::sync::LazyLock;

use crate::numeral::Numeral;

/// Run of ASCII digits
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit run pattern is valid"));

/// Digits, a decimal point, digits
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+").expect("decimal pattern is valid"));

/// Markers for position fields, nudged forward
const POSITION_MARKERS: [&[u8]; 2] = [b" x:", b" y:"];

/// Markers for size fields, shrunk
const SIZE_MARKERS: [&[u8]; 2] = [b" width:", b" height:"];

/// Added to integer `x`/`y` values
pub const POSITION_NUDGE: f64 = 0.01;

/// Subtracted from integer `width`/`height` values
pub const SIZE_SHRINK: f64 = 0.02;

/// Default multiplier for [`ScaleByConstant`]
pub const DEFAULT_SCALE_FACTOR: f64 = 4.0;

/// A per-line numeral substitution rule
pub trait NumeralRule {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Pattern whose leftmost match is the token to rewrite
    fn pattern(&self) -> &Regex;

    /// Whether the line passes through untouched without matching
    fn skips(&self, _line: &[u8]) -> bool {
        false
    }

    /// Replacement for the token, given the whole line and the parsed token value.
    ///
    /// Returns `None` when the result cannot be represented.
    fn replace(&self, line: &[u8], value: f64) -> Option<Numeral>;
}

/// Sprite-sheet coordinate offset.
///
/// Only touches lines without a `.`. The first digit run becomes:
/// - value + 0.01 on lines with ` x:` or ` y:`
/// - value - 0.02 on lines with ` width:` or ` height:`
/// - the value truncated to an integer otherwise
///
/// The first two branches write float form (`12.01`) and the last writes
/// integer form (`7`), so `007` on an unmarked line comes out as `7`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateOffset;

impl NumeralRule for CoordinateOffset {
    fn name(&self) -> &'static str {
        "coordinate offset"
    }

    fn pattern(&self) -> &Regex {
        &DIGIT_RUN
    }

    fn skips(&self, line: &[u8]) -> bool {
        line.contains(&b'.')
    }

    fn replace(&self, line: &[u8], value: f64) -> Option<Numeral> {
        if contains_any(line, &POSITION_MARKERS) {
            Some(Numeral::Float(value + POSITION_NUDGE))
        } else if contains_any(line, &SIZE_MARKERS) {
            Some(Numeral::Float(value - SIZE_SHRINK))
        } else {
            Numeral::truncate(value)
        }
    }
}

/// Multiplies the first decimal numeral on a line by a constant factor.
///
/// Lines without a decimal numeral are left alone.
#[derive(Debug, Clone, Copy)]
pub struct ScaleByConstant {
    factor: f64,
}

impl ScaleByConstant {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Default for ScaleByConstant {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_FACTOR)
    }
}

impl NumeralRule for ScaleByConstant {
    fn name(&self) -> &'static str {
        "scale by constant"
    }

    fn pattern(&self) -> &Regex {
        &DECIMAL
    }

    fn replace(&self, _line: &[u8], value: f64) -> Option<Numeral> {
        Some(Numeral::Float(value * self.factor))
    }
}

fn contains_any(line: &[u8], markers: &[&[u8]]) -> bool {
    markers
        .iter()
        .any(|marker| line.windows(marker.len()).any(|window| window == *marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_position_markers() {
        let rule = CoordinateOffset;
        assert_eq!(
            rule.replace(b"position x: 12", 12.0),
            Some(Numeral::Float(12.0 + POSITION_NUDGE))
        );
        assert_eq!(
            rule.replace(b"    y: 3,", 3.0),
            Some(Numeral::Float(3.0 + POSITION_NUDGE))
        );
    }

    #[test]
    fn test_offset_size_markers() {
        let rule = CoordinateOffset;
        assert_eq!(
            rule.replace(b"size width: 50", 50.0),
            Some(Numeral::Float(50.0 - SIZE_SHRINK))
        );
        assert_eq!(
            rule.replace(b"  height: 16", 16.0),
            Some(Numeral::Float(16.0 - SIZE_SHRINK))
        );
    }

    #[test]
    fn test_offset_position_wins_over_size() {
        let rule = CoordinateOffset;
        assert_eq!(
            rule.replace(b"rect x: 4 width: 8", 4.0),
            Some(Numeral::Float(4.0 + POSITION_NUDGE))
        );
    }

    #[test]
    fn test_offset_markers_need_leading_space() {
        let rule = CoordinateOffset;
        assert_eq!(rule.replace(b"x: 5", 5.0), Some(Numeral::Integer(5.0)));
        assert_eq!(
            rule.replace(b"texture_width: 256", 256.0),
            Some(Numeral::Integer(256.0))
        );
    }

    #[test]
    fn test_offset_other_fields_truncate() {
        let rule = CoordinateOffset;
        assert_eq!(rule.replace(b"depth: 7", 7.0), Some(Numeral::Integer(7.0)));
        assert_eq!(rule.replace(b"depth: 1000", 1e39), Some(Numeral::Integer(1e39)));
        assert_eq!(rule.replace(b"depth: 1000", f64::INFINITY), None);
    }

    #[test]
    fn test_offset_skips_decimal_lines() {
        let rule = CoordinateOffset;
        assert!(rule.skips(b"position x: 3.500"));
        assert!(rule.skips(b"// see notes."));
        assert!(!rule.skips(b"position x: 12"));
    }

    #[test]
    fn test_offset_pattern_is_leftmost_digit_run() {
        let found = CoordinateOffset.pattern().find(b"frame 12 of 30").unwrap();
        assert_eq!(found.as_bytes(), b"12");
        assert_eq!(found.range(), 6..8);
    }

    #[test]
    fn test_scale_default_factor() {
        let rule = ScaleByConstant::default();
        assert_eq!(rule.factor(), DEFAULT_SCALE_FACTOR);
        assert_eq!(rule.replace(b"scale: 2.5", 2.5), Some(Numeral::Float(10.0)));
        assert!(!rule.skips(b"scale: 2.5"));
    }

    #[test]
    fn test_scale_custom_factor() {
        let rule = ScaleByConstant::new(0.5);
        assert_eq!(rule.replace(b"scale: 3.0", 3.0), Some(Numeral::Float(1.5)));
    }

    #[test]
    fn test_scale_pattern_needs_fraction() {
        let rule = ScaleByConstant::default();
        let pattern = rule.pattern();
        assert!(pattern.find(b"scale: 7").is_none());
        assert!(pattern.find(b"scale: 7.").is_none());
        assert_eq!(pattern.find(b"a 3 b 1.25 c 2.5").unwrap().as_bytes(), b"1.25");
    }

    #[test]
    fn test_patterns_ignore_non_ascii_digits() {
        // Arabic-Indic three
        assert!(CoordinateOffset.pattern().find("x: \u{0663}".as_bytes()).is_none());
    }
}

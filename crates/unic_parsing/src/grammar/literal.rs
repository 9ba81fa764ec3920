//! Literal values

use std::str::FromStr;
use unic_units::{FalsyValue, Unit};

/// Recognizes `true`, `false` and the falsy keywords
pub fn keyword_literal(text: &str) -> Option<Unit> {
    match text {
        "true" => Some(Unit::Boolean(true)),
        "false" => Some(Unit::Boolean(false)),
        other => FalsyValue::from_str(other).ok().map(Unit::Falsy),
    }
}

/// Parses a number made of digits and at most one decimal point. Signs, exponents and digit
/// grouping are not numbers.
///
/// A value without a fractional part that fits an `i64` is an integer, anything else a float.
pub fn number(text: &str) -> Option<Unit> {
    let mut digits = 0;
    let mut points = 0;
    for c in text.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return None,
        }
    }
    if digits == 0 || points > 1 {
        return None;
    }

    if points == 0 {
        if let Ok(integer) = text.parse::<i64>() {
            return Some(Unit::Integer(integer));
        }
    }
    let value = text.parse::<f64>().ok()?;
    // 2^63, the first value past i64::MAX
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if value.fract() == 0.0 && value < I64_BOUND {
        Some(Unit::Integer(value as i64))
    } else {
        Some(Unit::Float(value))
    }
}

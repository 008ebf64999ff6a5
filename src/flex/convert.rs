//! Scalar conversions between API values and attribute strings
//!
//! Several APIs model numbers and flags as strings (and vice versa). These
//! helpers treat a missing value as the type's zero value.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::num::{IntErrorKind, ParseIntError};

pub fn bool_to_string(v: Option<bool>) -> String {
    v.unwrap_or_default().to_string()
}

/// Only `"true"` converts to true; anything else, including `None`, is false
pub fn string_to_bool(v: Option<&str>) -> bool {
    v == Some("true")
}

/// Shortest decimal form that round-trips, never in exponent notation
pub fn float64_to_string(v: Option<f64>) -> String {
    v.unwrap_or_default().to_string()
}

pub fn int64_to_string(v: Option<i64>) -> String {
    v.unwrap_or_default().to_string()
}

/// Parse a decimal integer
///
/// Out-of-range input saturates at `i64::MAX`/`i64::MIN`; anything else
/// invalid converts to 0.
pub fn string_to_int(v: Option<&str>) -> i64 {
    v.and_then(|s| saturate(s.parse())).unwrap_or_default()
}

/// Parse an integer, inferring the base from its prefix
///
/// `0x` is hexadecimal, `0o` or a bare leading `0` octal, `0b` binary.
/// Underscores may separate digits (`1_000`) or follow a prefix (`0x_1F`).
/// Out-of-range input saturates like [`string_to_int`]; anything else
/// invalid converts to 0.
pub fn string_to_int64(v: &str) -> i64 {
    parse_prefixed(v).unwrap_or_default()
}

/// Base64-encode a string unless it already is valid base64
pub fn string_to_base64(v: &str) -> String {
    if BASE64.decode(v).is_ok() {
        return v.to_string();
    }
    BASE64.encode(v.as_bytes())
}

fn parse_prefixed(v: &str) -> Option<i64> {
    let (negative, unsigned) = match v.as_bytes().first() {
        Some(b'-') => (true, &v[1..]),
        Some(b'+') => (false, &v[1..]),
        _ => (false, v),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits, prefixed) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest, true)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest, true)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest, true)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..], true)
    } else {
        (10, lower.as_str(), false)
    };

    let digits = strip_underscores(digits, prefixed)?;

    // from_str_radix would accept a second sign here
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits
    };
    saturate(i64::from_str_radix(&signed, radix))
}

/// Remove digit separators, rejecting misplaced ones
///
/// An underscore must sit between two digits, or directly after a base prefix.
fn strip_underscores(digits: &str, prefixed: bool) -> Option<String> {
    let bytes = digits.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'_' {
            continue;
        }
        let after_digit = if i == 0 { prefixed } else { bytes[i - 1] != b'_' };
        let before_digit = bytes.get(i + 1).is_some_and(|next| *next != b'_');
        if !after_digit || !before_digit {
            return None;
        }
    }
    Some(digits.replace('_', ""))
}

/// Clamp overflow to the nearest bound; other parse errors give `None`
fn saturate(parsed: Result<i64, ParseIntError>) -> Option<i64> {
    match parsed {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

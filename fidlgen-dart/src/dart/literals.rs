//! Literal formatting.
//!
//! Numeric text is reformatted without ever going through a floating-point or
//! fixed-width value, so arbitrary-precision input survives unchanged in value.

use crate::error::{CompileError, Result};
use fidlgen_ir::{Literal, LiteralKind};

/// Formats a literal in Dart syntax.
///
/// # Errors
/// Returns `CompileError::MalformedLiteral` for numeric text that is neither an
/// integer nor a floating-point number.
pub fn format_literal(literal: &Literal) -> Result<String> {
    match literal.kind {
        // The IR keeps the quotes; a raw string keeps `$` and `\` literal.
        LiteralKind::String => Ok(format!("r{}", literal.value)),
        LiteralKind::Numeric => format_numeric(&literal.value),
        LiteralKind::True => Ok("true".to_string()),
        LiteralKind::False => Ok("false".to_string()),
        LiteralKind::Default => Ok("default".to_string()),
    }
}

/// Formats numeric literal text.
///
/// Hex text passes through verbatim, negative integers stay decimal, non-negative
/// decimal integers become lowercase hex and floating-point text is unchanged.
///
/// # Errors
/// Returns `CompileError::MalformedLiteral` if `raw` matches no numeric grammar.
pub fn format_numeric(raw: &str) -> Result<String> {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);

    if let Some(digits) = strip_radix_prefix(unsigned, 'x') {
        return if is_digits(digits, 16) {
            Ok(raw.to_string())
        } else {
            Err(CompileError::malformed(raw))
        };
    }

    if let Some(digits) = strip_radix_prefix(unsigned, 'b') {
        if !is_digits(digits, 2) {
            return Err(CompileError::malformed(raw));
        }
        let sign = if raw.starts_with('-') { "-" } else { "" };
        return Ok(format!("{sign}0x{}", to_hex(digits, 2)));
    }

    if is_digits(unsigned, 10) {
        if raw.starts_with('-') {
            return Ok(raw.to_string());
        }
        return Ok(format!("0x{}", to_hex(raw, 10)));
    }

    if is_float(unsigned) {
        return Ok(raw.to_string());
    }

    Err(CompileError::malformed(raw))
}

/// Converts validated digits in `radix` to lowercase hex digits by repeated long
/// division.
fn to_hex(text: &str, radix: u32) -> String {
    let mut digits: Vec<u32> = text.chars().filter_map(|c| c.to_digit(radix)).collect();
    let mut hex = Vec::new();

    while digits.iter().any(|&d| d != 0) {
        let mut remainder = 0;
        for digit in &mut digits {
            let current = remainder * radix + *digit;
            *digit = current / 16;
            remainder = current % 16;
        }
        hex.push(char::from_digit(remainder, 16).unwrap_or('0'));
    }

    if hex.is_empty() {
        return "0".to_string();
    }
    hex.iter().rev().collect()
}

fn strip_radix_prefix(text: &str, radix: char) -> Option<&str> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some('0'), Some(c)) if c.eq_ignore_ascii_case(&radix) => Some(&text[2..]),
        _ => None,
    }
}

fn is_digits(text: &str, radix: u32) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_digit(radix))
}

/// `digits [. digits] [(e|E) [+|-] digits]`, with at least one of the fraction or
/// exponent present.
fn is_float(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(pos) => (&text[..pos], Some(&text[pos + 1..])),
        None => (text, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => is_digits(whole, 10) && is_digits(fraction, 10),
        None => is_digits(mantissa, 10) && exponent.is_some(),
    };

    let exponent_ok = exponent.is_none_or(|exp| {
        let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        is_digits(exp, 10)
    });

    mantissa_ok && exponent_ok
}

//! Numeric literal conversion shared by all dialects.
//!
//! The dialect rule tables only route numeric-shaped text here, so these functions
//! mostly deal with suffixes and width selection. Anything that still fails to
//! convert becomes [`ParseError::InvalidNumber`].

use crate::error::{ParseError, Result};
use crate::value::{Integer, Value};
use bigdecimal::{num_bigint::BigInt, BigDecimal};
use std::str::FromStr;

/// Literals longer than this are rejected instead of handed to the big-number parsers.
pub const MAX_NUMERIC_LEN: usize = 4096;

/// Convert a decimal-point literal such as `1.5`, `2.0f`, `1.0E10` or `19.99m`.
///
/// `f`/`F` selects single precision, `m`/`M` an exact decimal; `d`/`D` or no suffix
/// selects double precision. A value that overflows its float width widens rather
/// than becoming infinite.
pub fn parse_decimal(literal: &str) -> Result<Value> {
    check_len(literal)?;
    let (body, suffix) = split_suffix(literal, &['f', 'F', 'd', 'D', 'm', 'M']);

    match suffix {
        Some('f' | 'F') => {
            let f: f32 = body.parse().map_err(|e| invalid(literal, e))?;
            if f.is_finite() {
                Ok(Value::Float(f))
            } else {
                parse_double(literal, body)
            }
        }
        Some('m' | 'M') => parse_exact(literal, body),
        _ => parse_double(literal, body),
    }
}

fn parse_double(literal: &str, body: &str) -> Result<Value> {
    let f: f64 = body.parse().map_err(|e| invalid(literal, e))?;
    if f.is_finite() {
        Ok(Value::Double(f))
    } else {
        parse_exact(literal, body)
    }
}

fn parse_exact(literal: &str, body: &str) -> Result<Value> {
    BigDecimal::from_str(body)
        .map(Value::Decimal)
        .map_err(|e| invalid(literal, e))
}

/// Convert an integer literal, stripping `l`/`L`, `u`/`U` and `ul`/`lu` suffixes.
///
/// The result is the narrowest of 32-bit, 64-bit and arbitrary precision that holds
/// the value. Unsigned literals must be non-negative and fit in 64 bits.
pub fn parse_integer(literal: &str) -> Result<Value> {
    check_len(literal)?;
    let mut body = literal;
    let mut unsigned = false;
    for _ in 0..2 {
        match body.chars().last() {
            Some('u' | 'U') if !unsigned => {
                unsigned = true;
                body = &body[..body.len() - 1];
            }
            Some('l' | 'L') => body = &body[..body.len() - 1],
            _ => break,
        }
    }

    let n = BigInt::from_str(body).map_err(|e| invalid(literal, e))?;
    if unsigned {
        let v = u64::try_from(&n).map_err(|_| ParseError::InvalidNumber {
            literal: literal.to_string(),
            reason: "unsigned literal out of range".to_string(),
        })?;
        return Ok(Value::Integer(Integer::from_u64(v)));
    }
    Ok(Value::Integer(Integer::from_big(n)))
}

/// Convert a prefixed literal such as `0xFF` or `0b1010` in the given radix.
pub fn parse_radix(literal: &str, radix: u32) -> Result<Value> {
    check_len(literal)?;
    let digits = literal.get(2..).unwrap_or_default();
    BigInt::parse_bytes(digits.as_bytes(), radix)
        .map(|n| Value::Integer(Integer::from_big(n)))
        .ok_or_else(|| ParseError::InvalidNumber {
            literal: literal.to_string(),
            reason: format!("not a base-{radix} number"),
        })
}

fn split_suffix<'a>(literal: &'a str, suffixes: &[char]) -> (&'a str, Option<char>) {
    match literal.chars().last() {
        Some(c) if suffixes.contains(&c) => (&literal[..literal.len() - 1], Some(c)),
        _ => (literal, None),
    }
}

fn check_len(literal: &str) -> Result<()> {
    if literal.len() > MAX_NUMERIC_LEN {
        return Err(ParseError::InvalidNumber {
            literal: format!("{}...", literal.chars().take(32).collect::<String>()),
            reason: format!("longer than {MAX_NUMERIC_LEN} characters"),
        });
    }
    Ok(())
}

fn invalid(literal: &str, err: impl std::fmt::Display) -> ParseError {
    ParseError::InvalidNumber {
        literal: literal.to_string(),
        reason: err.to_string(),
    }
}

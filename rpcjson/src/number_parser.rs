// SPDX-License-Identifier: Apache-2.0

//! Classification and parsing of JSON number literals.
//!
//! The tokenizer has already validated the grammar of the literal, so these
//! functions only decide between integer and float and convert the digits.

use core::str::FromStr;

use crate::scalar::Number;

/// Why a validated literal could not be turned into a [`Number`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum NumberError {
    /// The input byte slice was empty or consisted only of a sign.
    Empty,
    /// A byte that is not part of a number literal.
    InvalidDigit,
    /// Integer literal outside the `i128` range, or a float that is not finite.
    Overflow,
}

/// Parses a base-10 integer into an `i128` without panicking.
///
/// Builds negative numbers by subtraction so `i128::MIN` is reachable.
pub const fn from_ascii_i128(src: &[u8]) -> Result<i128, NumberError> {
    let (is_negative, mut digits) = match src {
        [] => return Err(NumberError::Empty),
        [b'-', rest @ ..] => (true, rest),
        _ => (false, src),
    };

    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    let mut result: i128 = 0;
    while let Some((&byte, rest)) = digits.split_first() {
        let digit = match byte {
            b'0'..=b'9' => (byte - b'0') as i128,
            _ => return Err(NumberError::InvalidDigit),
        };

        result = match result.checked_mul(10) {
            Some(val) => val,
            None => return Err(NumberError::Overflow),
        };

        result = if is_negative {
            match result.checked_sub(digit) {
                Some(val) => val,
                None => return Err(NumberError::Overflow),
            }
        } else {
            match result.checked_add(digit) {
                Some(val) => val,
                None => return Err(NumberError::Overflow),
            }
        };

        digits = rest;
    }

    Ok(result)
}

/// True if the literal has neither a decimal point nor an exponent.
pub fn is_integer(bytes: &[u8]) -> bool {
    !bytes.iter().any(|&b| b == b'.' || b == b'e' || b == b'E')
}

/// Turns a validated literal into a [`Number`], keeping its subtype.
pub fn parse_number(bytes: &[u8]) -> Result<Number, NumberError> {
    if is_integer(bytes) {
        return from_ascii_i128(bytes).map(Number::Integer);
    }
    // Number literals are pure ASCII
    let text = core::str::from_utf8(bytes).map_err(|_| NumberError::InvalidDigit)?;
    match f64::from_str(text) {
        Ok(val) if val.is_finite() => Ok(Number::Float(val)),
        Ok(_) => Err(NumberError::Overflow),
        Err(_) => Err(NumberError::InvalidDigit),
    }
}

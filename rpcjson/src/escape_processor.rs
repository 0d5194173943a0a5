// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use crate::tokenizer::ErrKind;

/// Pure helpers for JSON string escapes.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// Maps the character after a backslash to the byte it stands for.
    pub fn process_simple_escape(escape_char: u8) -> Result<u8, ErrKind> {
        match escape_char {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'r' => Ok(b'\r'),
            b'\\' => Ok(b'\\'),
            b'"' => Ok(b'"'),
            b'/' => Ok(b'/'),
            b'b' => Ok(0x08),
            b'f' => Ok(0x0C),
            _ => Err(ErrKind::InvalidStringEscape),
        }
    }

    /// Numeric value (0-15) of a hex digit.
    pub fn validate_hex_digit(byte: u8) -> Result<u32, ErrKind> {
        match byte {
            b'0'..=b'9' => Ok((byte - b'0') as u32),
            b'a'..=b'f' => Ok((byte - b'a') as u32 + 10),
            b'A'..=b'F' => Ok((byte - b'A') as u32 + 10),
            _ => Err(ErrKind::InvalidUnicodeEscape),
        }
    }

    pub fn is_high_surrogate(codepoint: u32) -> bool {
        (0xD800..=0xDBFF).contains(&codepoint)
    }

    pub fn is_low_surrogate(codepoint: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&codepoint)
    }

    /// Combines a UTF-16 surrogate pair into one codepoint.
    pub fn combine_surrogate_pair(high: u32, low: u32) -> Result<u32, ErrKind> {
        if !Self::is_high_surrogate(high) || !Self::is_low_surrogate(low) {
            return Err(ErrKind::InvalidUnicodeCodepoint);
        }
        Ok(0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF))
    }
}

/// Collects the four hex digits of a `\uXXXX` escape and appends the decoded
/// character to an output buffer.
///
/// A high surrogate is held back until the following escape supplies the low
/// half, so the collector state must outlive a single escape sequence.
#[derive(Debug, Default)]
pub struct UnicodeEscapeCollector {
    codepoint: u32,
    hex_pos: usize,
    pending_high_surrogate: Option<u32>,
}

impl UnicodeEscapeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new `\uXXXX` sequence, keeping any pending high surrogate.
    pub fn reset(&mut self) {
        self.codepoint = 0;
        self.hex_pos = 0;
    }

    /// Clears everything, including a pending high surrogate.
    pub fn reset_all(&mut self) {
        self.reset();
        self.pending_high_surrogate = None;
    }

    /// Adds one hex digit. Returns true once all four digits were seen.
    pub fn add_hex_digit(&mut self, digit: u8) -> Result<bool, ErrKind> {
        let value = EscapeProcessor::validate_hex_digit(digit)?;
        if self.hex_pos >= 4 {
            return Err(ErrKind::InvalidUnicodeEscape);
        }
        self.codepoint = (self.codepoint << 4) | value;
        self.hex_pos += 1;
        Ok(self.hex_pos == 4)
    }

    /// Decodes the completed escape into `out`.
    ///
    /// A high surrogate produces no output and is remembered; the next call
    /// must then complete the pair.
    pub fn process_to_utf8(&mut self, out: &mut Vec<u8>) -> Result<(), ErrKind> {
        if self.hex_pos != 4 {
            return Err(ErrKind::InvalidUnicodeEscape);
        }
        let codepoint = self.codepoint;
        self.reset();

        let scalar = match self.pending_high_surrogate.take() {
            Some(high) => EscapeProcessor::combine_surrogate_pair(high, codepoint)?,
            None if EscapeProcessor::is_high_surrogate(codepoint) => {
                self.pending_high_surrogate = Some(codepoint);
                return Ok(());
            }
            None if EscapeProcessor::is_low_surrogate(codepoint) => {
                return Err(ErrKind::InvalidUnicodeCodepoint);
            }
            None => codepoint,
        };

        let ch = char::from_u32(scalar).ok_or(ErrKind::InvalidUnicodeCodepoint)?;
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    /// True while a high surrogate waits for its low half.
    pub fn has_pending_high_surrogate(&self) -> bool {
        self.pending_high_surrogate.is_some()
    }
}

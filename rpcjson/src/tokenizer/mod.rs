// SPDX-License-Identifier: Apache-2.0

//! A SAX-style JSON tokenizer.
//!
//! The tokenizer walks a complete JSON text one byte at a time and reports
//! each syntactic event to an [`EventHandler`] as soon as it is recognized.
//! Strings without escapes are handed out borrowed from the input; strings
//! with escapes are unescaped into an owned buffer (copy-on-escape).

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::escape_processor::{EscapeProcessor, UnicodeEscapeCollector};
use crate::number_parser::{self, NumberError};
use crate::scalar::Number;

mod nesting;
use nesting::ParseContext;

/// Events produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    /// The start of an object (`{`).
    StartObject,
    /// The end of an object (`}`).
    EndObject,
    /// The start of an array (`[`).
    StartArray,
    /// The end of an array (`]`).
    EndArray,
    /// An object key (`"key":`).
    Key(Cow<'a, str>),
    /// A string value.
    String(Cow<'a, str>),
    /// A number value, integer or float as written.
    Number(Number),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// End of the document.
    EndDocument,
}

/// Receives tokenizer events, one call per event.
pub trait EventHandler<E> {
    /// Handles a single, complete JSON event.
    fn handle_event(&mut self, event: Event<'_>) -> Result<(), E>;
}

/// What went wrong in a malformed JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    EmptyStream,
    UnfinishedStream,
    InvalidRoot,
    InvalidToken,
    UnescapedControlCharacter,
    TrailingComma,
    ContentEnded,
    UnopenedArray,
    UnopenedObject,
    InvalidNumber,
    NumberOutOfRange,
    InvalidUnicodeEscape,
    InvalidUnicodeCodepoint,
    InvalidStringEscape,
    ExpectedObjectKey,
    ExpectedObjectValue,
    ExpectedColon,
    ExpectedArrayItem,
    InvalidUtf8,
}

/// A malformed token stream, with the offending byte and its offset.
#[derive(Clone, PartialEq, Eq)]
pub struct SyntaxError {
    kind: ErrKind,
    character: u8,
    position: usize,
}

impl SyntaxError {
    pub fn new(kind: ErrKind, character: u8, position: usize) -> Self {
        Self {
            kind,
            character,
            position,
        }
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    pub fn character(&self) -> u8 {
        self.character
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind, self.character as char, self.position
        )
    }
}

impl fmt::Debug for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl core::error::Error for SyntaxError {}

fn error<T, E: From<SyntaxError>>(kind: ErrKind, character: u8, position: usize) -> Result<T, E> {
    Err(SyntaxError::new(kind, character, position).into())
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Escape {
    None,
    Escaping,
    Unicode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Sign,
    LeadingZero,
    BeforeDecimalPoint,
    Decimal,
    AfterDecimalPoint,
    Exponent,
    ExponentSign,
    AfterExponent,
}

impl Num {
    /// States in which the literal seen so far is a complete number.
    fn is_terminal(self) -> bool {
        matches!(
            self,
            Num::LeadingZero | Num::BeforeDecimalPoint | Num::AfterDecimalPoint | Num::AfterExponent
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenType {
    True,
    False,
    Null,
}

impl TokenType {
    const fn as_bytes(&self) -> &'static [u8] {
        match self {
            TokenType::True => b"true",
            TokenType::False => b"false",
            TokenType::Null => b"null",
        }
    }

    fn event(&self) -> Event<'static> {
        match self {
            TokenType::True => Event::Bool(true),
            TokenType::False => Event::Bool(false),
            TokenType::Null => Event::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Object {
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Array {
    ItemOrEnd,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    String {
        start: usize,
        key: bool,
        escape: Escape,
    },
    Number {
        start: usize,
        state: Num,
    },
    Token {
        token: TokenType,
        position: usize,
    },
    Object {
        expect: Object,
    },
    Array {
        expect: Array,
    },
    Finished,
}

/// Byte-driven tokenizer for one complete JSON text.
pub struct Tokenizer {
    state: State,
    context: ParseContext,
    /// Unescaped content of the current string, once an escape was seen.
    scratch: Vec<u8>,
    escaped: bool,
    unicode: UnicodeEscapeCollector,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            context: ParseContext::new(),
            scratch: Vec::new(),
            escaped: false,
            unicode: UnicodeEscapeCollector::new(),
        }
    }

    /// Current container nesting depth.
    pub fn depth(&self) -> usize {
        self.context.depth()
    }

    /// Tokenizes `input`, which must hold exactly one JSON value, reporting
    /// every event to `handler`. Ends with [`Event::EndDocument`].
    ///
    /// Stops at the first syntax or handler error.
    pub fn parse<H, E>(&mut self, input: &[u8], handler: &mut H) -> Result<(), E>
    where
        H: EventHandler<E>,
        E: From<SyntaxError>,
    {
        let mut pos = 0;
        while let Some(&byte) = input.get(pos) {
            if let State::Array {
                expect: Array::ItemOrEnd,
            } = self.state
            {
                self.check_trailing_comma(byte, pos)?;
            }
            if self.step(input, pos, byte, handler)? {
                pos += 1;
            }
        }
        self.finish(input, handler)
    }

    fn finish<H, E>(&mut self, input: &[u8], handler: &mut H) -> Result<(), E>
    where
        H: EventHandler<E>,
        E: From<SyntaxError>,
    {
        let end = input.len();
        if !self.context.is_zero() {
            return error(ErrKind::UnfinishedStream, b' ', end);
        }
        match self.state {
            State::Finished => {}
            State::Number { start, state } if state.is_terminal() => {
                self.emit_number(input, start, end, handler)?;
            }
            State::Number { .. } => return error(ErrKind::InvalidNumber, b' ', end),
            State::Idle if input.iter().all(u8::is_ascii_whitespace) => {
                return error(ErrKind::EmptyStream, b' ', end);
            }
            _ => return error(ErrKind::UnfinishedStream, b' ', end),
        }
        self.state = State::Finished;
        handler.handle_event(Event::EndDocument)
    }

    fn check_trailing_comma(&mut self, byte: u8, pos: usize) -> Result<(), SyntaxError> {
        if let Some((c, _)) = self.context.after_comma {
            if byte == b']' || byte == b'}' {
                return Err(SyntaxError::new(ErrKind::TrailingComma, c, pos));
            }
        }
        if !byte.is_ascii_whitespace() {
            self.context.after_comma = None;
        }
        Ok(())
    }

    fn maybe_exit_level(&self) -> State {
        if self.context.is_object() {
            State::Object {
                expect: Object::CommaOrEnd,
            }
        } else if self.context.is_array() {
            State::Array {
                expect: Array::CommaOrEnd,
            }
        } else {
            State::Finished
        }
    }

    fn emit_number<H, E>(
        &mut self,
        input: &[u8],
        start: usize,
        end: usize,
        handler: &mut H,
    ) -> Result<(), E>
    where
        H: EventHandler<E>,
        E: From<SyntaxError>,
    {
        let literal = input.get(start..end).unwrap_or_default();
        let number = match number_parser::parse_number(literal) {
            Ok(number) => number,
            Err(NumberError::Overflow) => {
                return error(ErrKind::NumberOutOfRange, input[start], start)
            }
            Err(_) => return error(ErrKind::InvalidNumber, input[start], start),
        };
        handler.handle_event(Event::Number(number))
    }

    fn emit_string<H, E>(
        &mut self,
        input: &[u8],
        start: usize,
        pos: usize,
        key: bool,
        handler: &mut H,
    ) -> Result<(), E>
    where
        H: EventHandler<E>,
        E: From<SyntaxError>,
    {
        if self.unicode.has_pending_high_surrogate() {
            return error(ErrKind::InvalidUnicodeCodepoint, b'"', pos);
        }
        let text = if self.escaped {
            let bytes = core::mem::take(&mut self.scratch);
            match String::from_utf8(bytes) {
                Ok(s) => Cow::Owned(s),
                Err(_) => return error(ErrKind::InvalidUtf8, b'"', pos),
            }
        } else {
            let bytes = input.get(start..pos).unwrap_or_default();
            match core::str::from_utf8(bytes) {
                Ok(s) => Cow::Borrowed(s),
                Err(_) => return error(ErrKind::InvalidUtf8, b'"', pos),
            }
        };
        self.escaped = false;
        handler.handle_event(if key {
            Event::Key(text)
        } else {
            Event::String(text)
        })
    }

    /// Starts whatever value `byte` opens. Used in every state that expects a value.
    fn begin_value<H, E>(&mut self, byte: u8, pos: usize, handler: &mut H) -> Result<State, E>
    where
        H: EventHandler<E>,
        E: From<SyntaxError>,
    {
        let state = match byte {
            b'{' => {
                self.context.enter_object();
                handler.handle_event(Event::StartObject)?;
                State::Object {
                    expect: Object::Key,
                }
            }
            b'[' => {
                self.context.enter_array();
                handler.handle_event(Event::StartArray)?;
                State::Array {
                    expect: Array::ItemOrEnd,
                }
            }
            b'"' => self.begin_string(pos, false),
            b't' | b'f' | b'n' => {
                let token = match byte {
                    b't' => TokenType::True,
                    b'f' => TokenType::False,
                    _ => TokenType::Null,
                };
                State::Token { token, position: 1 }
            }
            b'-' => State::Number {
                start: pos,
                state: Num::Sign,
            },
            b'0' => State::Number {
                start: pos,
                state: Num::LeadingZero,
            },
            b'1'..=b'9' => State::Number {
                start: pos,
                state: Num::BeforeDecimalPoint,
            },
            _ => {
                let kind = match self.state {
                    State::Idle => ErrKind::InvalidRoot,
                    State::Object { .. } => ErrKind::ExpectedObjectValue,
                    State::Array { .. } => ErrKind::ExpectedArrayItem,
                    _ => ErrKind::InvalidToken,
                };
                return error(kind, byte, pos);
            }
        };
        Ok(state)
    }

    fn begin_string(&mut self, pos: usize, key: bool) -> State {
        self.escaped = false;
        self.scratch.clear();
        self.unicode.reset_all();
        State::String {
            start: pos + 1,
            key,
            escape: Escape::None,
        }
    }

    /// Advances the state machine by one byte. Returns false when the byte
    /// must be examined again in the new state (it terminated a number).
    fn step<H, E>(&mut self, input: &[u8], pos: usize, byte: u8, handler: &mut H) -> Result<bool, E>
    where
        H: EventHandler<E>,
        E: From<SyntaxError>,
    {
        self.state = match (self.state, byte) {
            (State::Number { start, state }, _) => {
                let next = match (state, byte) {
                    (Num::Sign, b'0') => Num::LeadingZero,
                    (Num::Sign, b'1'..=b'9') => Num::BeforeDecimalPoint,
                    (Num::LeadingZero | Num::BeforeDecimalPoint, b'.') => Num::Decimal,
                    (Num::BeforeDecimalPoint, b'0'..=b'9') => Num::BeforeDecimalPoint,
                    (
                        Num::LeadingZero | Num::BeforeDecimalPoint | Num::AfterDecimalPoint,
                        b'e' | b'E',
                    ) => Num::Exponent,
                    (Num::Decimal | Num::AfterDecimalPoint, b'0'..=b'9') => Num::AfterDecimalPoint,
                    (Num::Exponent, b'+' | b'-') => Num::ExponentSign,
                    (Num::Exponent | Num::ExponentSign | Num::AfterExponent, b'0'..=b'9') => {
                        Num::AfterExponent
                    }
                    (state, b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}')
                        if state.is_terminal() =>
                    {
                        self.emit_number(input, start, pos, handler)?;
                        self.state = self.maybe_exit_level();
                        return Ok(false);
                    }
                    _ => return error(ErrKind::InvalidNumber, byte, pos),
                };
                State::Number { start, state: next }
            }

            (
                State::String {
                    start,
                    key,
                    escape: Escape::None,
                },
                _,
            ) => match byte {
                b'"' => {
                    self.emit_string(input, start, pos, key, handler)?;
                    if key {
                        State::Object {
                            expect: Object::Colon,
                        }
                    } else {
                        self.maybe_exit_level()
                    }
                }
                b'\\' => {
                    if !self.escaped {
                        self.scratch
                            .extend_from_slice(input.get(start..pos).unwrap_or_default());
                        self.escaped = true;
                    }
                    State::String {
                        start,
                        key,
                        escape: Escape::Escaping,
                    }
                }
                b'\x00'..=b'\x1F' => {
                    return error(ErrKind::UnescapedControlCharacter, byte, pos);
                }
                _ => {
                    if self.unicode.has_pending_high_surrogate() {
                        return error(ErrKind::InvalidUnicodeCodepoint, byte, pos);
                    }
                    if self.escaped {
                        self.scratch.push(byte);
                    }
                    self.state
                }
            },
            (
                State::String {
                    start,
                    key,
                    escape: Escape::Escaping,
                },
                _,
            ) => {
                if byte == b'u' {
                    self.unicode.reset();
                    State::String {
                        start,
                        key,
                        escape: Escape::Unicode,
                    }
                } else {
                    if self.unicode.has_pending_high_surrogate() {
                        return error(ErrKind::InvalidUnicodeCodepoint, byte, pos);
                    }
                    match EscapeProcessor::process_simple_escape(byte) {
                        Ok(unescaped) => self.scratch.push(unescaped),
                        Err(kind) => return error(kind, byte, pos),
                    }
                    State::String {
                        start,
                        key,
                        escape: Escape::None,
                    }
                }
            }
            (
                State::String {
                    start,
                    key,
                    escape: Escape::Unicode,
                },
                _,
            ) => {
                let complete = match self.unicode.add_hex_digit(byte) {
                    Ok(complete) => complete,
                    Err(kind) => return error(kind, byte, pos),
                };
                if complete {
                    if let Err(kind) = self.unicode.process_to_utf8(&mut self.scratch) {
                        return error(kind, byte, pos);
                    }
                    State::String {
                        start,
                        key,
                        escape: Escape::None,
                    }
                } else {
                    self.state
                }
            }

            (State::Token { token, position }, _) => {
                let expected = token.as_bytes();
                if expected.get(position) != Some(&byte) {
                    return error(ErrKind::InvalidToken, byte, pos);
                }
                if position + 1 == expected.len() {
                    handler.handle_event(token.event())?;
                    self.maybe_exit_level()
                } else {
                    State::Token {
                        token,
                        position: position + 1,
                    }
                }
            }

            (
                State::Idle | State::Object { .. } | State::Array { .. } | State::Finished,
                b' ' | b'\t' | b'\n' | b'\r',
            ) => self.state,

            (
                State::Idle
                | State::Object {
                    expect: Object::Value,
                },
                _,
            ) => self.begin_value(byte, pos, handler)?,

            (
                State::Array {
                    expect: Array::ItemOrEnd,
                },
                b']',
            )
            | (
                State::Array {
                    expect: Array::CommaOrEnd,
                },
                b']',
            ) => {
                self.context.exit_array(pos)?;
                handler.handle_event(Event::EndArray)?;
                self.maybe_exit_level()
            }
            (
                State::Array {
                    expect: Array::ItemOrEnd,
                },
                _,
            ) => self.begin_value(byte, pos, handler)?,
            (
                State::Array {
                    expect: Array::CommaOrEnd,
                },
                b',',
            ) => {
                self.context.after_comma = Some((byte, pos));
                State::Array {
                    expect: Array::ItemOrEnd,
                }
            }
            (
                State::Array {
                    expect: Array::CommaOrEnd,
                },
                b'}',
            ) => return error(ErrKind::UnopenedObject, byte, pos),
            (
                State::Array {
                    expect: Array::CommaOrEnd,
                },
                _,
            ) => return error(ErrKind::ExpectedArrayItem, byte, pos),

            (
                State::Object {
                    expect: Object::Key,
                },
                b'"',
            ) => {
                self.context.after_comma = None;
                self.begin_string(pos, true)
            }
            (
                State::Object {
                    expect: Object::Key,
                },
                b'}',
            ) => {
                if let Some((comma, _)) = self.context.after_comma {
                    return error(ErrKind::TrailingComma, comma, pos);
                }
                self.context.exit_object(pos)?;
                handler.handle_event(Event::EndObject)?;
                self.maybe_exit_level()
            }
            (
                State::Object {
                    expect: Object::Key,
                },
                _,
            ) => return error(ErrKind::ExpectedObjectKey, byte, pos),
            (
                State::Object {
                    expect: Object::Colon,
                },
                b':',
            ) => State::Object {
                expect: Object::Value,
            },
            (
                State::Object {
                    expect: Object::Colon,
                },
                _,
            ) => return error(ErrKind::ExpectedColon, byte, pos),
            (
                State::Object {
                    expect: Object::CommaOrEnd,
                },
                b',',
            ) => {
                self.context.after_comma = Some((byte, pos));
                State::Object {
                    expect: Object::Key,
                }
            }
            (
                State::Object {
                    expect: Object::CommaOrEnd,
                },
                b'}',
            ) => {
                self.context.exit_object(pos)?;
                handler.handle_event(Event::EndObject)?;
                self.maybe_exit_level()
            }
            (
                State::Object {
                    expect: Object::CommaOrEnd,
                },
                b']',
            ) => return error(ErrKind::UnopenedArray, byte, pos),
            (
                State::Object {
                    expect: Object::CommaOrEnd,
                },
                _,
            ) => return error(ErrKind::ExpectedObjectValue, byte, pos),

            (State::Finished, _) => return error(ErrKind::ContentEnded, byte, pos),
        };
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use log::trace;
    use test_log::test;

    /// Records events with owned strings so they outlive the input.
    #[derive(Default)]
    struct Collector {
        events: Vec<Event<'static>>,
    }

    impl EventHandler<SyntaxError> for Collector {
        fn handle_event(&mut self, event: Event<'_>) -> Result<(), SyntaxError> {
            trace!("Event: {:?}", event);
            let owned = match event {
                Event::Key(k) => Event::Key(Cow::Owned(k.into_owned())),
                Event::String(s) => Event::String(Cow::Owned(s.into_owned())),
                Event::StartObject => Event::StartObject,
                Event::EndObject => Event::EndObject,
                Event::StartArray => Event::StartArray,
                Event::EndArray => Event::EndArray,
                Event::Number(n) => Event::Number(n),
                Event::Bool(b) => Event::Bool(b),
                Event::Null => Event::Null,
                Event::EndDocument => Event::EndDocument,
            };
            self.events.push(owned);
            Ok(())
        }
    }

    fn collect(input: &[u8]) -> Result<Vec<Event<'static>>, SyntaxError> {
        let mut collector = Collector::default();
        Tokenizer::new().parse(input, &mut collector)?;
        Ok(collector.events)
    }

    fn err_kind(input: &[u8]) -> ErrKind {
        collect(input).unwrap_err().kind()
    }

    fn s(text: &str) -> Event<'static> {
        Event::String(Cow::Owned(text.into()))
    }

    fn k(text: &str) -> Event<'static> {
        Event::Key(Cow::Owned(text.into()))
    }

    #[test]
    fn test_root_scalars() {
        assert_eq!(collect(b" true ").unwrap(), vec![Event::Bool(true), Event::EndDocument]);
        assert_eq!(collect(b"false").unwrap(), vec![Event::Bool(false), Event::EndDocument]);
        assert_eq!(collect(b"null").unwrap(), vec![Event::Null, Event::EndDocument]);
        assert_eq!(collect(b"\"a\"").unwrap(), vec![s("a"), Event::EndDocument]);
        assert_eq!(
            collect(b"42").unwrap(),
            vec![Event::Number(Number::Integer(42)), Event::EndDocument]
        );
    }

    #[test]
    fn test_object_events() {
        let events = collect(br#"{"line": 10, "character": 2.5, "ok": [true, null]}"#).unwrap();
        assert_eq!(
            events,
            vec![
                Event::StartObject,
                k("line"),
                Event::Number(Number::Integer(10)),
                k("character"),
                Event::Number(Number::Float(2.5)),
                k("ok"),
                Event::StartArray,
                Event::Bool(true),
                Event::Null,
                Event::EndArray,
                Event::EndObject,
                Event::EndDocument,
            ]
        );
    }

    #[test]
    fn test_numbers_close_containers() {
        let events = collect(b"[1,[2],{\"a\":3}]").unwrap();
        assert_eq!(
            events,
            vec![
                Event::StartArray,
                Event::Number(Number::Integer(1)),
                Event::StartArray,
                Event::Number(Number::Integer(2)),
                Event::EndArray,
                Event::StartObject,
                k("a"),
                Event::Number(Number::Integer(3)),
                Event::EndObject,
                Event::EndArray,
                Event::EndDocument,
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        for (text, expected) in [
            ("0", Number::Integer(0)),
            ("-0", Number::Integer(0)),
            ("-12", Number::Integer(-12)),
            ("0.5", Number::Float(0.5)),
            ("1e3", Number::Float(1000.0)),
            ("1E+2", Number::Float(100.0)),
            ("2.5e-1", Number::Float(0.25)),
        ] {
            assert_eq!(
                collect(text.as_bytes()).unwrap(),
                vec![Event::Number(expected), Event::EndDocument],
                "{text}"
            );
        }
    }

    #[test]
    fn test_broken_numbers() {
        for text in ["-", "01", "1.", "1.e3", "1e", "1e+", "-a", "[1.]", "[-]", "1x"] {
            assert_eq!(err_kind(text.as_bytes()), ErrKind::InvalidNumber, "{text}");
        }
    }

    #[test]
    fn test_number_out_of_range() {
        assert_eq!(
            err_kind(b"[1234567890123456789012345678901234567890]"),
            ErrKind::NumberOutOfRange
        );
    }

    #[test]
    fn test_escapes_are_unescaped() {
        let input = r#"["a\nb", "\"q\"", "\u0041\u00e9", "\ud83d\ude0a", "\/"]"#;
        let events = collect(input.as_bytes()).unwrap();
        assert_eq!(
            events,
            vec![
                Event::StartArray,
                s("a\nb"),
                s("\"q\""),
                s("Aé"),
                s("😊"),
                s("/"),
                Event::EndArray,
                Event::EndDocument,
            ]
        );
    }

    #[test]
    fn test_plain_strings_are_borrowed() {
        struct BorrowCheck;
        impl EventHandler<SyntaxError> for BorrowCheck {
            fn handle_event(&mut self, event: Event<'_>) -> Result<(), SyntaxError> {
                match event {
                    Event::String(Cow::Borrowed("plain")) => Ok(()),
                    Event::String(Cow::Owned(s)) => {
                        assert_eq!(s, "esc\t");
                        Ok(())
                    }
                    Event::StartArray | Event::EndArray | Event::EndDocument => Ok(()),
                    other => panic!("unexpected event {other:?}"),
                }
            }
        }
        Tokenizer::new()
            .parse(br#"["plain", "esc\t"]"#, &mut BorrowCheck)
            .unwrap();
    }

    #[test]
    fn test_utf8_passthrough() {
        assert_eq!(
            collect("\"héllo ✓\"".as_bytes()).unwrap(),
            vec![s("héllo ✓"), Event::EndDocument]
        );
        assert_eq!(err_kind(b"\"\xff\""), ErrKind::InvalidUtf8);
    }

    #[test]
    fn test_bad_escapes() {
        assert_eq!(err_kind(br#""\x""#), ErrKind::InvalidStringEscape);
        assert_eq!(err_kind(br#""\u12G4""#), ErrKind::InvalidUnicodeEscape);
        assert_eq!(err_kind(br#""\ude0a""#), ErrKind::InvalidUnicodeCodepoint);
        assert_eq!(err_kind(br#""\ud83d""#), ErrKind::InvalidUnicodeCodepoint);
        assert_eq!(err_kind(br#""\ud83dx""#), ErrKind::InvalidUnicodeCodepoint);
        assert_eq!(err_kind(br#""\ud83d\n""#), ErrKind::InvalidUnicodeCodepoint);
    }

    #[test]
    fn test_unescaped_control_character() {
        assert_eq!(err_kind(b"\"a\tb\""), ErrKind::UnescapedControlCharacter);
    }

    #[test]
    fn test_structure_errors() {
        assert_eq!(err_kind(b""), ErrKind::EmptyStream);
        assert_eq!(err_kind(b"  "), ErrKind::EmptyStream);
        assert_eq!(err_kind(b"a"), ErrKind::InvalidRoot);
        assert_eq!(err_kind(b"+1"), ErrKind::InvalidRoot);
        assert_eq!(err_kind(b"tru"), ErrKind::UnfinishedStream);
        assert_eq!(err_kind(b"trux"), ErrKind::InvalidToken);
        assert_eq!(err_kind(b"{"), ErrKind::UnfinishedStream);
        assert_eq!(err_kind(b"[1,]"), ErrKind::TrailingComma);
        assert_eq!(err_kind(b"{\"a\":1,}"), ErrKind::TrailingComma);
        assert_eq!(err_kind(b"]"), ErrKind::InvalidRoot);
        assert_eq!(err_kind(b"[1}"), ErrKind::UnopenedObject);
        assert_eq!(err_kind(b"{\"a\":1]"), ErrKind::UnopenedArray);
        assert_eq!(err_kind(b"{a:1}"), ErrKind::ExpectedObjectKey);
        assert_eq!(err_kind(b"{\"a\" 1}"), ErrKind::ExpectedColon);
        assert_eq!(err_kind(b"{\"a\":}"), ErrKind::ExpectedObjectValue);
        assert_eq!(err_kind(b"{\"a\":1 \"b\"}"), ErrKind::ExpectedObjectValue);
        assert_eq!(err_kind(b"[1 2]"), ErrKind::ExpectedArrayItem);
        assert_eq!(err_kind(b"[,1]"), ErrKind::ExpectedArrayItem);
    }

    #[test]
    fn test_no_garbage_after_root() {
        let err = collect(b"true extra").unwrap_err();
        assert_eq!(err, SyntaxError::new(ErrKind::ContentEnded, b'e', 5));
        assert_eq!(err_kind(b"{} {}"), ErrKind::ContentEnded);
    }

    #[test]
    fn test_deep_nesting() {
        let mut text = Vec::new();
        text.extend(core::iter::repeat(b'[').take(500));
        text.extend(core::iter::repeat(b']').take(500));
        let events = collect(&text).unwrap();
        assert_eq!(events.len(), 1001);
    }

    #[test]
    fn test_handler_error_stops_parsing() {
        struct Refuse(usize);
        impl EventHandler<SyntaxError> for Refuse {
            fn handle_event(&mut self, _event: Event<'_>) -> Result<(), SyntaxError> {
                self.0 += 1;
                Err(SyntaxError::new(ErrKind::InvalidToken, b'!', 0))
            }
        }
        let mut handler = Refuse(0);
        assert!(Tokenizer::new().parse(b"[1, 2, 3]", &mut handler).is_err());
        assert_eq!(handler.0, 1);
    }
}

// SPDX-License-Identifier: Apache-2.0

use alloc::borrow::Cow;
use core::fmt;

/// A JSON number, keeping the subtype that was observed on the wire.
///
/// Integer literals (no decimal point or exponent) are `Integer`, everything
/// else is `Float`. No conversion happens between the two here; widening an
/// integer into a float field is a decision taken by that field's setter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integral literal. Wide enough for every `i64` and `u64`; narrowing
    /// happens in the setter.
    Integer(i128),
    /// Literal with a fraction and/or exponent.
    Float(f64),
}

impl Number {
    /// Returns the integer if this number was an integer literal.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Number::Integer(v) => Some(*v),
            Number::Float(_) => None,
        }
    }

    /// Returns the value as `f64`, widening integer literals.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(v) => *v as f64,
            Number::Float(v) => *v,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Number::Integer(_) => ValueKind::Integer,
            Number::Float(_) => ValueKind::Float,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(v) => write!(f, "{v}"),
            // Debug keeps the fractional part, so `10.0` stays a float literal
            Number::Float(v) => write!(f, "{v:?}"),
        }
    }
}

/// Exactly one JSON scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue<'a> {
    String(Cow<'a, str>),
    Number(Number),
    Boolean(bool),
    Null,
}

impl<'a> ScalarValue<'a> {
    /// The frame slot this scalar is dispatched to.
    pub fn event_kind(&self) -> EventKind {
        match self {
            ScalarValue::String(_) => EventKind::String,
            ScalarValue::Number(_) => EventKind::Number,
            ScalarValue::Boolean(_) => EventKind::Boolean,
            ScalarValue::Null => EventKind::Null,
        }
    }

    /// The precise kind, distinguishing integer and float numbers.
    pub fn kind(&self) -> ValueKind {
        match self {
            ScalarValue::String(_) => ValueKind::String,
            ScalarValue::Number(n) => n.kind(),
            ScalarValue::Boolean(_) => ValueKind::Boolean,
            ScalarValue::Null => ValueKind::Null,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_owned(self) -> ScalarValue<'static> {
        match self {
            ScalarValue::String(s) => ScalarValue::String(Cow::Owned(s.into_owned())),
            ScalarValue::Number(n) => ScalarValue::Number(n),
            ScalarValue::Boolean(b) => ScalarValue::Boolean(b),
            ScalarValue::Null => ScalarValue::Null,
        }
    }
}

impl From<i64> for ScalarValue<'_> {
    fn from(v: i64) -> Self {
        ScalarValue::Number(Number::Integer(v.into()))
    }
}

impl From<u64> for ScalarValue<'_> {
    fn from(v: u64) -> Self {
        ScalarValue::Number(Number::Integer(v.into()))
    }
}

impl From<f64> for ScalarValue<'_> {
    fn from(v: f64) -> Self {
        ScalarValue::Number(Number::Float(v))
    }
}

impl From<bool> for ScalarValue<'_> {
    fn from(v: bool) -> Self {
        ScalarValue::Boolean(v)
    }
}

impl<'a> From<&'a str> for ScalarValue<'a> {
    fn from(v: &'a str) -> Self {
        ScalarValue::String(Cow::Borrowed(v))
    }
}

/// The event kinds a [`Frame`](crate::Frame) has one slot for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    String,
    Number,
    Boolean,
    Null,
    ArrayStart,
    ObjectStart,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::String => "string",
            EventKind::Number => "number",
            EventKind::Boolean => "boolean",
            EventKind::Null => "null",
            EventKind::ArrayStart => "array start",
            EventKind::ObjectStart => "object start",
        };
        f.write_str(name)
    }
}

/// Kind of a JSON value as reported in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    Array,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn number_subtype_is_preserved() {
        let int = Number::Integer(10);
        let float = Number::Float(10.0);
        assert_ne!(int, float);
        assert_eq!(int.as_integer(), Some(10));
        assert_eq!(float.as_integer(), None);
        assert_eq!(int.as_f64(), 10.0);
        assert_eq!(int.kind(), ValueKind::Integer);
        assert_eq!(float.kind(), ValueKind::Float);
    }

    #[test]
    fn float_display_keeps_fraction() {
        assert_eq!(Number::Float(10.0).to_string(), "10.0");
        assert_eq!(Number::Float(2.5).to_string(), "2.5");
        assert_eq!(Number::Integer(-7).to_string(), "-7");
        assert_eq!(
            Number::Integer(u64::MAX.into()).to_string(),
            "18446744073709551615"
        );
    }

    #[test]
    fn scalar_kinds() {
        assert_eq!(ScalarValue::from("x").event_kind(), EventKind::String);
        assert_eq!(ScalarValue::from(1i64).event_kind(), EventKind::Number);
        assert_eq!(ScalarValue::from(u64::MAX).kind(), ValueKind::Integer);
        assert_eq!(ScalarValue::from(1.5).kind(), ValueKind::Float);
        assert_eq!(ScalarValue::from(true).kind(), ValueKind::Boolean);
        assert_eq!(ScalarValue::Null.event_kind(), EventKind::Null);
        assert_eq!(ScalarValue::from("x").as_str(), Some("x"));
        assert_eq!(ScalarValue::Null.as_str(), None);
    }
}

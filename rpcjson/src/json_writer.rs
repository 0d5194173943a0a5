// SPDX-License-Identifier: Apache-2.0

//! The serialization engine: a scope-tracking JSON emitter over any
//! [`core::fmt::Write`] sink.

use alloc::vec::Vec;
use core::fmt::{self, Write};

use crate::scalar::{Number, ScalarValue};
use crate::schema::ObjectSchema;
use crate::serialize::Serialize;

/// Errors raised while writing a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// A required member had no value to write.
    #[error("required field `{key}` is not set")]
    MissingField { key: &'static str },
    /// NaN and the infinities have no JSON representation.
    #[error("non-finite float cannot be written as JSON")]
    NonFiniteFloat,
    /// The calls made on the writer do not form a single JSON value.
    #[error("unbalanced writer call: {0}")]
    Unbalanced(&'static str),
    /// The sink refused the output.
    #[error("output sink error")]
    Format(#[from] fmt::Error),
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Object { first: bool, after_key: bool },
    Array { first: bool },
}

/// Emits compact JSON, checking that calls nest properly.
///
/// ```
/// use rpcjson::{JsonWriter, ScalarValue};
///
/// let mut writer = JsonWriter::new(String::new());
/// writer.open_object()?;
/// writer.key("line")?;
/// writer.emit(ScalarValue::from(10i64))?;
/// writer.close_object()?;
/// assert_eq!(writer.finish()?, r#"{"line":10}"#);
/// # Ok::<(), rpcjson::WriteError>(())
/// ```
pub struct JsonWriter<W> {
    out: W,
    scopes: Vec<Scope>,
    complete: bool,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        JsonWriter {
            out,
            scopes: Vec::new(),
            complete: false,
        }
    }

    pub fn open_object(&mut self) -> Result<(), WriteError> {
        self.before_value()?;
        self.out.write_char('{')?;
        self.scopes.push(Scope::Object {
            first: true,
            after_key: false,
        });
        Ok(())
    }

    pub fn close_object(&mut self) -> Result<(), WriteError> {
        match self.scopes.pop() {
            Some(Scope::Object {
                after_key: false, ..
            }) => {}
            Some(Scope::Object { .. }) => return Err(WriteError::Unbalanced("key without value")),
            _ => return Err(WriteError::Unbalanced("close_object outside an object")),
        }
        self.out.write_char('}')?;
        self.after_value();
        Ok(())
    }

    pub fn open_array(&mut self) -> Result<(), WriteError> {
        self.before_value()?;
        self.out.write_char('[')?;
        self.scopes.push(Scope::Array { first: true });
        Ok(())
    }

    pub fn close_array(&mut self) -> Result<(), WriteError> {
        match self.scopes.pop() {
            Some(Scope::Array { .. }) => {}
            _ => return Err(WriteError::Unbalanced("close_array outside an array")),
        }
        self.out.write_char(']')?;
        self.after_value();
        Ok(())
    }

    /// Starts a member; the next value written belongs to it.
    pub fn key(&mut self, name: &str) -> Result<(), WriteError> {
        match self.scopes.last_mut() {
            Some(Scope::Object { first, after_key }) if !*after_key => {
                if !*first {
                    self.out.write_char(',')?;
                }
                *first = false;
                *after_key = true;
            }
            Some(Scope::Object { .. }) => return Err(WriteError::Unbalanced("key after key")),
            _ => return Err(WriteError::Unbalanced("key outside an object")),
        }
        write_escaped(&mut self.out, name)?;
        self.out.write_char(':')?;
        Ok(())
    }

    pub fn emit(&mut self, value: ScalarValue<'_>) -> Result<(), WriteError> {
        if let ScalarValue::Number(Number::Float(v)) = value {
            if !v.is_finite() {
                return Err(WriteError::NonFiniteFloat);
            }
        }
        self.before_value()?;
        match value {
            ScalarValue::String(text) => write_escaped(&mut self.out, &text)?,
            ScalarValue::Number(number) => write!(self.out, "{number}")?,
            ScalarValue::Boolean(flag) => self.out.write_str(if flag { "true" } else { "false" })?,
            ScalarValue::Null => self.out.write_str("null")?,
        }
        self.after_value();
        Ok(())
    }

    /// Writes `"key":value`, or nothing at all if the value is absent.
    pub fn field<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), WriteError> {
        if value.is_absent() {
            return Ok(());
        }
        self.key(key)?;
        value.write(self)
    }

    /// Writes a whole object: braces around the schema's members.
    pub fn write_object<S: ObjectSchema>(&mut self, schema: &S) -> Result<(), WriteError> {
        self.open_object()?;
        schema.partial_write(self)?;
        self.close_object()
    }

    /// Returns the sink once exactly one complete value was written.
    pub fn finish(self) -> Result<W, WriteError> {
        if !self.scopes.is_empty() || !self.complete {
            return Err(WriteError::Unbalanced("incomplete document"));
        }
        Ok(self.out)
    }

    fn before_value(&mut self) -> Result<(), WriteError> {
        match self.scopes.last_mut() {
            None if self.complete => Err(WriteError::Unbalanced("second root value")),
            None => Ok(()),
            Some(Scope::Object { after_key, .. }) => {
                if !*after_key {
                    return Err(WriteError::Unbalanced("value without key"));
                }
                *after_key = false;
                Ok(())
            }
            Some(Scope::Array { first }) => {
                if !*first {
                    self.out.write_char(',')?;
                }
                *first = false;
                Ok(())
            }
        }
    }

    fn after_value(&mut self) {
        if self.scopes.is_empty() {
            self.complete = true;
        }
    }
}

/// Writes `text` as a quoted JSON string.
fn write_escaped<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    out.write_char('"')?;
    let mut start = 0;
    for (index, ch) in text.char_indices() {
        let escape = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{8}' => "\\b",
            '\u{c}' => "\\f",
            c if (c as u32) < 0x20 => "",
            _ => continue,
        };
        out.write_str(&text[start..index])?;
        if escape.is_empty() {
            write!(out, "\\u{:04x}", ch as u32)?;
        } else {
            out.write_str(escape)?;
        }
        start = index + ch.len_utf8();
    }
    out.write_str(&text[start..])?;
    out.write_char('"')
}

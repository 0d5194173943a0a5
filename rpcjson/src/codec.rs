// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use core::fmt;

use crate::deserialize::Deserialize;
use crate::frame_stack::{FrameStack, StackStats};
use crate::json_writer::{JsonWriter, WriteError};
use crate::options::ParseOptions;
use crate::parse_error::ParseError;
use crate::serialize::Serialize;
use crate::tokenizer::Tokenizer;

/// Reads one `T` from a JSON text.
///
/// ```
/// let values: Vec<i64> = rpcjson::from_str("[1, 2, 3]").unwrap();
/// assert_eq!(values, [1, 2, 3]);
/// ```
pub fn from_str<T: Deserialize>(input: &str) -> Result<T, ParseError> {
    from_slice(input.as_bytes())
}

pub fn from_slice<T: Deserialize>(input: &[u8]) -> Result<T, ParseError> {
    from_slice_with(input, ParseOptions::default())
}

pub fn from_slice_with<T: Deserialize>(input: &[u8], options: ParseOptions) -> Result<T, ParseError> {
    let mut value = T::default();
    deserialize_into(input, &mut value, options)?;
    Ok(value)
}

/// Populates an existing value in a single tokenizer pass.
///
/// On error `target` is left partially populated.
pub fn deserialize_into<T: Deserialize>(
    input: &[u8],
    target: &mut T,
    options: ParseOptions,
) -> Result<StackStats, ParseError> {
    let mut stack = FrameStack::new(target, options);
    let mut tokenizer = Tokenizer::new();
    if let Err(err) = tokenizer.parse(input, &mut stack) {
        log::debug!("parse aborted at depth {}: {err}", stack.depth());
        return Err(err);
    }
    stack.finish()
}

/// Writes `value` as compact JSON.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String, WriteError> {
    to_writer(String::new(), value)
}

/// Writes `value` into `out` and hands the sink back.
pub fn to_writer<W: fmt::Write, T: Serialize + ?Sized>(out: W, value: &T) -> Result<W, WriteError> {
    let mut writer = JsonWriter::new(out);
    value.write(&mut writer)?;
    writer.finish()
}

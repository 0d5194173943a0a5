// SPDX-License-Identifier: Apache-2.0

//! Representative JSON-RPC message schemas.
//!
//! The envelope members shared by every message live in [`Message`] and are
//! flattened into requests and responses on both read and write.

use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::deserialize::{target, Deserialize, Nullable};
use crate::frame::{Field, Frame};
use crate::json_object;
use crate::json_writer::{JsonWriter, WriteError};
use crate::parse_error::{ParseError, UnexpectedState};
use crate::scalar::{Number, ScalarValue};
use crate::schema::{object_frame, ObjectSchema};
use crate::serialize::Serialize;

/// The `"jsonrpc"` member. Only `"2.0"` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonRpcVersion;

impl JsonRpcVersion {
    pub const VERSION: &'static str = "2.0";
}

impl Deserialize for JsonRpcVersion {
    fn build_frame() -> Frame {
        fn set(slot: &mut dyn Any, value: ScalarValue<'_>) -> Result<(), ParseError> {
            target::<JsonRpcVersion>(slot)?;
            match value.as_str() {
                Some(JsonRpcVersion::VERSION) => Ok(()),
                _ => Err(ParseError::UnknownValue {
                    expected: JsonRpcVersion::VERSION,
                }),
            }
        }
        Frame::new().with_string(set)
    }
}

impl Serialize for JsonRpcVersion {
    fn write<W: fmt::Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.emit(ScalarValue::from(Self::VERSION))
    }
}

/// A request id, either an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestId {
    Integer(i64),
    String(String),
}

impl Default for RequestId {
    fn default() -> Self {
        RequestId::Integer(0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Integer(id) => write!(f, "{id}"),
            RequestId::String(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Integer(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.into())
    }
}

impl Deserialize for RequestId {
    fn build_frame() -> Frame {
        fn set(slot: &mut dyn Any, value: ScalarValue<'_>) -> Result<(), ParseError> {
            let id = match value {
                ScalarValue::Number(Number::Integer(id)) => {
                    RequestId::Integer(i64::try_from(id).map_err(|_| ParseError::OutOfRange)?)
                }
                ScalarValue::String(id) => RequestId::String(id.into_owned()),
                other => {
                    return Err(ParseError::TypeMismatch {
                        found: other.kind(),
                    })
                }
            };
            *target::<RequestId>(slot)? = id;
            Ok(())
        }
        Frame::new().with_number(set).with_string(set)
    }
}

impl Serialize for RequestId {
    fn write<W: fmt::Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        match self {
            RequestId::Integer(id) => id.write(writer),
            RequestId::String(id) => id.write(writer),
        }
    }
}

json_object! {
    /// Zero-based line and character offset in a text document.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Position {
        pub line: u32 => "line",
        pub character: u32 => "character",
    }
}

json_object! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Range {
        pub start: Position => "start",
        pub end: Position => "end",
    }
}

json_object! {
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct Location {
        pub uri: String => "uri",
        pub range: Range => "range",
    }
}

json_object! {
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TextDocumentIdentifier {
        pub uri: String => "uri",
    }
}

json_object! {
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct TextDocumentPositionParams {
        pub text_document: TextDocumentIdentifier => "textDocument",
        pub position: Position => "position",
    }
}

json_object! {
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct ResponseError {
        pub code: i64 => "code",
        pub message: String => "message",
        pub data: Option<String> => "data",
    }
}

json_object! {
    /// Members present in every message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Message {
        pub jsonrpc: JsonRpcVersion => "jsonrpc",
    }
}

/// Result of a go-to-definition request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DefinitionResult {
    Location(Location),
    Locations(Vec<Location>),
    #[default]
    Null,
}

impl Deserialize for DefinitionResult {
    fn build_frame() -> Frame {
        fn set_null(slot: &mut dyn Any, _value: ScalarValue<'_>) -> Result<(), ParseError> {
            *target::<DefinitionResult>(slot)? = DefinitionResult::Null;
            Ok(())
        }

        fn open_location(slot: &mut dyn Any) -> Result<Frame, ParseError> {
            *target::<DefinitionResult>(slot)? = DefinitionResult::Location(Location::default());
            Ok(Frame::object(Location::FIELDS).entered_through(DefinitionResult::enter))
        }

        fn open_locations(slot: &mut dyn Any) -> Result<Frame, ParseError> {
            let this = target::<DefinitionResult>(slot)?;
            *this = DefinitionResult::Locations(Vec::new());
            let opener = Vec::<Location>::build_frame()
                .on_array_start
                .ok_or(UnexpectedState::TargetMismatch)?;
            let frame = match this {
                DefinitionResult::Locations(locations) => opener(locations)?,
                _ => return Err(UnexpectedState::TargetMismatch.into()),
            };
            Ok(frame.entered_through(DefinitionResult::enter))
        }

        Frame::new()
            .with_null(set_null)
            .with_object_start(open_location)
            .with_array_start(open_locations)
    }

    fn enter(slot: &mut dyn Any) -> Option<&mut dyn Any> {
        match slot.downcast_mut::<DefinitionResult>()? {
            DefinitionResult::Location(location) => Some(location as &mut dyn Any),
            DefinitionResult::Locations(locations) => Some(locations as &mut dyn Any),
            DefinitionResult::Null => None,
        }
    }
}

impl Serialize for DefinitionResult {
    fn write<W: fmt::Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        match self {
            DefinitionResult::Location(location) => location.write(writer),
            DefinitionResult::Locations(locations) => locations.write(writer),
            DefinitionResult::Null => writer.emit(ScalarValue::Null),
        }
    }
}

/// A field projector into a nested member path of a message type.
macro_rules! member {
    ($ty:ty, $($path:ident).+) => {{
        fn project(slot: &mut dyn Any) -> Option<&mut dyn Any> {
            slot.downcast_mut::<$ty>()
                .map(|this| &mut this.$($path).+ as &mut dyn Any)
        }
        project
    }};
}

/// A `textDocument/definition`-style request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestMessage {
    pub message: Message,
    pub id: RequestId,
    pub method: String,
    pub params: Option<TextDocumentPositionParams>,
}

impl ObjectSchema for RequestMessage {
    const FIELDS: &'static [Field] = &[
        Field {
            key: "jsonrpc",
            required: true,
            initializer: JsonRpcVersion::build_frame,
            project: member!(RequestMessage, message.jsonrpc),
        },
        Field {
            key: "id",
            required: true,
            initializer: RequestId::build_frame,
            project: member!(RequestMessage, id),
        },
        Field {
            key: "method",
            required: true,
            initializer: String::build_frame,
            project: member!(RequestMessage, method),
        },
        Field {
            key: "params",
            required: false,
            initializer: Option::<TextDocumentPositionParams>::build_frame,
            project: member!(RequestMessage, params),
        },
    ];

    fn partial_write<W: fmt::Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        self.message.partial_write(writer)?;
        writer.field("id", &self.id)?;
        writer.field("method", &self.method)?;
        writer.field("params", &self.params)
    }
}

impl Deserialize for RequestMessage {
    fn build_frame() -> Frame {
        object_frame::<Self>()
    }
}

impl Serialize for RequestMessage {
    fn write<W: fmt::Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.write_object(self)
    }
}

/// A response carrying either a result or an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseMessage {
    pub message: Message,
    /// `null` when the request id could not be determined.
    pub id: Nullable<RequestId>,
    pub result: Option<DefinitionResult>,
    pub error: Option<ResponseError>,
}

impl ResponseMessage {
    pub fn success(id: RequestId, result: DefinitionResult) -> Self {
        ResponseMessage {
            id: Nullable::Value(id),
            result: Some(result),
            ..Default::default()
        }
    }

    pub fn failure(id: Nullable<RequestId>, error: ResponseError) -> Self {
        ResponseMessage {
            id,
            error: Some(error),
            ..Default::default()
        }
    }
}

impl ObjectSchema for ResponseMessage {
    const FIELDS: &'static [Field] = &[
        Field {
            key: "jsonrpc",
            required: true,
            initializer: JsonRpcVersion::build_frame,
            project: member!(ResponseMessage, message.jsonrpc),
        },
        Field {
            key: "id",
            required: true,
            initializer: Nullable::<RequestId>::build_frame,
            project: member!(ResponseMessage, id),
        },
        Field {
            key: "result",
            required: false,
            initializer: Option::<DefinitionResult>::build_frame,
            project: member!(ResponseMessage, result),
        },
        Field {
            key: "error",
            required: false,
            initializer: Option::<ResponseError>::build_frame,
            project: member!(ResponseMessage, error),
        },
    ];

    fn partial_write<W: fmt::Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        if self.result.is_none() && self.error.is_none() {
            return Err(WriteError::MissingField { key: "result" });
        }
        self.message.partial_write(writer)?;
        writer.field("id", &self.id)?;
        writer.field("result", &self.result)?;
        writer.field("error", &self.error)
    }
}

impl Deserialize for ResponseMessage {
    fn build_frame() -> Frame {
        object_frame::<Self>()
    }
}

impl Serialize for ResponseMessage {
    fn write<W: fmt::Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.write_object(self)
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Event-driven JSON deserialization straight into typed JSON-RPC objects.
//!
//! A byte-level [`Tokenizer`] reports JSON events to a [`FrameStack`], which
//! dispatches each event to the [`Frame`] for the current nesting level. The
//! frames are built from static per-type field tables, so values are
//! populated in place without an intermediate JSON tree. [`JsonWriter`] is
//! the reverse path.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod escape_processor;
mod number_parser;

mod tokenizer;
pub use tokenizer::{ErrKind, Event, EventHandler, SyntaxError, Tokenizer};

mod scalar;
pub use scalar::{EventKind, Number, ScalarValue, ValueKind};

mod parse_error;
pub use parse_error::{ParseError, UnexpectedState};

mod options;
pub use options::{DuplicateKeys, ParseOptions, UnknownKeys};

mod frame;
pub use frame::{Field, Frame, Opener, Project, ScalarSetter};

mod frame_stack;
pub use frame_stack::{FrameStack, StackStats};

mod deserialize;
pub use deserialize::{target, Deserialize, Nullable};

mod json_writer;
pub use json_writer::{JsonWriter, WriteError};

mod serialize;
pub use serialize::Serialize;

mod schema;
pub use schema::{object_frame, open_object, ObjectSchema};

mod codec;
pub use codec::{deserialize_into, from_slice, from_slice_with, from_str, to_string, to_writer};

pub mod protocol;

// SPDX-License-Identifier: Apache-2.0

//! Per-nesting-level dispatch records.
//!
//! A [`Frame`] holds one optional callback per JSON event kind. An unset slot
//! means the event is not valid at this position. Frames never hold
//! references into the value being populated: every callback receives the
//! storage it should act on as `&mut dyn Any`, freshly derived from the root
//! by the frame stack for each event.

use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

use crate::parse_error::ParseError;
use crate::scalar::{EventKind, ScalarValue};

/// Consumes one scalar into the storage it is handed.
pub type ScalarSetter = fn(&mut dyn Any, ScalarValue<'_>) -> Result<(), ParseError>;

/// Prepares the storage it is handed for a container value and returns the
/// frame that receives the container's contents.
pub type Opener = fn(&mut dyn Any) -> Result<Frame, ParseError>;

/// Reaches from one storage location into another (a struct field, the last
/// array element, the inside of an `Option`). `None` if the storage does not
/// have the expected shape.
pub type Project = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// One entry in an object schema's static field table.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// The JSON member name.
    pub key: &'static str,
    /// Whether the member must appear for the object to be complete.
    pub required: bool,
    /// Builds the slots that receive this member's value.
    pub initializer: fn() -> Frame,
    /// Reaches the member's storage inside the schema object.
    pub project: Project,
}

/// Which member of an object frame the next value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursor {
    None,
    Member(usize),
    Discard,
}

#[derive(Debug, Clone)]
pub(crate) enum Scope {
    /// The top-level value. Only the root frame has this scope.
    Value,
    Object {
        fields: &'static [Field],
        seen: Vec<bool>,
        cursor: Cursor,
    },
    Array {
        /// Appends a default element and returns it.
        push: Project,
        /// Returns the most recently appended element.
        last: Project,
    },
    /// A container whose contents are consumed and dropped.
    Skip,
}

/// Callback slots for the value (or values) at one nesting level.
#[derive(Debug, Clone)]
pub struct Frame {
    pub on_string: Option<ScalarSetter>,
    pub on_number: Option<ScalarSetter>,
    pub on_boolean: Option<ScalarSetter>,
    pub on_null: Option<ScalarSetter>,
    pub on_array_start: Option<Opener>,
    pub on_object_start: Option<Opener>,
    pub(crate) scope: Scope,
    /// Maps the value storage of the parent level to this frame's container.
    pub(crate) enter: Project,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// A frame with every slot unset.
    pub fn new() -> Self {
        Frame {
            on_string: None,
            on_number: None,
            on_boolean: None,
            on_null: None,
            on_array_start: None,
            on_object_start: None,
            scope: Scope::Value,
            enter: identity,
        }
    }

    pub fn with_string(mut self, setter: ScalarSetter) -> Self {
        self.on_string = Some(setter);
        self
    }

    pub fn with_number(mut self, setter: ScalarSetter) -> Self {
        self.on_number = Some(setter);
        self
    }

    pub fn with_boolean(mut self, setter: ScalarSetter) -> Self {
        self.on_boolean = Some(setter);
        self
    }

    pub fn with_null(mut self, setter: ScalarSetter) -> Self {
        self.on_null = Some(setter);
        self
    }

    pub fn with_array_start(mut self, opener: Opener) -> Self {
        self.on_array_start = Some(opener);
        self
    }

    pub fn with_object_start(mut self, opener: Opener) -> Self {
        self.on_object_start = Some(opener);
        self
    }

    /// Sets how this frame's container is reached from the parent's value
    /// storage. Wrapper types use this to look through themselves.
    pub fn entered_through(mut self, enter: Project) -> Self {
        self.enter = enter;
        self
    }

    /// An object frame over `fields`, with no member selected yet.
    pub fn object(fields: &'static [Field]) -> Self {
        Frame {
            scope: Scope::Object {
                fields,
                seen: vec![false; fields.len()],
                cursor: Cursor::None,
            },
            ..Frame::new()
        }
    }

    /// An array frame whose element slots come from `element`.
    pub fn array(element: Frame, push: Project, last: Project) -> Self {
        let mut frame = Frame::new();
        frame.install_slots(&element);
        frame.scope = Scope::Array { push, last };
        frame
    }

    /// A frame that swallows any value, nested containers included.
    pub fn skip() -> Self {
        let mut frame = Frame::new();
        frame.install_discard();
        frame.scope = Scope::Skip;
        frame
    }

    pub fn scalar_slot(&self, kind: EventKind) -> Option<ScalarSetter> {
        match kind {
            EventKind::String => self.on_string,
            EventKind::Number => self.on_number,
            EventKind::Boolean => self.on_boolean,
            EventKind::Null => self.on_null,
            EventKind::ArrayStart | EventKind::ObjectStart => None,
        }
    }

    pub fn opener_slot(&self, kind: EventKind) -> Option<Opener> {
        match kind {
            EventKind::ArrayStart => self.on_array_start,
            EventKind::ObjectStart => self.on_object_start,
            _ => None,
        }
    }

    /// Copies the six value slots of `from`, leaving scope and entry alone.
    pub(crate) fn install_slots(&mut self, from: &Frame) {
        self.on_string = from.on_string;
        self.on_number = from.on_number;
        self.on_boolean = from.on_boolean;
        self.on_null = from.on_null;
        self.on_array_start = from.on_array_start;
        self.on_object_start = from.on_object_start;
    }

    pub(crate) fn install_discard(&mut self) {
        self.on_string = Some(discard);
        self.on_number = Some(discard);
        self.on_boolean = Some(discard);
        self.on_null = Some(discard);
        self.on_array_start = Some(open_skip);
        self.on_object_start = Some(open_skip);
    }

    /// True if the next value at this level is dropped rather than stored.
    pub(crate) fn is_discarding(&self) -> bool {
        match &self.scope {
            Scope::Skip => true,
            Scope::Object { cursor, .. } => *cursor == Cursor::Discard,
            _ => false,
        }
    }
}

fn identity(slot: &mut dyn Any) -> Option<&mut dyn Any> {
    Some(slot)
}

fn discard(_slot: &mut dyn Any, _value: ScalarValue<'_>) -> Result<(), ParseError> {
    Ok(())
}

fn open_skip(_slot: &mut dyn Any) -> Result<Frame, ParseError> {
    Ok(Frame::skip())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(frame: &Frame) -> usize {
        [
            frame.on_string.is_some(),
            frame.on_number.is_some(),
            frame.on_boolean.is_some(),
            frame.on_null.is_some(),
            frame.on_array_start.is_some(),
            frame.on_object_start.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    #[test]
    fn new_frame_accepts_nothing() {
        let frame = Frame::new();
        assert_eq!(count(&frame), 0);
        assert!(!frame.is_discarding());
    }

    #[test]
    fn skip_frame_accepts_everything() {
        let frame = Frame::skip();
        assert_eq!(count(&frame), 6);
        assert!(frame.is_discarding());
        let setter = frame.scalar_slot(EventKind::Number).unwrap();
        assert!(setter(&mut (), ScalarValue::from(3i64)).is_ok());
        let opener = frame.opener_slot(EventKind::ObjectStart).unwrap();
        assert!(opener(&mut ()).unwrap().is_discarding());
    }

    #[test]
    fn slot_lookup_by_kind() {
        let frame = Frame::new().with_boolean(discard);
        assert!(frame.scalar_slot(EventKind::Boolean).is_some());
        assert!(frame.scalar_slot(EventKind::String).is_none());
        assert!(frame.scalar_slot(EventKind::ArrayStart).is_none());
        assert!(frame.opener_slot(EventKind::Boolean).is_none());
    }

    #[test]
    fn object_frame_tracks_members() {
        static FIELDS: [Field; 2] = [
            Field {
                key: "a",
                required: true,
                initializer: Frame::new,
                project: identity,
            },
            Field {
                key: "b",
                required: false,
                initializer: Frame::new,
                project: identity,
            },
        ];
        let frame = Frame::object(&FIELDS);
        match &frame.scope {
            Scope::Object { seen, cursor, .. } => {
                assert_eq!(seen.len(), 2);
                assert_eq!(*cursor, Cursor::None);
            }
            other => panic!("unexpected scope {other:?}"),
        }
    }
}

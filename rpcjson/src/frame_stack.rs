// SPDX-License-Identifier: Apache-2.0

//! The deserialization engine: a stack of [`Frame`]s driven by JSON events.

use alloc::string::ToString;
use alloc::vec::Vec;
use core::any::Any;

use crate::deserialize::Deserialize;
use crate::frame::{Cursor, Frame, Scope};
use crate::options::{DuplicateKeys, ParseOptions, UnknownKeys};
use crate::parse_error::{ParseError, UnexpectedState};
use crate::scalar::{EventKind, ScalarValue};
use crate::tokenizer::{Event, EventHandler};

/// Bookkeeping reported once the root frame has been popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackStats {
    pub pushes: usize,
    pub pops: usize,
    /// Largest number of frames held at once, root included. A document that
    /// passes `ParseOptions::max_depth(n)` peaks at no more than `n + 1`.
    pub peak_frames: usize,
}

/// Populates one value of type `T` from a sequence of JSON events.
///
/// The stack starts out holding the root frame for the target and is empty
/// again only after [`finish`](Self::finish). Each start event pushes exactly
/// one frame and each end event pops exactly one.
///
/// Every event walks from the root down to the current member through each
/// frame's projector, so an event costs time proportional to the current
/// depth. Set [`ParseOptions::max_depth`] when reading untrusted input into
/// recursive schemas.
///
/// On error the target is left partially populated and should be dropped.
pub struct FrameStack<'t> {
    root: &'t mut dyn Any,
    stack: Vec<Frame>,
    options: ParseOptions,
    stats: StackStats,
}

impl<'t> FrameStack<'t> {
    pub fn new<T: Deserialize>(target: &'t mut T, options: ParseOptions) -> Self {
        let root_frame = T::build_frame();
        log::trace!("push root frame for {}", core::any::type_name::<T>());
        FrameStack {
            root: target,
            stack: alloc::vec![root_frame],
            options,
            stats: StackStats {
                pushes: 1,
                pops: 0,
                peak_frames: 1,
            },
        }
    }

    /// Number of frames currently held, root included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn begin_object(&mut self) -> Result<(), ParseError> {
        self.begin(EventKind::ObjectStart)
    }

    pub fn begin_array(&mut self) -> Result<(), ParseError> {
        self.begin(EventKind::ArrayStart)
    }

    pub fn end_object(&mut self) -> Result<(), ParseError> {
        let frame = self.pop()?;
        match frame.scope {
            Scope::Object { fields, seen, .. } => {
                let missing = fields
                    .iter()
                    .zip(seen.iter())
                    .find(|(field, seen)| field.required && !**seen);
                match missing {
                    Some((field, _)) => Err(ParseError::MissingRequiredField { key: field.key }),
                    None => Ok(()),
                }
            }
            Scope::Skip => Ok(()),
            _ => Err(UnexpectedState::MismatchedClose.into()),
        }
    }

    pub fn end_array(&mut self) -> Result<(), ParseError> {
        match self.pop()?.scope {
            Scope::Array { .. } | Scope::Skip => Ok(()),
            _ => Err(UnexpectedState::MismatchedClose.into()),
        }
    }

    /// Selects the member the next value is stored into.
    pub fn key(&mut self, name: &str) -> Result<(), ParseError> {
        let options = self.options;
        let top = self.stack.last_mut().ok_or(UnexpectedState::EmptyStack)?;
        let (fields, seen, cursor) = match &mut top.scope {
            Scope::Object {
                fields,
                seen,
                cursor,
            } => (*fields, seen, cursor),
            Scope::Skip => return Ok(()),
            _ => return Err(UnexpectedState::KeyOutsideObject.into()),
        };

        let Some(index) = fields.iter().position(|field| field.key == name) else {
            if options.unknown_keys == UnknownKeys::Reject {
                return Err(ParseError::UnknownKey {
                    key: name.to_string(),
                });
            }
            log::debug!("ignoring unknown key {name:?}");
            *cursor = Cursor::Discard;
            top.install_discard();
            return Ok(());
        };

        let field = &fields[index];
        if seen[index] {
            match options.duplicate_keys {
                DuplicateKeys::Reject => {
                    return Err(ParseError::DuplicateKey { key: field.key });
                }
                DuplicateKeys::FirstWins => {
                    log::debug!("dropping repeated key {name:?}");
                    *cursor = Cursor::Discard;
                    top.install_discard();
                    return Ok(());
                }
                DuplicateKeys::LastWins => {}
            }
        }
        seen[index] = true;
        *cursor = Cursor::Member(index);
        log::trace!("key {name:?} selects member {index}");
        let slots = (field.initializer)();
        top.install_slots(&slots);
        Ok(())
    }

    /// Dispatches one scalar to the slot matching its kind.
    pub fn scalar(&mut self, value: ScalarValue<'_>) -> Result<(), ParseError> {
        let top = self.stack.last().ok_or(UnexpectedState::EmptyStack)?;
        let setter = top
            .scalar_slot(value.event_kind())
            .ok_or(ParseError::TypeMismatch { found: value.kind() })?;
        if top.is_discarding() {
            return setter(&mut (), value);
        }
        let slot = locate(&mut *self.root, &self.stack)?;
        setter(slot, value)
    }

    /// Pops the root frame and reports the stack statistics.
    pub fn finish(mut self) -> Result<StackStats, ParseError> {
        if self.stack.len() != 1 {
            return Err(UnexpectedState::UnbalancedStack.into());
        }
        self.pop()?;
        Ok(self.stats)
    }

    fn begin(&mut self, event: EventKind) -> Result<(), ParseError> {
        let top = self.stack.last().ok_or(UnexpectedState::EmptyStack)?;
        let opener = top
            .opener_slot(event)
            .ok_or(ParseError::UnexpectedEvent { event })?;
        if let Some(limit) = self.options.max_depth {
            if self.stack.len() > limit {
                return Err(ParseError::DepthLimitExceeded { limit });
            }
        }
        let frame = if top.is_discarding() {
            opener(&mut ())?
        } else {
            let slot = locate(&mut *self.root, &self.stack)?;
            opener(slot)?
        };
        self.stack.push(frame);
        self.stats.pushes += 1;
        self.stats.peak_frames = self.stats.peak_frames.max(self.stack.len());
        log::trace!("push {event} frame, depth {}", self.stack.len());
        Ok(())
    }

    fn pop(&mut self) -> Result<Frame, ParseError> {
        let frame = self.stack.pop().ok_or(UnexpectedState::EmptyStack)?;
        self.stats.pops += 1;
        log::trace!("pop frame, depth {}", self.stack.len());
        Ok(frame)
    }
}

/// Walks from the root to the storage that receives the next value at the
/// top of `stack`.
///
/// Every frame first enters its container from the parent's value storage,
/// then selects its current value: the selected member of an object, the
/// last element of an array. At the top level an array appends a fresh
/// element instead.
fn locate<'r>(root: &'r mut dyn Any, stack: &[Frame]) -> Result<&'r mut dyn Any, ParseError> {
    let top = stack.len().checked_sub(1).ok_or(UnexpectedState::EmptyStack)?;
    let mut current = root;
    for (depth, frame) in stack.iter().enumerate() {
        let container = (frame.enter)(current).ok_or(UnexpectedState::TargetMismatch)?;
        let value = match &frame.scope {
            Scope::Value => Some(container),
            Scope::Object {
                fields,
                cursor: Cursor::Member(index),
                ..
            } => (fields[*index].project)(container),
            Scope::Array { push, .. } if depth == top => push(container),
            Scope::Array { last, .. } => last(container),
            Scope::Object { .. } | Scope::Skip => None,
        };
        current = value.ok_or(UnexpectedState::TargetMismatch)?;
    }
    Ok(current)
}

impl EventHandler<ParseError> for FrameStack<'_> {
    fn handle_event(&mut self, event: Event<'_>) -> Result<(), ParseError> {
        match event {
            Event::StartObject => self.begin_object(),
            Event::EndObject => self.end_object(),
            Event::StartArray => self.begin_array(),
            Event::EndArray => self.end_array(),
            Event::Key(name) => self.key(&name),
            Event::String(text) => self.scalar(ScalarValue::String(text)),
            Event::Number(number) => self.scalar(ScalarValue::Number(number)),
            Event::Bool(flag) => self.scalar(ScalarValue::Boolean(flag)),
            Event::Null => self.scalar(ScalarValue::Null),
            Event::EndDocument => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_object;
    use alloc::string::String;
    use alloc::vec;

    json_object! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Point {
            x: i64 => "x",
            y: Option<f64> => "y",
        }
    }

    json_object! {
        #[derive(Debug, Clone, PartialEq, Default)]
        struct Shape {
            name: String => "name",
            points: Vec<Point> => "points",
        }
    }

    #[test]
    fn drives_nested_values_by_hand() {
        let mut shape = Shape::default();
        let mut stack = FrameStack::new(&mut shape, ParseOptions::default());
        stack.begin_object().unwrap();
        stack.key("points").unwrap();
        stack.begin_array().unwrap();
        stack.begin_object().unwrap();
        stack.key("x").unwrap();
        stack.scalar(ScalarValue::from(1i64)).unwrap();
        assert_eq!(stack.depth(), 4);
        stack.end_object().unwrap();
        stack.begin_object().unwrap();
        stack.key("y").unwrap();
        stack.scalar(ScalarValue::from(0.5)).unwrap();
        stack.key("x").unwrap();
        stack.scalar(ScalarValue::from(2i64)).unwrap();
        stack.end_object().unwrap();
        stack.end_array().unwrap();
        stack.key("name").unwrap();
        stack.scalar(ScalarValue::from("tri")).unwrap();
        stack.end_object().unwrap();
        let stats = stack.finish().unwrap();

        assert_eq!(stats.pushes, stats.pops);
        assert_eq!(stats.pushes, 5);
        assert_eq!(stats.peak_frames, 4);
        assert_eq!(
            shape,
            Shape {
                name: "tri".into(),
                points: vec![Point { x: 1, y: None }, Point { x: 2, y: Some(0.5) }],
            }
        );
    }

    #[test]
    fn missing_required_member() {
        let mut point = Point::default();
        let mut stack = FrameStack::new(&mut point, ParseOptions::default());
        stack.begin_object().unwrap();
        stack.key("y").unwrap();
        stack.scalar(ScalarValue::from(1.0)).unwrap();
        assert_eq!(
            stack.end_object(),
            Err(ParseError::MissingRequiredField { key: "x" })
        );
    }

    #[test]
    fn unset_slots_are_rejected() {
        let mut point = Point::default();
        let mut stack = FrameStack::new(&mut point, ParseOptions::default());
        assert_eq!(
            stack.begin_array(),
            Err(ParseError::UnexpectedEvent {
                event: EventKind::ArrayStart
            })
        );
        stack.begin_object().unwrap();
        stack.key("x").unwrap();
        assert_eq!(
            stack.scalar(ScalarValue::from("ten")),
            Err(ParseError::TypeMismatch {
                found: crate::ValueKind::String
            })
        );
    }

    #[test]
    fn unknown_member_is_skipped_with_its_contents() {
        let mut point = Point::default();
        let mut stack = FrameStack::new(&mut point, ParseOptions::default());
        stack.begin_object().unwrap();
        stack.key("extra").unwrap();
        stack.begin_object().unwrap();
        stack.key("deep").unwrap();
        stack.begin_array().unwrap();
        stack.scalar(ScalarValue::Null).unwrap();
        stack.end_array().unwrap();
        stack.end_object().unwrap();
        stack.key("x").unwrap();
        stack.scalar(ScalarValue::from(7i64)).unwrap();
        stack.end_object().unwrap();
        let stats = stack.finish().unwrap();
        assert_eq!(stats.pushes, 4);
        assert_eq!(point.x, 7);
    }

    #[test]
    fn finish_requires_balanced_stack() {
        let mut point = Point::default();
        let mut stack = FrameStack::new(&mut point, ParseOptions::default());
        stack.begin_object().unwrap();
        assert_eq!(
            stack.finish(),
            Err(ParseError::Unexpected(UnexpectedState::UnbalancedStack))
        );
    }

    #[test]
    fn key_outside_object() {
        let mut values: Vec<i64> = Vec::new();
        let mut stack = FrameStack::new(&mut values, ParseOptions::default());
        stack.begin_array().unwrap();
        assert_eq!(
            stack.key("x"),
            Err(ParseError::Unexpected(UnexpectedState::KeyOutsideObject))
        );
    }

    #[test]
    fn depth_limit_counts_containers() {
        let mut values: Vec<Vec<i64>> = Vec::new();
        let options = ParseOptions::new().max_depth(1);
        let mut stack = FrameStack::new(&mut values, options);
        stack.begin_array().unwrap();
        assert_eq!(
            stack.begin_array(),
            Err(ParseError::DepthLimitExceeded { limit: 1 })
        );
    }
}

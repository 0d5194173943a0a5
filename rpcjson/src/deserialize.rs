// SPDX-License-Identifier: Apache-2.0

//! The deserialization half of the schema contract, with implementations for
//! primitives, strings, arrays and the optional/nullable wrappers.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::frame::Frame;
use crate::parse_error::{ParseError, UnexpectedState};
use crate::scalar::{EventKind, Number, ScalarValue};

/// A type that can be populated from JSON events.
///
/// `build_frame` returns the slots that accept a value of the type. Openers
/// among those slots must return a frame whose entry is [`Self::enter`].
pub trait Deserialize: Any + Default {
    /// Whether a member of this type must be present in its object.
    const REQUIRED: bool = true;

    fn build_frame() -> Frame;

    /// Reaches the container storage inside a value of this type. Plain
    /// types are their own container; wrappers look through themselves.
    fn enter(slot: &mut dyn Any) -> Option<&mut dyn Any> {
        Some(slot)
    }
}

/// Downcasts setter storage, reporting a mismatch as an internal error.
pub fn target<T: Any>(slot: &mut dyn Any) -> Result<&mut T, ParseError> {
    slot.downcast_mut::<T>()
        .ok_or(ParseError::Unexpected(UnexpectedState::TargetMismatch))
}

fn integer(value: ScalarValue<'_>) -> Result<i128, ParseError> {
    match value {
        ScalarValue::Number(Number::Integer(v)) => Ok(v),
        other => Err(ParseError::TypeMismatch {
            found: other.kind(),
        }),
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl Deserialize for $ty {
                fn build_frame() -> Frame {
                    fn set(slot: &mut dyn Any, value: ScalarValue<'_>) -> Result<(), ParseError> {
                        let wide = integer(value)?;
                        *target::<$ty>(slot)? = <$ty>::try_from(wide).map_err(|_| ParseError::OutOfRange)?;
                        Ok(())
                    }
                    Frame::new().with_number(set)
                }
            }
        )*
    };
}

impl_integer!(i64, i32, u32, u64);

impl Deserialize for f64 {
    fn build_frame() -> Frame {
        fn set(slot: &mut dyn Any, value: ScalarValue<'_>) -> Result<(), ParseError> {
            match value {
                ScalarValue::Number(number) => {
                    *target::<f64>(slot)? = number.as_f64();
                    Ok(())
                }
                other => Err(ParseError::TypeMismatch {
                    found: other.kind(),
                }),
            }
        }
        Frame::new().with_number(set)
    }
}

impl Deserialize for bool {
    fn build_frame() -> Frame {
        fn set(slot: &mut dyn Any, value: ScalarValue<'_>) -> Result<(), ParseError> {
            match value {
                ScalarValue::Boolean(flag) => {
                    *target::<bool>(slot)? = flag;
                    Ok(())
                }
                other => Err(ParseError::TypeMismatch {
                    found: other.kind(),
                }),
            }
        }
        Frame::new().with_boolean(set)
    }
}

impl Deserialize for String {
    fn build_frame() -> Frame {
        fn set(slot: &mut dyn Any, value: ScalarValue<'_>) -> Result<(), ParseError> {
            match value {
                ScalarValue::String(text) => {
                    *target::<String>(slot)? = text.into_owned();
                    Ok(())
                }
                other => Err(ParseError::TypeMismatch {
                    found: other.kind(),
                }),
            }
        }
        Frame::new().with_string(set)
    }
}

/// JSON `null`.
impl Deserialize for () {
    fn build_frame() -> Frame {
        Frame::new().with_null(|_, _| Ok(()))
    }
}

impl<T: Deserialize> Deserialize for Vec<T> {
    fn build_frame() -> Frame {
        Frame::new().with_array_start(open_array::<T>)
    }
}

fn open_array<T: Deserialize>(slot: &mut dyn Any) -> Result<Frame, ParseError> {
    target::<Vec<T>>(slot)?.clear();
    Ok(Frame::array(
        T::build_frame(),
        push_element::<T>,
        last_element::<T>,
    ))
}

fn push_element<T: Deserialize>(slot: &mut dyn Any) -> Option<&mut dyn Any> {
    let items = slot.downcast_mut::<Vec<T>>()?;
    items.push(T::default());
    items.last_mut().map(|item| item as &mut dyn Any)
}

fn last_element<T: Deserialize>(slot: &mut dyn Any) -> Option<&mut dyn Any> {
    slot.downcast_mut::<Vec<T>>()?
        .last_mut()
        .map(|item| item as &mut dyn Any)
}

/// A value that is either JSON `null` or a `T`.
///
/// Unlike `Option<T>`, which models a member that may be absent, a
/// `Nullable<T>` member is always written and reads `null` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullable<T> {
    #[default]
    Null,
    Value(T),
}

impl<T> Nullable<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Nullable::Null => None,
            Nullable::Value(value) => Some(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Null => None,
            Nullable::Value(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Nullable::Value(value),
            None => Nullable::Null,
        }
    }
}

/// Storage that holds at most one `Inner` and can be filled in place.
trait Wrap: Default + 'static {
    type Inner: Deserialize;

    /// Replaces the content with a default `Inner` and returns it.
    fn fill(&mut self) -> Option<&mut Self::Inner>;

    fn inner(&mut self) -> Option<&mut Self::Inner>;
}

impl<T: Deserialize> Wrap for Option<T> {
    type Inner = T;

    fn fill(&mut self) -> Option<&mut T> {
        Some(self.insert(T::default()))
    }

    fn inner(&mut self) -> Option<&mut T> {
        self.as_mut()
    }
}

impl<T: Deserialize> Wrap for Nullable<T> {
    type Inner = T;

    fn fill(&mut self) -> Option<&mut T> {
        *self = Nullable::Value(T::default());
        self.inner()
    }

    fn inner(&mut self) -> Option<&mut T> {
        match self {
            Nullable::Value(value) => Some(value),
            Nullable::Null => None,
        }
    }
}

impl<T: Deserialize> Wrap for Box<T> {
    type Inner = T;

    fn fill(&mut self) -> Option<&mut T> {
        **self = T::default();
        Some(&mut **self)
    }

    fn inner(&mut self) -> Option<&mut T> {
        Some(&mut **self)
    }
}

/// The inner type's slots, rerouted through the wrapper.
fn wrap_frame<W: Wrap>() -> Frame {
    let inner = <W::Inner as Deserialize>::build_frame();
    let mut frame = Frame::new();
    if inner.on_string.is_some() {
        frame.on_string = Some(set_wrapped::<W>);
    }
    if inner.on_number.is_some() {
        frame.on_number = Some(set_wrapped::<W>);
    }
    if inner.on_boolean.is_some() {
        frame.on_boolean = Some(set_wrapped::<W>);
    }
    if inner.on_null.is_some() {
        frame.on_null = Some(set_wrapped::<W>);
    }
    if inner.on_array_start.is_some() {
        frame.on_array_start = Some(open_wrapped::<W, { ARRAY }>);
    }
    if inner.on_object_start.is_some() {
        frame.on_object_start = Some(open_wrapped::<W, { OBJECT }>);
    }
    frame
}

const ARRAY: bool = true;
const OBJECT: bool = false;

fn set_wrapped<W: Wrap>(slot: &mut dyn Any, value: ScalarValue<'_>) -> Result<(), ParseError> {
    let setter = <W::Inner as Deserialize>::build_frame()
        .scalar_slot(value.event_kind())
        .ok_or(ParseError::TypeMismatch {
            found: value.kind(),
        })?;
    let inner = target::<W>(slot)?
        .fill()
        .ok_or(UnexpectedState::TargetMismatch)?;
    setter(inner, value)
}

fn open_wrapped<W: Wrap, const IS_ARRAY: bool>(slot: &mut dyn Any) -> Result<Frame, ParseError> {
    let event = if IS_ARRAY {
        EventKind::ArrayStart
    } else {
        EventKind::ObjectStart
    };
    let opener = <W::Inner as Deserialize>::build_frame()
        .opener_slot(event)
        .ok_or(ParseError::UnexpectedEvent { event })?;
    let inner = target::<W>(slot)?
        .fill()
        .ok_or(UnexpectedState::TargetMismatch)?;
    let frame = opener(inner)?;
    Ok(frame.entered_through(enter_wrapped::<W>))
}

fn enter_wrapped<W: Wrap>(slot: &mut dyn Any) -> Option<&mut dyn Any> {
    let inner = slot.downcast_mut::<W>()?.inner()?;
    <W::Inner as Deserialize>::enter(inner)
}

/// An absent member stays `None`; a present one must hold a `T`.
impl<T: Deserialize> Deserialize for Option<T> {
    const REQUIRED: bool = false;

    fn build_frame() -> Frame {
        wrap_frame::<Self>()
    }

    fn enter(slot: &mut dyn Any) -> Option<&mut dyn Any> {
        enter_wrapped::<Self>(slot)
    }
}

impl<T: Deserialize> Deserialize for Nullable<T> {
    fn build_frame() -> Frame {
        fn set_null<T: Deserialize>(
            slot: &mut dyn Any,
            _value: ScalarValue<'_>,
        ) -> Result<(), ParseError> {
            *target::<Nullable<T>>(slot)? = Nullable::Null;
            Ok(())
        }
        wrap_frame::<Self>().with_null(set_null::<T>)
    }

    fn enter(slot: &mut dyn Any) -> Option<&mut dyn Any> {
        enter_wrapped::<Self>(slot)
    }
}

impl<T: Deserialize> Deserialize for Box<T> {
    const REQUIRED: bool = T::REQUIRED;

    fn build_frame() -> Frame {
        wrap_frame::<Self>()
    }

    fn enter(slot: &mut dyn Any) -> Option<&mut dyn Any> {
        enter_wrapped::<Self>(slot)
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Object schemas: static field tables plus the `json_object!` macro that
//! declares them.

use core::any::Any;
use core::fmt::Write;

use crate::deserialize::target;
use crate::frame::{Field, Frame};
use crate::json_writer::{JsonWriter, WriteError};
use crate::parse_error::ParseError;

/// A type that reads and writes as a JSON object with a fixed member table.
pub trait ObjectSchema: Sized + 'static {
    /// Declared members, in the order they are written.
    const FIELDS: &'static [Field];

    /// Writes only the `"key":value` pairs, letting the caller own the
    /// braces. Composing types use this to flatten shared members.
    fn partial_write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError>;
}

/// Resets the target to its default and returns a frame over its members.
pub fn open_object<T: ObjectSchema + Default>(slot: &mut dyn Any) -> Result<Frame, ParseError> {
    *target::<T>(slot)? = T::default();
    Ok(Frame::object(T::FIELDS))
}

/// The frame for a value of object type `T`.
pub fn object_frame<T: ObjectSchema + Default>() -> Frame {
    Frame::new().with_object_start(open_object::<T>)
}

/// Declares a struct that reads and writes as a JSON object.
///
/// Each member is written `name: Type => "key"`. Members of type
/// `Option<T>` may be absent; every other member is required. The struct
/// must implement `Default`.
///
/// ```
/// use rpcjson::json_object;
///
/// json_object! {
///     #[derive(Debug, Default, PartialEq)]
///     pub struct Position {
///         pub line: u32 => "line",
///         pub character: u32 => "character",
///     }
/// }
///
/// let position: Position = rpcjson::from_str(r#"{"character":4,"line":2}"#).unwrap();
/// assert_eq!(position, Position { line: 2, character: 4 });
/// assert_eq!(rpcjson::to_string(&position).unwrap(), r#"{"line":2,"character":4}"#);
/// ```
#[macro_export]
macro_rules! json_object {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::ObjectSchema for $name {
            const FIELDS: &'static [$crate::Field] = &[
                $(
                    $crate::Field {
                        key: $key,
                        required: <$ty as $crate::Deserialize>::REQUIRED,
                        initializer: <$ty as $crate::Deserialize>::build_frame,
                        project: {
                            fn project(
                                target: &mut dyn ::core::any::Any,
                            ) -> ::core::option::Option<&mut dyn ::core::any::Any> {
                                target
                                    .downcast_mut::<$name>()
                                    .map(|this| &mut this.$field as &mut dyn ::core::any::Any)
                            }
                            project
                        },
                    },
                )*
            ];

            fn partial_write<W: ::core::fmt::Write>(
                &self,
                writer: &mut $crate::JsonWriter<W>,
            ) -> ::core::result::Result<(), $crate::WriteError> {
                $(
                    writer.field($key, &self.$field)?;
                )*
                ::core::result::Result::Ok(())
            }
        }

        impl $crate::Deserialize for $name {
            fn build_frame() -> $crate::Frame {
                $crate::object_frame::<$name>()
            }
        }

        impl $crate::Serialize for $name {
            fn write<W: ::core::fmt::Write>(
                &self,
                writer: &mut $crate::JsonWriter<W>,
            ) -> ::core::result::Result<(), $crate::WriteError> {
                writer.write_object(self)
            }
        }
    };
}

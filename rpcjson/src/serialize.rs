// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::deserialize::Nullable;
use crate::json_writer::{JsonWriter, WriteError};
use crate::scalar::{Number, ScalarValue};

/// A type that can write itself as JSON.
pub trait Serialize {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError>;

    /// True for unset optional members, which are left out of their object.
    fn is_absent(&self) -> bool {
        false
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
                    writer.emit(ScalarValue::Number(Number::Integer(i128::from(*self))))
                }
            }
        )*
    };
}

impl_integer!(i64, i32, u32, u64);

impl Serialize for f64 {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.emit(ScalarValue::Number(Number::Float(*self)))
    }
}

impl Serialize for bool {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.emit(ScalarValue::Boolean(*self))
    }
}

impl Serialize for str {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.emit(ScalarValue::from(self))
    }
}

impl Serialize for String {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        self.as_str().write(writer)
    }
}

impl Serialize for () {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.emit(ScalarValue::Null)
    }
}

impl<T: Serialize> Serialize for [T] {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        writer.open_array()?;
        for item in self {
            item.write(writer)?;
        }
        writer.close_array()
    }
}

impl<T: Serialize> Serialize for Vec<T> {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        self.as_slice().write(writer)
    }
}

/// `None` is only meaningful as an object member, where it is omitted.
impl<T: Serialize> Serialize for Option<T> {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        match self {
            Some(value) => value.write(writer),
            None => Err(WriteError::Unbalanced("absent value outside an object member")),
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        match self {
            Nullable::Value(value) => value.write(writer),
            Nullable::Null => writer.emit(ScalarValue::Null),
        }
    }
}

impl<T: Serialize + ?Sized> Serialize for Box<T> {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        (**self).write(writer)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Serialize + ?Sized> Serialize for &T {
    fn write<W: Write>(&self, writer: &mut JsonWriter<W>) -> Result<(), WriteError> {
        (**self).write(writer)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn write<T: Serialize + ?Sized>(value: &T) -> Result<String, WriteError> {
        let mut writer = JsonWriter::new(String::new());
        value.write(&mut writer)?;
        writer.finish()
    }

    #[test]
    fn scalars() {
        assert_eq!(write(&-3i32).unwrap(), "-3");
        assert_eq!(write(&u64::MAX).unwrap(), "18446744073709551615");
        assert_eq!(write(&2.0f64).unwrap(), "2.0");
        assert_eq!(write(&false).unwrap(), "false");
        assert_eq!(write("tab\t").unwrap(), r#""tab\t""#);
        assert_eq!(write(&()).unwrap(), "null");
    }

    #[test]
    fn containers() {
        assert_eq!(write(&vec![1i64, 2, 3]).unwrap(), "[1,2,3]");
        assert_eq!(write(&Vec::<bool>::new()).unwrap(), "[]");
        assert_eq!(
            write(&vec![Nullable::Value(1i64), Nullable::Null]).unwrap(),
            "[1,null]"
        );
        assert_eq!(write(&Box::new(String::from("b"))).unwrap(), r#""b""#);
    }

    #[test]
    fn absent_option() {
        assert!(None::<i64>.is_absent());
        assert!(!Some(1i64).is_absent());
        assert!(Box::new(None::<i64>).is_absent());
        assert!(write(&None::<i64>).is_err());

        let mut writer = JsonWriter::new(String::new());
        writer.open_object().unwrap();
        writer.field("a", &None::<i64>).unwrap();
        writer.field("b", &Some(2i64)).unwrap();
        writer.close_object().unwrap();
        assert_eq!(writer.finish().unwrap(), r#"{"b":2}"#);
    }
}

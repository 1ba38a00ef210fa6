use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::duration::IsoDuration;
use crate::error::{DecodeError, EncodeError};
use crate::node::ParseNode;
use crate::value::Value;
use crate::writer::SerializationWriter;

/// A type that can sit in a record field.
///
/// `read` returns `Ok(None)` for an explicit null. `write_absent` decides what
/// an unset field looks like on the wire: scalars and nested records emit
/// null, collections and enums are omitted.
pub trait FieldValue: Sized {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>, DecodeError>;

    fn write(
        &self,
        key: Option<&str>,
        writer: &mut dyn SerializationWriter,
    ) -> Result<(), EncodeError>;

    fn write_absent(
        key: Option<&str>,
        writer: &mut dyn SerializationWriter,
    ) -> Result<(), EncodeError> {
        writer.write_null_value(key)
    }
}

/// Writes one declared field, present or not.
pub fn write_field<T: FieldValue>(
    key: &str,
    value: &Option<T>,
    writer: &mut dyn SerializationWriter,
) -> Result<(), EncodeError> {
    match value {
        Some(value) => value.write(Some(key), writer),
        None => T::write_absent(Some(key), writer),
    }
}

/// A closed set of named values travelling as strings.
pub trait EnumValue: Sized + 'static {
    /// Type name used in decode errors.
    const NAME: &'static str;

    fn as_str(&self) -> &'static str;

    fn parse(value: &str) -> Option<Self>;
}

/// A wrapper for binary blobs to distinguish from `Vec<T>` collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteArray(pub Vec<u8>);

impl ByteArray {
    pub fn new(data: Vec<u8>) -> Self {
        ByteArray(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(v: Vec<u8>) -> Self {
        ByteArray(v)
    }
}

impl From<&[u8]> for ByteArray {
    fn from(v: &[u8]) -> Self {
        ByteArray(v.to_vec())
    }
}

macro_rules! impl_field_value {
    ($t:ty, $get:ident, $put:ident) => {
        impl FieldValue for $t {
            fn read(node: &dyn ParseNode) -> Result<Option<Self>, DecodeError> {
                if node.is_null() {
                    return Ok(None);
                }
                node.$get().map(Some)
            }

            fn write(
                &self,
                key: Option<&str>,
                writer: &mut dyn SerializationWriter,
            ) -> Result<(), EncodeError> {
                writer.$put(key, *self)
            }
        }
    };
}

impl_field_value!(bool, get_bool_value, write_bool_value);
impl_field_value!(u8, get_u8_value, write_u8_value);
impl_field_value!(i8, get_i8_value, write_i8_value);
impl_field_value!(i16, get_i16_value, write_i16_value);
impl_field_value!(i32, get_i32_value, write_i32_value);
impl_field_value!(i64, get_i64_value, write_i64_value);
impl_field_value!(f32, get_f32_value, write_f32_value);
impl_field_value!(f64, get_f64_value, write_f64_value);

macro_rules! impl_field_value_ref {
    ($t:ty, $get:ident, $put:ident) => {
        impl FieldValue for $t {
            fn read(node: &dyn ParseNode) -> Result<Option<Self>, DecodeError> {
                if node.is_null() {
                    return Ok(None);
                }
                node.$get().map(Some)
            }

            fn write(
                &self,
                key: Option<&str>,
                writer: &mut dyn SerializationWriter,
            ) -> Result<(), EncodeError> {
                writer.$put(key, self)
            }
        }
    };
}

impl_field_value_ref!(String, get_string_value, write_string_value);
impl_field_value_ref!(DateTime<FixedOffset>, get_date_time_value, write_date_time_value);
impl_field_value_ref!(NaiveDate, get_date_only_value, write_date_only_value);
impl_field_value_ref!(NaiveTime, get_time_only_value, write_time_only_value);
impl_field_value_ref!(IsoDuration, get_duration_value, write_duration_value);
impl_field_value_ref!(Value, get_untyped_value, write_untyped_value);

impl FieldValue for ByteArray {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>, DecodeError> {
        if node.is_null() {
            return Ok(None);
        }
        node.get_byte_array_value().map(|b| Some(ByteArray(b)))
    }

    fn write(
        &self,
        key: Option<&str>,
        writer: &mut dyn SerializationWriter,
    ) -> Result<(), EncodeError> {
        writer.write_byte_array_value(key, &self.0)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn read(node: &dyn ParseNode) -> Result<Option<Self>, DecodeError> {
        if node.is_null() {
            return Ok(None);
        }
        let mut out = Vec::new();
        for (index, element) in node.elements()?.iter().enumerate() {
            let item = T::read(element.as_ref()).map_err(|e| e.in_field(&index.to_string()))?;
            if let Some(item) = item {
                out.push(item);
            }
        }
        Ok(Some(out))
    }

    fn write(
        &self,
        key: Option<&str>,
        writer: &mut dyn SerializationWriter,
    ) -> Result<(), EncodeError> {
        writer.start_collection(key)?;
        for item in self {
            item.write(None, writer)?;
        }
        writer.end_collection()
    }

    fn write_absent(
        _key: Option<&str>,
        _writer: &mut dyn SerializationWriter,
    ) -> Result<(), EncodeError> {
        Ok(())
    }
}

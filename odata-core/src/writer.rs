use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat};

use crate::duration::IsoDuration;
use crate::error::EncodeError;
use crate::field::{EnumValue, FieldValue};
use crate::record::Serializable;
use crate::value::{AdditionalData, Value};

/// Write sink for records.
///
/// `key` is the property name when writing inside an object and `None` for
/// array elements or the top-level value. Every write may fail; callers stop
/// at the first error.
pub trait SerializationWriter {
    fn write_null_value(&mut self, key: Option<&str>) -> Result<(), EncodeError>;

    fn write_string_value(&mut self, key: Option<&str>, value: &str) -> Result<(), EncodeError>;

    fn write_bool_value(&mut self, key: Option<&str>, value: bool) -> Result<(), EncodeError>;

    fn write_i64_value(&mut self, key: Option<&str>, value: i64) -> Result<(), EncodeError>;

    fn write_f64_value(&mut self, key: Option<&str>, value: f64) -> Result<(), EncodeError>;

    fn write_byte_array_value(
        &mut self,
        key: Option<&str>,
        value: &[u8],
    ) -> Result<(), EncodeError>;

    fn start_object(&mut self, key: Option<&str>) -> Result<(), EncodeError>;

    fn end_object(&mut self) -> Result<(), EncodeError>;

    fn start_collection(&mut self, key: Option<&str>) -> Result<(), EncodeError>;

    fn end_collection(&mut self) -> Result<(), EncodeError>;

    fn write_i32_value(&mut self, key: Option<&str>, value: i32) -> Result<(), EncodeError> {
        self.write_i64_value(key, value.into())
    }

    fn write_i16_value(&mut self, key: Option<&str>, value: i16) -> Result<(), EncodeError> {
        self.write_i64_value(key, value.into())
    }

    fn write_i8_value(&mut self, key: Option<&str>, value: i8) -> Result<(), EncodeError> {
        self.write_i64_value(key, value.into())
    }

    fn write_u8_value(&mut self, key: Option<&str>, value: u8) -> Result<(), EncodeError> {
        self.write_i64_value(key, value.into())
    }

    fn write_f32_value(&mut self, key: Option<&str>, value: f32) -> Result<(), EncodeError> {
        self.write_f64_value(key, value.into())
    }

    fn write_date_time_value(
        &mut self,
        key: Option<&str>,
        value: &DateTime<FixedOffset>,
    ) -> Result<(), EncodeError> {
        self.write_string_value(key, &value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn write_date_only_value(
        &mut self,
        key: Option<&str>,
        value: &NaiveDate,
    ) -> Result<(), EncodeError> {
        self.write_string_value(key, &value.format("%Y-%m-%d").to_string())
    }

    fn write_time_only_value(
        &mut self,
        key: Option<&str>,
        value: &NaiveTime,
    ) -> Result<(), EncodeError> {
        self.write_string_value(key, &value.format("%H:%M:%S%.f").to_string())
    }

    fn write_duration_value(
        &mut self,
        key: Option<&str>,
        value: &IsoDuration,
    ) -> Result<(), EncodeError> {
        self.write_string_value(key, &value.to_string())
    }

    fn write_untyped_value(&mut self, key: Option<&str>, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.write_null_value(key),
            Value::Bool(b) => self.write_bool_value(key, *b),
            Value::Integer(i) => self.write_i64_value(key, *i),
            Value::Float(f) => self.write_f64_value(key, *f),
            Value::String(s) => self.write_string_value(key, s),
            Value::Bytes(b) => self.write_byte_array_value(key, b),
            Value::Array(items) => {
                self.start_collection(key)?;
                for item in items {
                    self.write_untyped_value(None, item)?;
                }
                self.end_collection()
            }
            Value::Object(map) => {
                self.start_object(key)?;
                for (k, v) in map {
                    self.write_untyped_value(Some(k), v)?;
                }
                self.end_object()
            }
        }
    }

    /// Writes the bag's entries as trailing properties of the current object.
    fn write_additional_data(&mut self, data: &AdditionalData) -> Result<(), EncodeError> {
        for (key, value) in data {
            self.write_untyped_value(Some(key), value)?;
        }
        Ok(())
    }
}

impl dyn SerializationWriter + '_ {
    /// Writes any field type.
    pub fn write_value<T: FieldValue>(
        &mut self,
        key: Option<&str>,
        value: &T,
    ) -> Result<(), EncodeError> {
        value.write(key, self)
    }

    /// Writes a nested record framed as an object.
    pub fn write_object_value<T: Serializable + ?Sized>(
        &mut self,
        key: Option<&str>,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.start_object(key)?;
        value.serialize(self)?;
        self.end_object()
    }

    pub fn write_collection_of_values<T: FieldValue>(
        &mut self,
        key: Option<&str>,
        values: &[T],
    ) -> Result<(), EncodeError> {
        self.start_collection(key)?;
        for value in values {
            value.write(None, self)?;
        }
        self.end_collection()
    }

    pub fn write_enum_value<E: EnumValue>(
        &mut self,
        key: Option<&str>,
        value: &E,
    ) -> Result<(), EncodeError> {
        self.write_string_value(key, value.as_str())
    }
}

/// Tree-shaped output a [`TreeBuilder`] can assemble.
pub(crate) trait TreeNode: Sized {
    fn array(items: Vec<Self>) -> Self;
    fn object(entries: Vec<(String, Self)>) -> Self;
}

enum Frame<V> {
    Object {
        key: Option<String>,
        entries: Vec<(String, V)>,
    },
    Array {
        key: Option<String>,
        items: Vec<V>,
    },
}

/// Shared framing logic of the in-memory writers.
pub(crate) struct TreeBuilder<V> {
    stack: Vec<Frame<V>>,
    root: Option<V>,
}

impl<V: TreeNode> TreeBuilder<V> {
    pub(crate) fn new() -> Self {
        TreeBuilder {
            stack: Vec::new(),
            root: None,
        }
    }

    fn check_key(&self, key: Option<&str>) -> Result<(), EncodeError> {
        match self.stack.last() {
            Some(Frame::Object { .. }) if key.is_none() => Err(EncodeError::MissingKey),
            None if self.root.is_some() => {
                Err(EncodeError::Unbalanced("more than one top-level value"))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn push(&mut self, key: Option<&str>, value: V) -> Result<(), EncodeError> {
        self.check_key(key)?;
        match self.stack.last_mut() {
            Some(Frame::Object { entries, .. }) => {
                let key = key.ok_or(EncodeError::MissingKey)?;
                entries.push((key.to_string(), value));
            }
            // Keys inside arrays are ignored.
            Some(Frame::Array { items, .. }) => items.push(value),
            None => self.root = Some(value),
        }
        Ok(())
    }

    pub(crate) fn start_object(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.check_key(key)?;
        self.stack.push(Frame::Object {
            key: key.map(str::to_string),
            entries: Vec::new(),
        });
        Ok(())
    }

    pub(crate) fn start_array(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.check_key(key)?;
        self.stack.push(Frame::Array {
            key: key.map(str::to_string),
            items: Vec::new(),
        });
        Ok(())
    }

    pub(crate) fn end_object(&mut self) -> Result<(), EncodeError> {
        match self.stack.pop() {
            Some(Frame::Object { key, entries }) => self.push(key.as_deref(), V::object(entries)),
            Some(frame) => {
                self.stack.push(frame);
                Err(EncodeError::Unbalanced("end_object inside a collection"))
            }
            None => Err(EncodeError::Unbalanced("end_object without start_object")),
        }
    }

    pub(crate) fn end_array(&mut self) -> Result<(), EncodeError> {
        match self.stack.pop() {
            Some(Frame::Array { key, items }) => self.push(key.as_deref(), V::array(items)),
            Some(frame) => {
                self.stack.push(frame);
                Err(EncodeError::Unbalanced("end_collection inside an object"))
            }
            None => Err(EncodeError::Unbalanced("end_collection without start_collection")),
        }
    }

    pub(crate) fn finish(self) -> Result<V, EncodeError> {
        if !self.stack.is_empty() {
            return Err(EncodeError::Unbalanced("unclosed object or collection"));
        }
        self.root.ok_or(EncodeError::Unbalanced("nothing was written"))
    }
}

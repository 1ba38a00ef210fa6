use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::duration::IsoDuration;
use crate::error::DecodeError;
use crate::field::{EnumValue, FieldValue};
use crate::record::{Parsable, parse_object};
use crate::value::Value;

/// Read cursor over one node of a decoded payload.
///
/// Backends implement the structural and primitive accessors; the narrowed
/// integer and date/time getters are provided on top of them.
pub trait ParseNode {
    fn is_null(&self) -> bool;

    /// Short name of the node's kind, used in error messages.
    fn kind(&self) -> &'static str;

    /// Returns the named child when this node is an object holding it.
    fn child(&self, name: &str) -> Option<Box<dyn ParseNode + '_>>;

    /// Returns the object's fields in payload order.
    fn fields(&self) -> Result<Vec<(String, Box<dyn ParseNode + '_>)>, DecodeError>;

    /// Returns the array's elements in payload order.
    fn elements(&self) -> Result<Vec<Box<dyn ParseNode + '_>>, DecodeError>;

    fn get_string_value(&self) -> Result<String, DecodeError>;

    fn get_bool_value(&self) -> Result<bool, DecodeError>;

    fn get_i64_value(&self) -> Result<i64, DecodeError>;

    fn get_f64_value(&self) -> Result<f64, DecodeError>;

    fn get_byte_array_value(&self) -> Result<Vec<u8>, DecodeError>;

    /// Converts the node, whatever its shape, into an untyped [`Value`].
    fn get_untyped_value(&self) -> Result<Value, DecodeError>;

    fn get_i32_value(&self) -> Result<i32, DecodeError> {
        narrow(self.get_i64_value()?, "i32")
    }

    fn get_i16_value(&self) -> Result<i16, DecodeError> {
        narrow(self.get_i64_value()?, "i16")
    }

    fn get_i8_value(&self) -> Result<i8, DecodeError> {
        narrow(self.get_i64_value()?, "i8")
    }

    fn get_u8_value(&self) -> Result<u8, DecodeError> {
        narrow(self.get_i64_value()?, "u8")
    }

    /// Rejects finite values beyond the `f32` range instead of rounding them
    /// to infinity.
    fn get_f32_value(&self) -> Result<f32, DecodeError> {
        let value = self.get_f64_value()?;
        let narrowed = value as f32;
        if value.is_finite() && !narrowed.is_finite() {
            return Err(DecodeError::OutOfRange {
                value: value.to_string(),
                target: "f32",
            });
        }
        Ok(narrowed)
    }

    /// RFC 3339 timestamp.
    fn get_date_time_value(&self) -> Result<DateTime<FixedOffset>, DecodeError> {
        let raw = self.get_string_value()?;
        DateTime::parse_from_rfc3339(&raw).map_err(|_| DecodeError::InvalidLiteral {
            kind: "date-time",
            value: raw,
        })
    }

    /// `YYYY-MM-DD`.
    fn get_date_only_value(&self) -> Result<NaiveDate, DecodeError> {
        let raw = self.get_string_value()?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| DecodeError::InvalidLiteral {
            kind: "date",
            value: raw,
        })
    }

    /// `HH:MM:SS` with optional fractional seconds.
    fn get_time_only_value(&self) -> Result<NaiveTime, DecodeError> {
        let raw = self.get_string_value()?;
        NaiveTime::parse_from_str(&raw, "%H:%M:%S%.f").map_err(|_| DecodeError::InvalidLiteral {
            kind: "time",
            value: raw,
        })
    }

    fn get_duration_value(&self) -> Result<IsoDuration, DecodeError> {
        self.get_string_value()?.parse()
    }
}

fn narrow<T: TryFrom<i64>>(value: i64, target: &'static str) -> Result<T, DecodeError> {
    T::try_from(value).map_err(|_| DecodeError::OutOfRange {
        value: value.to_string(),
        target,
    })
}

impl dyn ParseNode + '_ {
    /// Reads any field type; `Ok(None)` for null.
    pub fn get_value<T: FieldValue>(&self) -> Result<Option<T>, DecodeError> {
        T::read(self)
    }

    /// Decodes a nested record through its type's factory.
    pub fn get_object_value<T: Parsable>(&self) -> Result<Option<T>, DecodeError> {
        parse_object(self)
    }

    /// Decodes a homogeneous array, skipping null elements.
    pub fn get_collection_of_values<T: FieldValue>(&self) -> Result<Option<Vec<T>>, DecodeError> {
        Vec::<T>::read(self)
    }

    /// Decodes an enum from its wire name.
    pub fn get_enum_value<E: EnumValue>(&self) -> Result<Option<E>, DecodeError> {
        if self.is_null() {
            return Ok(None);
        }
        let raw = self.get_string_value()?;
        match E::parse(&raw) {
            Some(value) => Ok(Some(value)),
            None => Err(DecodeError::UnknownEnumValue {
                enum_name: E::NAME,
                value: raw,
            }),
        }
    }
}

//! JSON backend over `serde_json`.
//!
//! Byte arrays travel as standard base64 strings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::{DecodeError, EncodeError};
use crate::node::ParseNode;
use crate::record::{Parsable, Serializable, parse_object};
use crate::value::Value;
use crate::writer::{SerializationWriter, TreeBuilder, TreeNode};

/// Read cursor over a borrowed `serde_json::Value`.
pub struct JsonParseNode<'a> {
    value: &'a JsonValue,
}

impl<'a> JsonParseNode<'a> {
    pub fn new(value: &'a JsonValue) -> Self {
        JsonParseNode { value }
    }

    fn boxed(value: &'a JsonValue) -> Box<dyn ParseNode + 'a> {
        Box::new(JsonParseNode { value })
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn untyped(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            // u64 beyond i64::MAX and real numbers
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(untyped).collect()),
        JsonValue::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), untyped(v)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

impl ParseNode for JsonParseNode<'_> {
    fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn kind(&self) -> &'static str {
        kind_of(self.value)
    }

    fn child(&self, name: &str) -> Option<Box<dyn ParseNode + '_>> {
        self.value.as_object()?.get(name).map(Self::boxed)
    }

    fn fields(&self) -> Result<Vec<(String, Box<dyn ParseNode + '_>)>, DecodeError> {
        match self.value {
            JsonValue::Object(map) => {
                Ok(map.iter().map(|(k, v)| (k.clone(), Self::boxed(v))).collect())
            }
            other => Err(DecodeError::mismatch("object", kind_of(other))),
        }
    }

    fn elements(&self) -> Result<Vec<Box<dyn ParseNode + '_>>, DecodeError> {
        match self.value {
            JsonValue::Array(items) => Ok(items.iter().map(Self::boxed).collect()),
            other => Err(DecodeError::mismatch("array", kind_of(other))),
        }
    }

    fn get_string_value(&self) -> Result<String, DecodeError> {
        match self.value {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(DecodeError::mismatch("string", kind_of(other))),
        }
    }

    fn get_bool_value(&self) -> Result<bool, DecodeError> {
        match self.value {
            JsonValue::Bool(b) => Ok(*b),
            other => Err(DecodeError::mismatch("boolean", kind_of(other))),
        }
    }

    fn get_i64_value(&self) -> Result<i64, DecodeError> {
        match self.value {
            JsonValue::Number(n) if n.is_f64() => Err(DecodeError::mismatch("integer", "float")),
            JsonValue::Number(n) => n.as_i64().ok_or_else(|| DecodeError::OutOfRange {
                value: n.to_string(),
                target: "i64",
            }),
            other => Err(DecodeError::mismatch("integer", kind_of(other))),
        }
    }

    fn get_f64_value(&self) -> Result<f64, DecodeError> {
        match self.value {
            JsonValue::Number(n) => n.as_f64().ok_or_else(|| DecodeError::OutOfRange {
                value: n.to_string(),
                target: "f64",
            }),
            other => Err(DecodeError::mismatch("number", kind_of(other))),
        }
    }

    fn get_byte_array_value(&self) -> Result<Vec<u8>, DecodeError> {
        let raw = self.get_string_value()?;
        STANDARD.decode(&raw).map_err(|_| DecodeError::InvalidLiteral {
            kind: "base64",
            value: raw,
        })
    }

    fn get_untyped_value(&self) -> Result<Value, DecodeError> {
        Ok(untyped(self.value))
    }
}

impl TreeNode for JsonValue {
    fn array(items: Vec<Self>) -> Self {
        JsonValue::Array(items)
    }

    fn object(entries: Vec<(String, Self)>) -> Self {
        JsonValue::Object(entries.into_iter().collect::<Map<_, _>>())
    }
}

/// Builds a `serde_json::Value` tree from sink calls.
pub struct JsonSerializationWriter {
    tree: TreeBuilder<JsonValue>,
}

impl JsonSerializationWriter {
    pub fn new() -> Self {
        JsonSerializationWriter {
            tree: TreeBuilder::new(),
        }
    }

    /// Returns the written value; fails if framing is unbalanced.
    pub fn into_value(self) -> Result<JsonValue, EncodeError> {
        self.tree.finish()
    }
}

impl Default for JsonSerializationWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializationWriter for JsonSerializationWriter {
    fn write_null_value(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.tree.push(key, JsonValue::Null)
    }

    fn write_string_value(&mut self, key: Option<&str>, value: &str) -> Result<(), EncodeError> {
        self.tree.push(key, JsonValue::String(value.to_string()))
    }

    fn write_bool_value(&mut self, key: Option<&str>, value: bool) -> Result<(), EncodeError> {
        self.tree.push(key, JsonValue::Bool(value))
    }

    fn write_i64_value(&mut self, key: Option<&str>, value: i64) -> Result<(), EncodeError> {
        self.tree.push(key, JsonValue::Number(value.into()))
    }

    fn write_f64_value(&mut self, key: Option<&str>, value: f64) -> Result<(), EncodeError> {
        let number = Number::from_f64(value).ok_or_else(|| EncodeError::NonFiniteFloat {
            key: key.map(str::to_string),
        })?;
        self.tree.push(key, JsonValue::Number(number))
    }

    fn write_byte_array_value(
        &mut self,
        key: Option<&str>,
        value: &[u8],
    ) -> Result<(), EncodeError> {
        self.tree.push(key, JsonValue::String(STANDARD.encode(value)))
    }

    fn start_object(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.tree.start_object(key)
    }

    fn end_object(&mut self) -> Result<(), EncodeError> {
        self.tree.end_object()
    }

    fn start_collection(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.tree.start_array(key)
    }

    fn end_collection(&mut self) -> Result<(), EncodeError> {
        self.tree.end_array()
    }
}

/// Decodes `T` from an already parsed JSON value. A top-level `null` is a
/// type mismatch.
pub fn from_value<T: Parsable>(value: &JsonValue) -> Result<T, DecodeError> {
    let node = JsonParseNode::new(value);
    parse_object(&node)?.ok_or_else(|| DecodeError::mismatch("object", "null"))
}

pub fn from_slice<T: Parsable>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    from_value(&value)
}

pub fn from_str<T: Parsable>(s: &str) -> Result<T, DecodeError> {
    from_slice(s.as_bytes())
}

pub fn to_value<T: Serializable + ?Sized>(record: &T) -> Result<JsonValue, EncodeError> {
    let mut writer = JsonSerializationWriter::new();
    (&mut writer as &mut dyn SerializationWriter).write_object_value(None, record)?;
    writer.into_value()
}

pub fn to_vec<T: Serializable + ?Sized>(record: &T) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(&to_value(record)?)?)
}

pub fn to_string<T: Serializable + ?Sized>(record: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(&to_value(record)?)?)
}

pub fn to_string_pretty<T: Serializable + ?Sized>(record: &T) -> Result<String, EncodeError> {
    Ok(serde_json::to_string_pretty(&to_value(record)?)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::duration::IsoDuration;
    use crate::field::{ByteArray, FieldValue};

    fn node(value: &JsonValue) -> JsonParseNode<'_> {
        JsonParseNode::new(value)
    }

    #[test]
    fn narrows_integers() {
        let big = json!(70000);
        let n = node(&big);
        assert_eq!(n.get_i32_value().unwrap(), 70000);
        assert!(matches!(n.get_i16_value(), Err(DecodeError::OutOfRange { target: "i16", .. })));
        assert!(matches!(n.get_u8_value(), Err(DecodeError::OutOfRange { .. })));
    }

    #[test]
    fn integer_rejects_float() {
        let v = json!(1.5);
        assert!(matches!(
            node(&v).get_i64_value(),
            Err(DecodeError::TypeMismatch { expected: "integer", found: "float" })
        ));
        assert_eq!(node(&v).get_f64_value().unwrap(), 1.5);
    }

    #[test]
    fn f32_rejects_values_beyond_its_range() {
        let v = json!(1e300);
        assert!(matches!(
            node(&v).get_f32_value(),
            Err(DecodeError::OutOfRange { target: "f32", .. })
        ));
        let v = json!(-2.5);
        assert_eq!(node(&v).get_f32_value().unwrap(), -2.5);
    }

    #[test]
    fn reads_dates_and_durations() {
        let v = json!("2024-03-01T10:15:30.5+02:00");
        let dt = node(&v).get_date_time_value().unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);

        let v = json!("2024-03-01");
        assert_eq!(node(&v).get_date_only_value().unwrap().to_string(), "2024-03-01");

        let v = json!("23:05:00");
        assert_eq!(node(&v).get_time_only_value().unwrap().to_string(), "23:05:00");

        let v = json!("PT1H");
        assert_eq!(node(&v).get_duration_value().unwrap().hours, 1);

        let v = json!("yesterday");
        assert!(matches!(
            node(&v).get_date_time_value(),
            Err(DecodeError::InvalidLiteral { kind: "date-time", .. })
        ));
    }

    #[test]
    fn byte_arrays_are_base64() {
        let v = json!("aGVsbG8=");
        let bytes = ByteArray::read(&node(&v)).unwrap().unwrap();
        assert_eq!(bytes.as_bytes(), b"hello");

        let v = json!("not base64!");
        assert!(ByteArray::read(&node(&v)).is_err());

        let mut writer = JsonSerializationWriter::new();
        bytes.write(None, &mut writer).unwrap();
        assert_eq!(writer.into_value().unwrap(), json!("aGVsbG8="));
    }

    #[test]
    fn collections_skip_null_elements() {
        let v = json!(["a", null, "b"]);
        let items = Vec::<String>::read(&node(&v)).unwrap().unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn collection_errors_carry_index() {
        let v = json!([1, "two"]);
        let err = Vec::<i32>::read(&node(&v)).unwrap_err();
        assert_eq!(err.field_path().as_deref(), Some("1"));
    }

    #[test]
    fn untyped_preserves_shape() {
        let v = json!({"n": 1, "f": 2.5, "big": u64::MAX, "list": [true, null], "o": {"s": "x"}});
        let value = node(&v).get_untyped_value().unwrap();
        assert_eq!(value.get("n"), Some(&Value::Integer(1)));
        assert_eq!(value.get("f"), Some(&Value::Float(2.5)));
        assert_eq!(value.get("big"), Some(&Value::Float(u64::MAX as f64)));
        assert_eq!(
            value.get("list"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
        );
        assert_eq!(value.get("o").and_then(|o| o.get("s")), Some(&Value::from("x")));
    }

    #[test]
    fn writer_rejects_non_finite_floats() {
        let mut writer = JsonSerializationWriter::new();
        writer.start_object(None).unwrap();
        let err = writer.write_f64_value(Some("ratio"), f64::NAN).unwrap_err();
        assert!(matches!(err, EncodeError::NonFiniteFloat { key: Some(k) } if k == "ratio"));
    }

    #[test]
    fn writer_emits_scalars_in_order() {
        let mut writer = JsonSerializationWriter::new();
        let sink: &mut dyn SerializationWriter = &mut writer;
        sink.start_object(None).unwrap();
        sink.write_string_value(Some("name"), "x").unwrap();
        sink.write_i32_value(Some("count"), 3).unwrap();
        sink.write_null_value(Some("missing")).unwrap();
        sink.write_duration_value(Some("ttl"), &"PT5M".parse::<IsoDuration>().unwrap())
            .unwrap();
        sink.write_collection_of_values(Some("tags"), &["a".to_string()]).unwrap();
        sink.end_object().unwrap();

        let out = serde_json::to_string(&writer.into_value().unwrap()).unwrap();
        assert_eq!(out, r#"{"name":"x","count":3,"missing":null,"ttl":"PT5M","tags":["a"]}"#);
    }
}

//! CBOR backend over `ciborium`.
//!
//! Byte arrays travel as native byte strings; base64 text is accepted on
//! input. Semantic tags are unwrapped when reading.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ciborium::value::{Integer, Value as CborValue};

use crate::error::{DecodeError, EncodeError};
use crate::node::ParseNode;
use crate::record::{Parsable, Serializable, parse_object};
use crate::value::{AdditionalData, Value};
use crate::writer::{SerializationWriter, TreeBuilder, TreeNode};

fn untag(mut value: &CborValue) -> &CborValue {
    while let CborValue::Tag(_, inner) = value {
        value = &**inner;
    }
    value
}

fn kind_of(value: &CborValue) -> &'static str {
    match untag(value) {
        CborValue::Null => "null",
        CborValue::Bool(_) => "boolean",
        CborValue::Integer(_) => "integer",
        CborValue::Float(_) => "float",
        CborValue::Text(_) => "string",
        CborValue::Bytes(_) => "bytes",
        CborValue::Array(_) => "array",
        CborValue::Map(_) => "object",
        _ => "unknown",
    }
}

fn untyped(value: &CborValue) -> Result<Value, DecodeError> {
    Ok(match untag(value) {
        CborValue::Null => Value::Null,
        CborValue::Bool(b) => Value::Bool(*b),
        CborValue::Integer(i) => {
            let wide = i128::from(*i);
            match i64::try_from(wide) {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::Float(wide as f64),
            }
        }
        CborValue::Float(f) => Value::Float(*f),
        CborValue::Text(s) => Value::String(s.clone()),
        CborValue::Bytes(b) => Value::Bytes(b.clone()),
        CborValue::Array(items) => {
            Value::Array(items.iter().map(untyped).collect::<Result<_, _>>()?)
        }
        CborValue::Map(entries) => {
            let mut map = AdditionalData::new();
            for (k, v) in entries {
                map.insert(text_key(k)?.to_string(), untyped(v)?);
            }
            Value::Object(map)
        }
        other => return Err(DecodeError::mismatch("value", kind_of(other))),
    })
}

fn text_key(key: &CborValue) -> Result<&str, DecodeError> {
    match untag(key) {
        CborValue::Text(s) => Ok(s),
        other => Err(DecodeError::mismatch("string key", kind_of(other))),
    }
}

/// Read cursor over a borrowed `ciborium::Value`.
pub struct CborParseNode<'a> {
    value: &'a CborValue,
}

impl<'a> CborParseNode<'a> {
    pub fn new(value: &'a CborValue) -> Self {
        CborParseNode { value: untag(value) }
    }

    fn boxed(value: &'a CborValue) -> Box<dyn ParseNode + 'a> {
        Box::new(CborParseNode::new(value))
    }
}

impl ParseNode for CborParseNode<'_> {
    fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn kind(&self) -> &'static str {
        kind_of(self.value)
    }

    fn child(&self, name: &str) -> Option<Box<dyn ParseNode + '_>> {
        match self.value {
            CborValue::Map(entries) => entries
                .iter()
                .find(|(k, _)| matches!(untag(k), CborValue::Text(s) if s == name))
                .map(|(_, v)| Self::boxed(v)),
            _ => None,
        }
    }

    fn fields(&self) -> Result<Vec<(String, Box<dyn ParseNode + '_>)>, DecodeError> {
        match self.value {
            CborValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| Ok((text_key(k)?.to_string(), Self::boxed(v))))
                .collect(),
            other => Err(DecodeError::mismatch("object", kind_of(other))),
        }
    }

    fn elements(&self) -> Result<Vec<Box<dyn ParseNode + '_>>, DecodeError> {
        match self.value {
            CborValue::Array(items) => Ok(items.iter().map(Self::boxed).collect()),
            other => Err(DecodeError::mismatch("array", kind_of(other))),
        }
    }

    fn get_string_value(&self) -> Result<String, DecodeError> {
        match self.value {
            CborValue::Text(s) => Ok(s.clone()),
            other => Err(DecodeError::mismatch("string", kind_of(other))),
        }
    }

    fn get_bool_value(&self) -> Result<bool, DecodeError> {
        match self.value {
            CborValue::Bool(b) => Ok(*b),
            other => Err(DecodeError::mismatch("boolean", kind_of(other))),
        }
    }

    fn get_i64_value(&self) -> Result<i64, DecodeError> {
        match self.value {
            CborValue::Integer(i) => i64::try_from(*i).map_err(|_| DecodeError::OutOfRange {
                value: i128::from(*i).to_string(),
                target: "i64",
            }),
            other => Err(DecodeError::mismatch("integer", kind_of(other))),
        }
    }

    fn get_f64_value(&self) -> Result<f64, DecodeError> {
        match self.value {
            CborValue::Float(f) => Ok(*f),
            CborValue::Integer(i) => Ok(i128::from(*i) as f64),
            other => Err(DecodeError::mismatch("number", kind_of(other))),
        }
    }

    fn get_byte_array_value(&self) -> Result<Vec<u8>, DecodeError> {
        match self.value {
            CborValue::Bytes(b) => Ok(b.clone()),
            CborValue::Text(s) => STANDARD.decode(s).map_err(|_| DecodeError::InvalidLiteral {
                kind: "base64",
                value: s.clone(),
            }),
            other => Err(DecodeError::mismatch("bytes", kind_of(other))),
        }
    }

    fn get_untyped_value(&self) -> Result<Value, DecodeError> {
        untyped(self.value)
    }
}

impl TreeNode for CborValue {
    fn array(items: Vec<Self>) -> Self {
        CborValue::Array(items)
    }

    fn object(entries: Vec<(String, Self)>) -> Self {
        CborValue::Map(entries.into_iter().map(|(k, v)| (CborValue::Text(k), v)).collect())
    }
}

/// Builds a `ciborium::Value` tree from sink calls.
pub struct CborSerializationWriter {
    tree: TreeBuilder<CborValue>,
}

impl CborSerializationWriter {
    pub fn new() -> Self {
        CborSerializationWriter {
            tree: TreeBuilder::new(),
        }
    }

    pub fn into_value(self) -> Result<CborValue, EncodeError> {
        self.tree.finish()
    }
}

impl Default for CborSerializationWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializationWriter for CborSerializationWriter {
    fn write_null_value(&mut self, key: Option<&str>) -> Result<(), EncodeError> {
        self.tree.push(key, CborValue::Null)
    }

    fn write_string_value(&mut self, key: Option<&str>, value: &str) -> Result<(), EncodeError> {
        self.tree.push(key, CborValue::Text(value.to_string()))
    }

    fn write_bool_value(&mut self, key: Option<&str>, value: bool) -> Result<(), EncodeError> {
        self.tree.push(key, CborValue::Bool(value))
    }

    fn write_i64_value(&mut self, key: Option<&str>, value: i64) -> Result<(), EncodeError> {
        self.tree.push(key, CborValue::Integer(Integer::from(value)))
    }

    fn write_f64_value(&mut self, key: Option<&str>, value: f64) -> Result<(), EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteFloat {
                key: key.map(str::to_string),
            });
        }
        self.tree.push(key, CborValue::Float(value))
    }

    fn write_byte_array_value(
        &mut self,
        key: Option<&str>,
        value: &[u8],
    ) -> Result<(), EncodeError> {
        self.tree.push(key, CborValue::Bytes(value.to_vec()))
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

pub fn from_value<T: Parsable>(value: &CborValue) -> Result<T, DecodeError> {
    let node = CborParseNode::new(value);
    parse_object(&node)?.ok_or_else(|| DecodeError::mismatch("object", "null"))
}

pub fn from_slice<T: Parsable>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: CborValue =
        ciborium::de::from_reader(bytes).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    from_value(&value)
}

pub fn to_value<T: Serializable + ?Sized>(record: &T) -> Result<CborValue, EncodeError> {
    let mut writer = CborSerializationWriter::new();
    (&mut writer as &mut dyn SerializationWriter).write_object_value(None, record)?;
    writer.into_value()
}

pub fn to_vec<T: Serializable + ?Sized>(record: &T) -> Result<Vec<u8>, EncodeError> {
    let value = to_value(record)?;
    let mut out = Vec::new();
    ciborium::ser::into_writer(&value, &mut out).map_err(|e| EncodeError::Cbor(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CborValue {
        CborValue::Text(s.to_string())
    }

    #[test]
    fn tags_are_unwrapped() {
        let tagged = CborValue::Tag(0, Box::new(text("2024-01-01T00:00:00Z")));
        let node = CborParseNode::new(&tagged);
        assert_eq!(node.kind(), "string");
        assert_eq!(node.get_date_time_value().unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn byte_arrays_accept_bytes_or_base64() {
        let bytes = CborValue::Bytes(b"hi".to_vec());
        assert_eq!(CborParseNode::new(&bytes).get_byte_array_value().unwrap(), b"hi");
        let b64 = text("aGk=");
        assert_eq!(CborParseNode::new(&b64).get_byte_array_value().unwrap(), b"hi");
    }

    #[test]
    fn child_lookup_and_fields() {
        let map = CborValue::Map(vec![
            (text("a"), CborValue::Integer(Integer::from(1))),
            (text("b"), CborValue::Null),
        ]);
        let node = CborParseNode::new(&map);
        assert_eq!(node.child("a").unwrap().get_i32_value().unwrap(), 1);
        assert!(node.child("b").unwrap().is_null());
        assert!(node.child("c").is_none());
        let names: Vec<String> = node.fields().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn non_text_keys_are_rejected() {
        let map = CborValue::Map(vec![(CborValue::Integer(Integer::from(1)), CborValue::Null)]);
        assert!(CborParseNode::new(&map).fields().is_err());
    }

    #[test]
    fn untyped_keeps_bytes() {
        let map = CborValue::Map(vec![(text("blob"), CborValue::Bytes(vec![1, 2]))]);
        let value = CborParseNode::new(&map).get_untyped_value().unwrap();
        assert_eq!(value.get("blob"), Some(&Value::Bytes(vec![1, 2])));
    }
}

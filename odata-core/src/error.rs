use thiserror::Error;

/// Error raised while reading a payload into a record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {value} out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error("invalid {kind} literal: {value:?}")]
    InvalidLiteral { kind: &'static str, value: String },
    #[error("unknown {enum_name} value: {value:?}")]
    UnknownEnumValue {
        enum_name: &'static str,
        value: String,
    },
    #[error("field {field:?}: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<DecodeError>,
    },
    #[error("malformed payload: {0}")]
    Syntax(String),
}

impl DecodeError {
    pub(crate) fn mismatch(expected: &'static str, found: &'static str) -> Self {
        DecodeError::TypeMismatch { expected, found }
    }

    /// Wraps this error with the name of the field being decoded.
    pub fn in_field(self, field: &str) -> Self {
        DecodeError::Field {
            field: field.to_string(),
            source: Box::new(self),
        }
    }

    /// Returns the dotted field path leading to the innermost error, if any.
    pub fn field_path(&self) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self;
        while let DecodeError::Field { field, source } = current {
            segments.push(field.as_str());
            current = source;
        }
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("."))
        }
    }
}

/// Error raised while writing a record to a sink.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("non-finite float for {key:?}")]
    NonFiniteFloat { key: Option<String> },
    #[error("unbalanced writer state: {0}")]
    Unbalanced(&'static str),
    #[error("value written into an object without a key")]
    MissingKey,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CBOR error: {0}")]
    Cbor(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_joins_nested_fields() {
        let err = DecodeError::mismatch("string", "number")
            .in_field("displayName")
            .in_field("createdBy");
        assert_eq!(err.field_path().as_deref(), Some("createdBy.displayName"));
    }

    #[test]
    fn field_path_absent_without_context() {
        let err = DecodeError::Syntax("eof".to_string());
        assert!(err.field_path().is_none());
    }
}

//! Typed record marshaling for OData payloads.
//!
//! Core concepts:
//! - **Record**: a type with optional declared fields plus an additional-data
//!   bag holding whatever the payload carried that the type does not declare
//! - **Field deserializer table**: wire name to decoder, built ancestors first
//! - **Family**: a sum type standing for a polymorphic root; its factory picks
//!   the concrete record from the payload's `@odata.type`
//! - **ParseNode / SerializationWriter**: the read cursor and write sink the
//!   JSON and CBOR backends implement
//!
//! # Example
//!
//! ```
//! use odata_core::{AdditionalData, AdditionalDataHolder, json, model};
//!
//! #[model]
//! pub struct Note {
//!     #[odata(rename = "@odata.type")]
//!     odata_type: Option<String>,
//!     text: Option<String>,
//!     #[odata(additional_data)]
//!     additional_data: AdditionalData,
//! }
//!
//! let note: Note = json::from_str(r#"{"text": "hi", "pinned": true}"#).unwrap();
//! assert_eq!(note.text(), Some("hi"));
//! assert!(note.additional_data().contains_key("pinned"));
//!
//! let out = json::to_string(&note).unwrap();
//! assert_eq!(out, r#"{"@odata.type":null,"text":"hi","pinned":true}"#);
//! ```

extern crate self as odata_core;

pub mod cbor;
mod duration;
mod error;
mod field;
pub mod json;
mod node;
mod record;
mod value;
mod writer;

pub use duration::IsoDuration;
pub use error::{DecodeError, EncodeError};
pub use field::{ByteArray, EnumValue, FieldValue, write_field};
pub use node::ParseNode;
pub use record::{
    AdditionalDataHolder, FieldDeserializer, FieldDeserializers, ODATA_TYPE, Parsable, Record,
    Serializable, deserialize_record, discriminator_value, parse_object, type_tag_value,
    unknown_discriminator,
};
pub use value::{AdditionalData, Value};
pub use writer::SerializationWriter;

#[cfg(feature = "derive")]
pub use odata_derive::{Parsable, model};

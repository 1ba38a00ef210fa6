use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{DecodeError, EncodeError};
use crate::node::ParseNode;
use crate::value::AdditionalData;
use crate::writer::SerializationWriter;

/// Wire name of the discriminator property.
pub const ODATA_TYPE: &str = "@odata.type";

/// Access to the free-form fields a record carries beside its declared ones.
pub trait AdditionalDataHolder {
    fn additional_data(&self) -> &AdditionalData;

    fn additional_data_mut(&mut self) -> &mut AdditionalData;

    fn set_additional_data(&mut self, data: AdditionalData) {
        *self.additional_data_mut() = data;
    }
}

/// A value that writes itself as the members of an object.
pub trait Serializable: AdditionalDataHolder {
    /// Writes the declared fields of the whole inheritance chain, ancestors
    /// first, without the additional-data bag.
    fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<(), EncodeError>;

    /// Writes the declared fields followed by the bag.
    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<(), EncodeError> {
        self.serialize_fields(writer)?;
        writer.write_additional_data(self.additional_data())
    }
}

/// A value that can be constructed from a payload.
pub trait Parsable: Serializable + Sized {
    /// Chooses the concrete type to instantiate for `node`.
    ///
    /// Plain records ignore the node. Polymorphic families inspect its
    /// `@odata.type` and fall back to their base type for anything they do
    /// not recognise.
    fn create_from_discriminator_value(node: Option<&dyn ParseNode>) -> Self;

    /// Assigns every field present in `node`, capturing unknown ones into
    /// the bag.
    fn deserialize_fields(&mut self, node: &dyn ParseNode) -> Result<(), DecodeError>;

    /// Name of the concrete record type.
    fn type_name(&self) -> &'static str;
}

/// A concrete record with a field-deserializer table.
pub trait Record: Parsable + 'static {
    fn field_deserializers() -> FieldDeserializers<Self>;
}

/// Decodes one wire field into a record.
pub type FieldDeserializer<T> = Box<dyn Fn(&mut T, &dyn ParseNode) -> Result<(), DecodeError>>;

/// Wire field name to decoder, in composition order (ancestors first).
pub struct FieldDeserializers<T> {
    entries: IndexMap<&'static str, FieldDeserializer<T>>,
}

impl<T: 'static> FieldDeserializers<T> {
    pub fn new() -> Self {
        FieldDeserializers {
            entries: IndexMap::new(),
        }
    }

    /// Lifts a base record's table onto a derived record that embeds it.
    pub fn inherit<B: 'static>(base: FieldDeserializers<B>, project: fn(&mut T) -> &mut B) -> Self {
        let entries = base
            .entries
            .into_iter()
            .map(|(name, deserialize)| {
                let lifted: FieldDeserializer<T> =
                    Box::new(move |record: &mut T, node: &dyn ParseNode| {
                        deserialize(project(record), node)
                    });
                (name, lifted)
            })
            .collect();
        FieldDeserializers { entries }
    }

    /// Adds a field, replacing an inherited entry of the same name in place.
    pub fn insert<F>(&mut self, name: &'static str, deserialize: F)
    where
        F: Fn(&mut T, &dyn ParseNode) -> Result<(), DecodeError> + 'static,
    {
        self.entries.insert(name, Box::new(deserialize));
    }

    pub fn get(&self, name: &str) -> Option<&FieldDeserializer<T>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: 'static> Default for FieldDeserializers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The generic decode loop behind every record's `deserialize_fields`.
///
/// Known names go through the record's table; anything else lands in the
/// bag. Stops at the first failing field, leaving earlier fields assigned.
pub fn deserialize_record<T: Record>(
    record: &mut T,
    node: &dyn ParseNode,
) -> Result<(), DecodeError> {
    let table = T::field_deserializers();
    for (name, child) in node.fields()? {
        match table.get(&name) {
            Some(deserialize) => {
                deserialize(record, child.as_ref()).map_err(|e| e.in_field(&name))?
            }
            None => {
                trace!(field = %name, record = record.type_name(), "captured into additional data");
                let value = child.get_untyped_value().map_err(|e| e.in_field(&name))?;
                record.additional_data_mut().insert(name, value);
            }
        }
    }
    Ok(())
}

/// Decodes a record or family from `node`; `Ok(None)` for null.
pub fn parse_object<T: Parsable>(node: &dyn ParseNode) -> Result<Option<T>, DecodeError> {
    if node.is_null() {
        return Ok(None);
    }
    let mut record = T::create_from_discriminator_value(Some(node));
    record.deserialize_fields(node)?;
    Ok(Some(record))
}

/// Reads the `@odata.type` tag of `node`, if it is present and a string.
pub fn discriminator_value(node: Option<&dyn ParseNode>) -> Option<String> {
    let child = node?.child(ODATA_TYPE)?;
    type_tag_value(child.as_ref())
}

/// Reads a discriminator property itself. Anything but a string reads as
/// absent, so a malformed tag never fails a decode.
pub fn type_tag_value(node: &dyn ParseNode) -> Option<String> {
    if node.is_null() {
        return None;
    }
    match node.get_string_value() {
        Ok(tag) => Some(tag),
        Err(_) => {
            debug!(kind = node.kind(), "ignoring non-string discriminator");
            None
        }
    }
}

#[doc(hidden)]
pub fn unknown_discriminator(family: &'static str, tag: &str) {
    debug!(family, tag, "unknown discriminator, using base type");
}

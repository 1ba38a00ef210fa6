//! Model families the tool can decode, and the generic plumbing behind them.

use clap::ValueEnum;
use graph_models::{
    AppListItem, AppListItemable, BaseItemVersion, BaseItemVersionable, DeviceConfiguration,
    DeviceConfigurationable, DirectoryObject, DirectoryObjectable, IpRange, IpRangeable,
    ListItemVersion, ListItemVersionable, ManagedAppPolicy, ManagedAppPolicyable,
    WindowsInformationProtection, WindowsInformationProtectionable,
};
use odata_core::{Parsable, Record, Serializable, cbor, json};

use crate::error::ToolError;
use crate::format::Format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    BaseItemVersion,
    ListItemVersion,
    DirectoryObject,
    DeviceConfiguration,
    WindowsInformationProtection,
    AppListItem,
    ManagedAppPolicy,
    IpRange,
}

/// A payload decoded through a family.
pub struct Decoded {
    pub type_name: &'static str,
    pub record: Box<dyn Serializable>,
}

impl Decoded {
    pub fn additional_keys(&self) -> Vec<&str> {
        self.record.additional_data().keys().map(String::as_str).collect()
    }
}

impl Kind {
    pub fn decode(self, bytes: &[u8], format: Format) -> Result<Decoded, ToolError> {
        match self {
            Kind::BaseItemVersion => decode_as::<BaseItemVersionable>(bytes, format),
            Kind::ListItemVersion => decode_as::<ListItemVersionable>(bytes, format),
            Kind::DirectoryObject => decode_as::<DirectoryObjectable>(bytes, format),
            Kind::DeviceConfiguration => decode_as::<DeviceConfigurationable>(bytes, format),
            Kind::WindowsInformationProtection => {
                decode_as::<WindowsInformationProtectionable>(bytes, format)
            }
            Kind::AppListItem => decode_as::<AppListItemable>(bytes, format),
            Kind::ManagedAppPolicy => decode_as::<ManagedAppPolicyable>(bytes, format),
            Kind::IpRange => decode_as::<IpRangeable>(bytes, format),
        }
    }

    /// Wire names of the family's base record, in composition order.
    pub fn fields(self) -> Vec<&'static str> {
        match self {
            Kind::BaseItemVersion => field_names::<BaseItemVersion>(),
            Kind::ListItemVersion => field_names::<ListItemVersion>(),
            Kind::DirectoryObject => field_names::<DirectoryObject>(),
            Kind::DeviceConfiguration => field_names::<DeviceConfiguration>(),
            Kind::WindowsInformationProtection => field_names::<WindowsInformationProtection>(),
            Kind::AppListItem => field_names::<AppListItem>(),
            Kind::ManagedAppPolicy => field_names::<ManagedAppPolicy>(),
            Kind::IpRange => field_names::<IpRange>(),
        }
    }
}

fn decode_as<T: Parsable + 'static>(bytes: &[u8], format: Format) -> Result<Decoded, ToolError> {
    let record: T = match format {
        Format::Json => json::from_slice(bytes)?,
        Format::Cbor => cbor::from_slice(bytes)?,
    };
    Ok(Decoded {
        type_name: record.type_name(),
        record: Box::new(record),
    })
}

fn field_names<T: Record>() -> Vec<&'static str> {
    T::field_deserializers().names().collect()
}

/// Encodes a decoded record; JSON output is text, CBOR output is binary.
pub fn encode(
    record: &dyn Serializable,
    format: Format,
    pretty: bool,
) -> Result<Vec<u8>, ToolError> {
    let bytes = match format {
        Format::Json if pretty => json::to_string_pretty(record)?.into_bytes(),
        Format::Json => json::to_vec(record)?,
        Format::Cbor => cbor::to_vec(record)?,
    };
    Ok(bytes)
}

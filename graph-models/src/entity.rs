use odata_core::{AdditionalData, model};

/// Root of every addressable Graph resource.
#[model]
pub struct Entity {
    /// The unique identifier for an entity. Read-only.
    id: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
pub struct Identity {
    display_name: Option<String>,
    id: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

/// The actors (application, device, user) associated with an action.
#[model]
pub struct IdentitySet {
    application: Option<Identity>,
    device: Option<Identity>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    user: Option<Identity>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
pub struct PublicationFacet {
    /// `published` or `checkout`.
    level: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    version_id: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

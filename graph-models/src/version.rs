use chrono::{DateTime, FixedOffset};
use odata_core::{AdditionalData, ByteArray, model};

use crate::entity::{Entity, IdentitySet, PublicationFacet};

#[model]
pub struct BaseItemVersion {
    #[odata(base)]
    entity: Entity,
    last_modified_by: Option<IdentitySet>,
    last_modified_date_time: Option<DateTime<FixedOffset>>,
    publication: Option<PublicationFacet>,
}

#[model]
#[odata(type_tag = "#microsoft.graph.driveItemVersion")]
pub struct DriveItemVersion {
    #[odata(base)]
    base: BaseItemVersion,
    content: Option<ByteArray>,
    size: Option<i64>,
}

/// Column values of a list item; every column lands in the additional data.
#[model]
pub struct FieldValueSet {
    #[odata(base)]
    entity: Entity,
}

#[model]
#[odata(type_tag = "#microsoft.graph.listItemVersion")]
pub struct ListItemVersion {
    #[odata(base)]
    base: BaseItemVersion,
    fields: Option<FieldValueSet>,
}

#[model]
#[odata(type_tag = "#microsoft.graph.documentSetVersion")]
pub struct DocumentSetVersion {
    #[odata(base)]
    base: ListItemVersion,
    comment: Option<String>,
    created_by: Option<IdentitySet>,
    created_date_time: Option<DateTime<FixedOffset>>,
    items: Option<Vec<DocumentSetVersionItem>>,
    should_capture_minor_version: Option<bool>,
}

#[model]
pub struct DocumentSetVersionItem {
    item_id: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    title: Option<String>,
    version_id: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
pub enum BaseItemVersionable {
    #[odata(fallback)]
    BaseItemVersion(BaseItemVersion),
    DocumentSetVersion(DocumentSetVersion),
    DriveItemVersion(DriveItemVersion),
    ListItemVersion(ListItemVersion),
}

#[model]
pub enum ListItemVersionable {
    #[odata(fallback)]
    ListItemVersion(ListItemVersion),
    DocumentSetVersion(DocumentSetVersion),
}

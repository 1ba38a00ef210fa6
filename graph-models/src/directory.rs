use chrono::{DateTime, FixedOffset};
use odata_core::{AdditionalData, ByteArray, model};

use crate::entity::Entity;

#[model]
pub struct DirectoryObject {
    #[odata(base)]
    entity: Entity,
    /// Date and time when this object was deleted. Always null when the
    /// object hasn't been deleted.
    deleted_date_time: Option<DateTime<FixedOffset>>,
}

/// An application registration.
#[model]
#[odata(type_tag = "#microsoft.graph.application")]
pub struct Application {
    #[odata(base)]
    base: DirectoryObject,
    app_id: Option<String>,
    created_date_time: Option<DateTime<FixedOffset>>,
    description: Option<String>,
    display_name: Option<String>,
    identifier_uris: Option<Vec<String>>,
    is_fallback_public_client: Option<bool>,
    key_credentials: Option<Vec<KeyCredential>>,
    logo: Option<ByteArray>,
    notes: Option<String>,
    owners: Option<Vec<DirectoryObjectable>>,
    publisher_domain: Option<String>,
    sign_in_audience: Option<String>,
    tags: Option<Vec<String>>,
    token_encryption_key_id: Option<String>,
}

#[model]
pub struct KeyCredential {
    custom_key_identifier: Option<ByteArray>,
    display_name: Option<String>,
    end_date_time: Option<DateTime<FixedOffset>>,
    key: Option<ByteArray>,
    key_id: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    start_date_time: Option<DateTime<FixedOffset>>,
    /// `AsymmetricX509Cert` or `X509CertAndPassword`.
    r#type: Option<String>,
    /// `Verify` or `Sign`.
    usage: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

/// The instance of an application in a tenant.
#[model]
#[odata(type_tag = "#microsoft.graph.servicePrincipal")]
pub struct ServicePrincipal {
    #[odata(base)]
    base: DirectoryObject,
    account_enabled: Option<bool>,
    app_display_name: Option<String>,
    app_id: Option<String>,
    app_role_assignment_required: Option<bool>,
    display_name: Option<String>,
    homepage: Option<String>,
    key_credentials: Option<Vec<KeyCredential>>,
    notification_email_addresses: Option<Vec<String>>,
    owners: Option<Vec<DirectoryObjectable>>,
    reply_urls: Option<Vec<String>>,
    service_principal_names: Option<Vec<String>>,
    service_principal_type: Option<String>,
    tags: Option<Vec<String>>,
}

#[model]
pub enum DirectoryObjectable {
    #[odata(fallback)]
    DirectoryObject(DirectoryObject),
    Application(Application),
    ServicePrincipal(ServicePrincipal),
}

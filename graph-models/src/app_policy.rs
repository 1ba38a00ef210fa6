use chrono::{DateTime, FixedOffset};
use odata_core::{AdditionalData, ByteArray, IsoDuration, model};

use crate::entity::Entity;

#[model]
pub struct ManagedAppPolicy {
    #[odata(base)]
    entity: Entity,
    created_date_time: Option<DateTime<FixedOffset>>,
    description: Option<String>,
    display_name: Option<String>,
    last_modified_date_time: Option<DateTime<FixedOffset>>,
    version: Option<String>,
}

#[model]
#[odata(type_tag = "#microsoft.graph.managedAppProtection")]
pub struct ManagedAppProtection {
    #[odata(base)]
    base: ManagedAppPolicy,
    minimum_required_os_version: Option<String>,
    period_offline_before_access_check: Option<IsoDuration>,
    period_online_before_access_check: Option<IsoDuration>,
    pin_required: Option<bool>,
}

#[model]
pub enum WindowsInformationProtectionEnforcementLevel {
    NoProtection,
    EncryptAndAuditOnly,
    EncryptAuditAndPrompt,
    EncryptAuditAndBlock,
}

#[model]
pub struct IpRange {
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
#[odata(type_tag = "#microsoft.graph.iPv4Range")]
pub struct Ipv4Range {
    #[odata(base)]
    base: IpRange,
    lower_address: Option<String>,
    upper_address: Option<String>,
}

#[model]
#[odata(type_tag = "#microsoft.graph.iPv6Range")]
pub struct Ipv6Range {
    #[odata(base)]
    base: IpRange,
    lower_address: Option<String>,
    upper_address: Option<String>,
}

#[model]
pub enum IpRangeable {
    #[odata(fallback)]
    IpRange(IpRange),
    Ipv4Range(Ipv4Range),
    Ipv6Range(Ipv6Range),
}

#[model]
pub struct WindowsInformationProtectionIpRangeCollection {
    display_name: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    ranges: Option<Vec<IpRangeable>>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
pub struct WindowsInformationProtectionResourceCollection {
    display_name: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    resources: Option<Vec<String>>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
pub struct WindowsInformationProtectionDataRecoveryCertificate {
    certificate: Option<ByteArray>,
    description: Option<String>,
    expiration_date_time: Option<DateTime<FixedOffset>>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    subject_name: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

/// An app allowed or exempted by a protection policy.
#[model]
pub struct WindowsInformationProtectionApp {
    /// Blocks rather than allows the app when set.
    denied: Option<bool>,
    description: Option<String>,
    display_name: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    product_name: Option<String>,
    publisher_name: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
#[odata(type_tag = "#microsoft.graph.windowsInformationProtectionDesktopApp")]
pub struct WindowsInformationProtectionDesktopApp {
    #[odata(base)]
    base: WindowsInformationProtectionApp,
    binary_name: Option<String>,
    binary_version_high: Option<String>,
    binary_version_low: Option<String>,
}

#[model]
#[odata(type_tag = "#microsoft.graph.windowsInformationProtectionStoreApp")]
pub struct WindowsInformationProtectionStoreApp {
    #[odata(base)]
    base: WindowsInformationProtectionApp,
}

#[model]
pub enum WindowsInformationProtectionAppable {
    #[odata(fallback)]
    WindowsInformationProtectionApp(WindowsInformationProtectionApp),
    WindowsInformationProtectionDesktopApp(WindowsInformationProtectionDesktopApp),
    WindowsInformationProtectionStoreApp(WindowsInformationProtectionStoreApp),
}

/// Policy shared by the MDM and MAM flavours of Windows Information Protection.
#[model]
#[odata(type_tag = "#microsoft.graph.windowsInformationProtection")]
pub struct WindowsInformationProtection {
    #[odata(base)]
    base: ManagedAppPolicy,
    azure_rights_management_services_allowed: Option<bool>,
    data_recovery_certificate: Option<WindowsInformationProtectionDataRecoveryCertificate>,
    enforcement_level: Option<WindowsInformationProtectionEnforcementLevel>,
    enterprise_domain: Option<String>,
    #[odata(rename = "enterpriseIPRanges")]
    enterprise_ip_ranges: Option<Vec<WindowsInformationProtectionIpRangeCollection>>,
    #[odata(rename = "enterpriseIPRangesAreAuthoritative")]
    enterprise_ip_ranges_are_authoritative: Option<bool>,
    enterprise_protected_domain_names: Option<Vec<WindowsInformationProtectionResourceCollection>>,
    exempt_apps: Option<Vec<WindowsInformationProtectionAppable>>,
    icons_visible: Option<bool>,
    is_assigned: Option<bool>,
    protected_apps: Option<Vec<WindowsInformationProtectionAppable>>,
    revoke_on_unenroll_disabled: Option<bool>,
    rights_management_services_template_id: Option<String>,
}

#[model]
#[odata(type_tag = "#microsoft.graph.windowsInformationProtectionPolicy")]
pub struct WindowsInformationProtectionPolicy {
    #[odata(base)]
    base: WindowsInformationProtection,
    days_without_contact_before_unenroll: Option<i32>,
    mdm_enrollment_url: Option<String>,
    minutes_of_inactivity_before_device_lock: Option<i32>,
    number_of_past_pins_remembered: Option<i32>,
    password_maximum_attempt_count: Option<i32>,
    pin_expiration_days: Option<i32>,
    pin_minimum_length: Option<i32>,
    windows_hello_for_business_blocked: Option<bool>,
}

#[model]
#[odata(type_tag = "#microsoft.graph.mdmWindowsInformationProtectionPolicy")]
pub struct MdmWindowsInformationProtectionPolicy {
    #[odata(base)]
    base: WindowsInformationProtection,
}

#[model]
pub enum WindowsInformationProtectionable {
    #[odata(fallback)]
    WindowsInformationProtection(WindowsInformationProtection),
    MdmWindowsInformationProtectionPolicy(MdmWindowsInformationProtectionPolicy),
    WindowsInformationProtectionPolicy(WindowsInformationProtectionPolicy),
}

#[model]
pub enum ManagedAppPolicyable {
    #[odata(fallback)]
    ManagedAppPolicy(ManagedAppPolicy),
    ManagedAppProtection(ManagedAppProtection),
    MdmWindowsInformationProtectionPolicy(MdmWindowsInformationProtectionPolicy),
    WindowsInformationProtection(WindowsInformationProtection),
    WindowsInformationProtectionPolicy(WindowsInformationProtectionPolicy),
}

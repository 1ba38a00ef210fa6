use chrono::{DateTime, FixedOffset, NaiveTime};
use odata_core::{AdditionalData, model};

use crate::entity::Entity;

/// Device configuration profile shared by every platform.
#[model]
pub struct DeviceConfiguration {
    #[odata(base)]
    entity: Entity,
    created_date_time: Option<DateTime<FixedOffset>>,
    description: Option<String>,
    display_name: Option<String>,
    last_modified_date_time: Option<DateTime<FixedOffset>>,
    version: Option<i32>,
}

#[model]
pub enum AndroidWorkProfileRequiredPasswordType {
    DeviceDefault,
    LowSecurityBiometric,
    Required,
    AtLeastNumeric,
    NumericComplex,
    AtLeastAlphabetic,
    AtLeastAlphanumeric,
    AlphanumericWithSymbols,
}

#[model]
pub enum AndroidWorkProfileCrossProfileDataSharingType {
    DeviceDefault,
    PreventAny,
    AllowPersonalToWork,
    NoRestrictions,
}

#[model]
#[odata(type_tag = "#microsoft.graph.androidWorkProfileGeneralDeviceConfiguration")]
pub struct AndroidWorkProfileGeneralDeviceConfiguration {
    #[odata(base)]
    base: DeviceConfiguration,
    password_block_fingerprint_unlock: Option<bool>,
    password_expiration_days: Option<i32>,
    password_minimum_length: Option<i32>,
    password_required_type: Option<AndroidWorkProfileRequiredPasswordType>,
    security_require_verify_apps: Option<bool>,
    work_profile_block_camera: Option<bool>,
    work_profile_data_sharing_type: Option<AndroidWorkProfileCrossProfileDataSharingType>,
    work_profile_password_minimum_length: Option<i32>,
    work_profile_require_password: Option<bool>,
}

/// Which apps a compliance list refers to.
#[model]
pub enum AppListType {
    None,
    AppsInListCompliant,
    AppsNotInListCompliant,
}

/// An app in a device configuration list.
#[model]
pub struct AppListItem {
    app_id: Option<String>,
    app_store_url: Option<String>,
    name: Option<String>,
    #[odata(rename = "@odata.type")]
    odata_type: Option<String>,
    publisher: Option<String>,
    #[odata(additional_data)]
    additional_data: AdditionalData,
}

#[model]
#[odata(type_tag = "#microsoft.graph.appleAppListItem")]
pub struct AppleAppListItem {
    #[odata(base)]
    base: AppListItem,
}

#[model]
pub enum AppListItemable {
    #[odata(fallback)]
    AppListItem(AppListItem),
    AppleAppListItem(AppleAppListItem),
}

#[model]
#[odata(type_tag = "#microsoft.graph.iosGeneralDeviceConfiguration")]
pub struct IosGeneralDeviceConfiguration {
    #[odata(base)]
    base: DeviceConfiguration,
    account_block_modification: Option<bool>,
    apps_single_app_mode_list: Option<Vec<AppListItemable>>,
    apps_visibility_list: Option<Vec<AppListItemable>>,
    apps_visibility_list_type: Option<AppListType>,
    camera_blocked: Option<bool>,
    compliant_app_list_type: Option<AppListType>,
    email_in_domain_suffixes: Option<Vec<String>>,
    i_cloud_block_backup: Option<bool>,
    kiosk_mode_app_store_url: Option<String>,
    passcode_minimum_length: Option<i32>,
    passcode_required: Option<bool>,
    safari_managed_domains: Option<Vec<String>>,
}

#[model]
pub enum DefenderCloudBlockLevelType {
    NotConfigured,
    High,
    HighPlus,
    ZeroTolerance,
}

#[model]
#[odata(type_tag = "#microsoft.graph.windows10GeneralConfiguration")]
pub struct Windows10GeneralConfiguration {
    #[odata(base)]
    base: DeviceConfiguration,
    bluetooth_blocked: Option<bool>,
    camera_blocked: Option<bool>,
    defender_cloud_block_level: Option<DefenderCloudBlockLevelType>,
    defender_file_extensions_to_exclude: Option<Vec<String>>,
    /// Percentage of CPU a scan may use, 0 to 100.
    defender_scan_max_cpu: Option<i32>,
    defender_scheduled_quick_scan_time: Option<NaiveTime>,
    defender_scheduled_scan_time: Option<NaiveTime>,
    defender_signature_update_interval_in_hours: Option<i32>,
    edge_homepage_urls: Option<Vec<String>>,
    lock_screen_timeout_in_seconds: Option<i32>,
    password_minimum_length: Option<i32>,
    password_required: Option<bool>,
    usb_blocked: Option<bool>,
    wi_fi_scan_interval: Option<i32>,
}

#[model]
pub enum DeviceConfigurationable {
    #[odata(fallback)]
    DeviceConfiguration(DeviceConfiguration),
    AndroidWorkProfileGeneralDeviceConfiguration(AndroidWorkProfileGeneralDeviceConfiguration),
    IosGeneralDeviceConfiguration(IosGeneralDeviceConfiguration),
    Windows10GeneralConfiguration(Windows10GeneralConfiguration),
}

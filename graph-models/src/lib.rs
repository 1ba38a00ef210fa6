//! Graph resource models: records, enumerations and polymorphic families
//! for a slice of the Microsoft Graph surface, decoded and encoded through
//! `odata-core`.

pub mod app_policy;
pub mod device;
pub mod directory;
pub mod entity;
pub mod version;

pub use app_policy::{
    IpRange, IpRangeable, Ipv4Range, Ipv6Range, ManagedAppPolicy, ManagedAppPolicyable,
    ManagedAppProtection, MdmWindowsInformationProtectionPolicy, WindowsInformationProtection,
    WindowsInformationProtectionApp, WindowsInformationProtectionAppable,
    WindowsInformationProtectionDataRecoveryCertificate, WindowsInformationProtectionDesktopApp,
    WindowsInformationProtectionEnforcementLevel, WindowsInformationProtectionIpRangeCollection,
    WindowsInformationProtectionPolicy, WindowsInformationProtectionResourceCollection,
    WindowsInformationProtectionStoreApp, WindowsInformationProtectionable,
};
pub use device::{
    AndroidWorkProfileCrossProfileDataSharingType, AndroidWorkProfileGeneralDeviceConfiguration,
    AndroidWorkProfileRequiredPasswordType, AppListItem, AppListItemable, AppListType,
    AppleAppListItem, DefenderCloudBlockLevelType, DeviceConfiguration, DeviceConfigurationable,
    IosGeneralDeviceConfiguration, Windows10GeneralConfiguration,
};
pub use directory::{
    Application, DirectoryObject, DirectoryObjectable, KeyCredential, ServicePrincipal,
};
pub use entity::{Entity, Identity, IdentitySet, PublicationFacet};
pub use version::{
    BaseItemVersion, BaseItemVersionable, DocumentSetVersion, DocumentSetVersionItem,
    DriveItemVersion, FieldValueSet, ListItemVersion, ListItemVersionable,
};

#[cfg(test)]
mod tests {
    use odata_core::{EnumValue, Record};

    use super::*;

    #[test]
    fn tables_list_ancestor_fields_first() {
        let names: Vec<_> = <DocumentSetVersion as Record>::field_deserializers().names().collect();
        assert_eq!(
            names,
            [
                "id",
                "@odata.type",
                "lastModifiedBy",
                "lastModifiedDateTime",
                "publication",
                "fields",
                "comment",
                "createdBy",
                "createdDateTime",
                "items",
                "shouldCaptureMinorVersion",
            ]
        );
    }

    #[test]
    fn renamed_wire_names() {
        let table = <WindowsInformationProtection as Record>::field_deserializers();
        assert!(table.contains("enterpriseIPRanges"));
        assert!(table.contains("enterpriseIPRangesAreAuthoritative"));
        assert!(!table.contains("enterpriseIpRanges"));

        let table = <IosGeneralDeviceConfiguration as Record>::field_deserializers();
        assert!(table.contains("iCloudBlockBackup"));

        let table = <KeyCredential as Record>::field_deserializers();
        assert!(table.contains("type"));
    }

    #[test]
    fn new_stamps_type_tag() {
        assert_eq!(DirectoryObject::new().odata_type(), None);
        assert_eq!(Application::new().odata_type(), Some("#microsoft.graph.application"));
        assert_eq!(
            WindowsInformationProtectionPolicy::new().odata_type(),
            Some("#microsoft.graph.windowsInformationProtectionPolicy")
        );
        assert_eq!(Ipv4Range::ODATA_TYPE, Some("#microsoft.graph.iPv4Range"));
    }

    #[test]
    fn enum_wire_names() {
        assert_eq!(AppListType::AppsInListCompliant.as_str(), "appsInListCompliant");
        assert_eq!(AppListType::parse("none"), Some(AppListType::None));
        assert_eq!(
            WindowsInformationProtectionEnforcementLevel::EncryptAuditAndBlock.to_string(),
            "encryptAuditAndBlock"
        );
        assert_eq!(DefenderCloudBlockLevelType::parse("HighPlus"), None);
    }
}

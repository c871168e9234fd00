//! Option validation

use crate::plan::kinds::*;
use crate::plan::options::OptionSet;
use thiserror::Error;
use url::Url;

/// Reasons an option set cannot become a build plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required option: {0}")]
    MissingRequiredField(&'static str),

    #[error("{field} must be a positive integer, got '{value}'")]
    InvalidNumericField { field: &'static str, value: String },

    #[error("invalid {field} '{value}' (allowed: {})", .allowed.join(", "))]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("no disk format given: pass --qcow2 or --raw")]
    MissingDiskFormat,

    #[error("sourceURL is not a valid URL: '{0}'")]
    InvalidUrl(String),

    #[error("{field} must not contain whitespace, got '{value}'")]
    InvalidIdentifier { field: &'static str, value: String },
}

/// Options that passed validation. Optional fields are still unset here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOptions {
    pub source_url: String,
    pub storage_id: String,
    pub vm_id: u32,
    pub vm_name: Option<String>,
    pub network_bridge: Option<String>,
    pub bios_mode: Option<BiosMode>,
    pub disk_format: DiskFormat,
    pub machine_type: Option<MachineType>,
    pub scsi_controller: Option<ScsiController>,
    pub disk_device: Option<DiskDevice>,
    pub display_type: Option<DisplayType>,

    pub is_rhel_derivative: bool,
    pub disable_selinux: bool,
    pub selinux_relabel: bool,
    pub qemu_permissive: bool,
    pub update_packages: bool,
    pub no_cache: bool,
    pub cleanup_cache: bool,
    pub assume_yes: bool,
}

/// Treat blank answers the same as absent ones.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Only a missing or empty name counts as absent; whitespace is sanitized later.
fn name_given(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ValidationError> {
    present(value)
        .map(str::to_string)
        .ok_or(ValidationError::MissingRequiredField(field))
}

fn optional_kind<K: Kind>(value: &Option<String>) -> Result<Option<K>, ValidationError> {
    present(value).map(K::parse_field).transpose()
}

pub(crate) fn check_url(raw: &str) -> Result<(), ValidationError> {
    match Url::parse(raw) {
        Ok(url) if url.has_host() => Ok(()),
        _ => Err(ValidationError::InvalidUrl(raw.to_string())),
    }
}

fn check_identifier(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse_vm_id(raw: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidNumericField {
        field: "vmID",
        value: raw.to_string(),
    };

    // u32::from_str alone would accept a leading '+'
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match raw.parse::<u32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(id) => Ok(id),
    }
}

/// Check an option set. Pure; stops at the first problem found.
pub fn validate(options: &OptionSet) -> Result<ValidatedOptions, ValidationError> {
    let source_url = required(&options.source_url, "sourceURL")?;
    check_url(&source_url)?;

    let storage_id = required(&options.storage_id, "storageID")?;
    check_identifier("storageID", &storage_id)?;

    let vm_id = parse_vm_id(&required(&options.vm_id, "vmID")?)?;

    let disk_format = match present(&options.disk_format) {
        Some(raw) => DiskFormat::parse_field(raw)?,
        None => return Err(ValidationError::MissingDiskFormat),
    };

    let network_bridge = present(&options.network_bridge).map(str::to_string);
    if let Some(bridge) = &network_bridge {
        check_identifier("networkBridge", bridge)?;
    }

    Ok(ValidatedOptions {
        source_url,
        storage_id,
        vm_id,
        vm_name: name_given(&options.vm_name),
        network_bridge,
        bios_mode: optional_kind(&options.bios_mode)?,
        disk_format,
        machine_type: optional_kind(&options.machine_type)?,
        scsi_controller: optional_kind(&options.scsi_controller)?,
        disk_device: optional_kind(&options.disk_device)?,
        display_type: optional_kind(&options.display_type)?,
        is_rhel_derivative: options.is_rhel_derivative,
        disable_selinux: options.disable_selinux,
        selinux_relabel: options.selinux_relabel,
        qemu_permissive: options.qemu_permissive,
        update_packages: options.update_packages,
        no_cache: options.no_cache,
        cleanup_cache: options.cleanup_cache,
        assume_yes: options.assume_yes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> OptionSet {
        OptionSet {
            source_url: Some("https://cloud.debian.org/images/cloud/bookworm/debian-12.qcow2".into()),
            storage_id: Some("local-lvm".into()),
            vm_id: Some("101".into()),
            disk_format: Some("qcow2".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_set_validates() {
        let v = validate(&base()).unwrap();
        assert_eq!(v.vm_id, 101);
        assert_eq!(v.disk_format, DiskFormat::Qcow2);
        assert_eq!(v.bios_mode, None);
        assert_eq!(v.vm_name, None);
    }

    #[test]
    fn test_missing_required_fields() {
        let cases: [(fn(&mut OptionSet), &str); 3] = [
            (|o| o.source_url = None, "sourceURL"),
            (|o| o.storage_id = None, "storageID"),
            (|o| o.vm_id = None, "vmID"),
        ];
        for (clear, field) in cases {
            let mut options = base();
            clear(&mut options);
            assert_eq!(
                validate(&options),
                Err(ValidationError::MissingRequiredField(field))
            );
        }
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut options = base();
        options.storage_id = Some("   ".into());
        assert_eq!(
            validate(&options),
            Err(ValidationError::MissingRequiredField("storageID"))
        );
    }

    #[test]
    fn test_non_numeric_vm_id() {
        for bad in ["abc", "10a", "-5", "+5", "1.0", "0", "99999999999"] {
            let mut options = base();
            options.vm_id = Some(bad.into());
            assert!(
                matches!(
                    validate(&options),
                    Err(ValidationError::InvalidNumericField { field: "vmID", .. })
                ),
                "vmID {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_disk_format_is_distinct() {
        let mut options = base();
        options.disk_format = None;
        assert_eq!(validate(&options), Err(ValidationError::MissingDiskFormat));
    }

    #[test]
    fn test_invalid_enum_values_name_the_field() {
        let cases: [(fn(&mut OptionSet), &str); 6] = [
            (|o| o.disk_format = Some("vmdk".into()), "diskFormat"),
            (|o| o.bios_mode = Some("coreboot".into()), "biosMode"),
            (|o| o.machine_type = Some("virt".into()), "machineType"),
            (|o| o.scsi_controller = Some("ahci".into()), "scsiController"),
            (|o| o.disk_device = Some("nvme".into()), "diskDevice"),
            (|o| o.display_type = Some("cirrus".into()), "displayType"),
        ];
        for (set, expected) in cases {
            let mut options = base();
            set(&mut options);
            match validate(&options) {
                Err(ValidationError::InvalidEnumValue { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidEnumValue for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_vm_name_keeps_whitespace() {
        let mut options = base();
        options.vm_name = Some(" my template! ".into());
        assert_eq!(validate(&options).unwrap().vm_name.as_deref(), Some(" my template! "));

        options.vm_name = Some("   ".into());
        assert_eq!(validate(&options).unwrap().vm_name.as_deref(), Some("   "));

        options.vm_name = Some(String::new());
        assert_eq!(validate(&options).unwrap().vm_name, None);
    }

    #[test]
    fn test_invalid_url() {
        let mut options = base();
        options.source_url = Some("debian-12.qcow2".into());
        assert!(matches!(validate(&options), Err(ValidationError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_message_lists_allowed_values() {
        let mut options = base();
        options.machine_type = Some("virt".into());
        let message = validate(&options).unwrap_err().to_string();
        assert_eq!(message, "invalid machineType 'virt' (allowed: pc-i440fx, q35)");
    }
}

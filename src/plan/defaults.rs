//! Defaults for options the operator left unset

use crate::plan::kinds::*;
use crate::plan::validate::ValidatedOptions;
use crate::utils::system::today;
use chrono::NaiveDate;

pub const DEFAULT_BRIDGE: &str = "vmbr0";

/// Fully populated options, ready to become a [`crate::plan::BuildPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultedOptions {
    pub source_url: String,
    pub storage_id: String,
    pub vm_id: u32,
    pub vm_name: String,
    pub network_bridge: String,
    pub bios_mode: BiosMode,
    pub disk_format: DiskFormat,
    pub machine_type: MachineType,
    pub scsi_controller: ScsiController,
    pub disk_device: DiskDevice,
    pub display_type: DisplayType,

    pub is_rhel_derivative: bool,
    pub disable_selinux: bool,
    pub selinux_relabel: bool,
    pub qemu_permissive: bool,
    pub update_packages: bool,
    pub no_cache: bool,
    pub cleanup_cache: bool,
    pub assume_yes: bool,
}

/// Replace anything outside `[A-Za-z0-9.-]` with `-`.
pub fn sanitize_vm_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Name used when none was given: `template-YYYYMMDD`.
pub fn default_vm_name(date: NaiveDate) -> String {
    format!("template-{}", date.format("%Y%m%d"))
}

/// Fill every unset option, dating the default name with today's date.
pub fn apply_defaults(options: ValidatedOptions) -> DefaultedOptions {
    apply_defaults_on(options, today())
}

/// Same as [`apply_defaults`] with an explicit date for the default name.
pub fn apply_defaults_on(options: ValidatedOptions, date: NaiveDate) -> DefaultedOptions {
    let vm_name = match options.vm_name {
        Some(name) => sanitize_vm_name(&name),
        None => default_vm_name(date),
    };

    DefaultedOptions {
        source_url: options.source_url,
        storage_id: options.storage_id,
        vm_id: options.vm_id,
        vm_name,
        network_bridge: options
            .network_bridge
            .unwrap_or_else(|| DEFAULT_BRIDGE.to_string()),
        bios_mode: options.bios_mode.unwrap_or_default(),
        disk_format: options.disk_format,
        machine_type: options.machine_type.unwrap_or_default(),
        scsi_controller: options.scsi_controller.unwrap_or_default(),
        disk_device: options.disk_device.unwrap_or_default(),
        display_type: options.display_type.unwrap_or_default(),
        is_rhel_derivative: options.is_rhel_derivative,
        disable_selinux: options.disable_selinux,
        selinux_relabel: options.selinux_relabel,
        qemu_permissive: options.qemu_permissive,
        update_packages: options.update_packages,
        no_cache: options.no_cache,
        cleanup_cache: options.cleanup_cache,
        assume_yes: options.assume_yes,
    }
}

impl From<DefaultedOptions> for ValidatedOptions {
    fn from(d: DefaultedOptions) -> Self {
        ValidatedOptions {
            source_url: d.source_url,
            storage_id: d.storage_id,
            vm_id: d.vm_id,
            vm_name: Some(d.vm_name),
            network_bridge: Some(d.network_bridge),
            bios_mode: Some(d.bios_mode),
            disk_format: d.disk_format,
            machine_type: Some(d.machine_type),
            scsi_controller: Some(d.scsi_controller),
            disk_device: Some(d.disk_device),
            display_type: Some(d.display_type),
            is_rhel_derivative: d.is_rhel_derivative,
            disable_selinux: d.disable_selinux,
            selinux_relabel: d.selinux_relabel,
            qemu_permissive: d.qemu_permissive,
            update_packages: d.update_packages,
            no_cache: d.no_cache,
            cleanup_cache: d.cleanup_cache,
            assume_yes: d.assume_yes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::options::OptionSet;
    use crate::plan::validate::validate;

    fn validated(vm_name: Option<&str>) -> ValidatedOptions {
        validate(&OptionSet {
            source_url: Some("https://example.com/image.raw".into()),
            storage_id: Some("local-lvm".into()),
            vm_id: Some("200".into()),
            vm_name: vm_name.map(Into::into),
            disk_format: Some("raw".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_sanitize_vm_name() {
        assert_eq!(sanitize_vm_name("my template!"), "my-template-");
        assert_eq!(sanitize_vm_name("debian-12.5"), "debian-12.5");
        assert_eq!(sanitize_vm_name("é_x"), "--x");
    }

    #[test]
    fn test_default_name_uses_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let d = apply_defaults_on(validated(None), date);
        assert_eq!(d.vm_name, "template-20240307");
    }

    #[test]
    fn test_defaults_filled() {
        let d = apply_defaults(validated(None));
        assert_eq!(d.network_bridge, "vmbr0");
        assert_eq!(d.bios_mode, BiosMode::Bios);
        assert_eq!(d.machine_type, MachineType::PcI440fx);
        assert_eq!(d.scsi_controller, ScsiController::VirtioScsiSingle);
        assert_eq!(d.disk_device, DiskDevice::Scsi);
        assert_eq!(d.display_type, DisplayType::Serial0);
        assert_eq!(d.disk_format, DiskFormat::Raw);
    }

    #[test]
    fn test_defaulting_is_idempotent() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        for name in [None, Some("my template!"), Some("ok-name")] {
            let once = apply_defaults_on(validated(name), date);
            let twice = apply_defaults_on(once.clone().into(), date);
            assert_eq!(once, twice);
        }
    }
}

//! pve-template - Proxmox VE template builder library
//!
//! Turns a set of build options into an immutable [`BuildPlan`] and drives
//! the host tools that download, customize and register a cloud image as a
//! VM template.

pub mod cli;
pub mod executor;
pub mod plan;
pub mod utils;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use executor::Executor;
pub use plan::{resolve, BuildPlan, OptionSet, ValidationError};

/// Library error type
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    const DEBIAN_URL: &str = "https://cloud.debian.org/images/cloud/bookworm/debian-12.qcow2";

    #[test]
    fn test_resolve_scenario_from_minimal_options() {
        let plan = resolve(&OptionSet {
            source_url: Some(DEBIAN_URL.into()),
            storage_id: Some("local-lvm".into()),
            vm_id: Some("200".into()),
            disk_format: Some("raw".into()),
            ..Default::default()
        })
        .unwrap();

        assert!(plan.vm_name().starts_with("template-"));
        assert_eq!(plan.vm_id(), 200);
        assert_eq!(plan.bios_mode().to_string(), "bios");
        assert_eq!(plan.machine_type().to_string(), "pc-i440fx");
        assert_eq!(plan.scsi_controller().to_string(), "virtio-scsi-single");
        assert_eq!(plan.disk_device().to_string(), "scsi");
        assert_eq!(plan.display_type().to_string(), "serial0");
        assert_eq!(plan.network_bridge(), "vmbr0");
    }

    #[test]
    fn test_resolve_sanitizes_name() {
        let plan = resolve(&OptionSet {
            source_url: Some(DEBIAN_URL.into()),
            storage_id: Some("local-lvm".into()),
            vm_id: Some("200".into()),
            vm_name: Some("my template!".into()),
            disk_format: Some("qcow2".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(plan.vm_name(), "my-template-");
    }

    #[test]
    fn test_resolve_round_trip() {
        let options = OptionSet {
            source_url: Some(DEBIAN_URL.into()),
            storage_id: Some("local-lvm".into()),
            vm_id: Some("101".into()),
            disk_format: Some("qcow2".into()),
            assume_yes: true,
            ..Default::default()
        };
        let plan = resolve(&options).unwrap();
        let reparsed = OptionSet::from_command_line(plan.to_command_line()).unwrap();
        assert_eq!(resolve(&reparsed).unwrap(), plan);
    }

    #[test]
    fn test_resolve_missing_disk_format() {
        let err = resolve(&OptionSet {
            source_url: Some(DEBIAN_URL.into()),
            storage_id: Some("local-lvm".into()),
            vm_id: Some("101".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingDiskFormat);
    }
}

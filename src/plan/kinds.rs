//! Closed value sets for the enum-constrained build options

use crate::plan::validate::ValidationError;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use strum::{EnumString, VariantNames};

/// A build option whose value must come from a fixed set of spellings.
pub trait Kind: FromStr + VariantNames + Display + Copy {
    /// Option name reported in validation errors.
    const FIELD: &'static str;

    /// Value passed to `qm` for this choice.
    fn qm_value(&self) -> &'static str;

    /// Parse a raw option value, reporting the field and the allowed set on failure.
    fn parse_field(value: &str) -> Result<Self, ValidationError> {
        value
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidEnumValue {
                field: Self::FIELD,
                value: value.to_string(),
                allowed: Self::VARIANTS,
            })
    }
}

/// Firmware the template boots with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, strum::Display, VariantNames)]
#[serde(rename_all = "kebab-case")]
pub enum BiosMode {
    #[default]
    #[strum(to_string = "bios")]
    Bios,
    #[strum(to_string = "uefi")]
    Uefi,
}

impl Kind for BiosMode {
    const FIELD: &'static str = "biosMode";

    fn qm_value(&self) -> &'static str {
        match self {
            BiosMode::Bios => "seabios",
            BiosMode::Uefi => "ovmf",
        }
    }
}

/// Format of the imported disk on the target storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumString, strum::Display, VariantNames)]
#[serde(rename_all = "kebab-case")]
pub enum DiskFormat {
    #[strum(to_string = "qcow2")]
    Qcow2,
    #[strum(to_string = "raw")]
    Raw,
}

impl Kind for DiskFormat {
    const FIELD: &'static str = "diskFormat";

    fn qm_value(&self) -> &'static str {
        match self {
            DiskFormat::Qcow2 => "qcow2",
            DiskFormat::Raw => "raw",
        }
    }
}

/// Emulated chipset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, strum::Display, VariantNames)]
#[serde(rename_all = "kebab-case")]
pub enum MachineType {
    #[default]
    #[strum(to_string = "pc-i440fx")]
    PcI440fx,
    #[strum(to_string = "q35")]
    Q35,
}

impl Kind for MachineType {
    const FIELD: &'static str = "machineType";

    fn qm_value(&self) -> &'static str {
        match self {
            MachineType::PcI440fx => "pc",
            MachineType::Q35 => "q35",
        }
    }
}

/// SCSI host adapter model (`qm --scsihw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, strum::Display, VariantNames)]
#[serde(rename_all = "kebab-case")]
pub enum ScsiController {
    #[default]
    #[strum(to_string = "virtio-scsi-single")]
    VirtioScsiSingle,
    #[strum(to_string = "virtio-scsi-pci")]
    VirtioScsiPci,
    #[strum(to_string = "lsi")]
    Lsi,
    #[strum(to_string = "lsi53c810")]
    Lsi53c810,
    #[strum(to_string = "megasas")]
    Megasas,
    #[strum(to_string = "pvscsi")]
    Pvscsi,
}

impl Kind for ScsiController {
    const FIELD: &'static str = "scsiController";

    fn qm_value(&self) -> &'static str {
        match self {
            ScsiController::VirtioScsiSingle => "virtio-scsi-single",
            ScsiController::VirtioScsiPci => "virtio-scsi-pci",
            ScsiController::Lsi => "lsi",
            ScsiController::Lsi53c810 => "lsi53c810",
            ScsiController::Megasas => "megasas",
            ScsiController::Pvscsi => "pvscsi",
        }
    }
}

/// Bus the root disk is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, strum::Display, VariantNames)]
#[serde(rename_all = "kebab-case")]
pub enum DiskDevice {
    #[default]
    #[strum(to_string = "scsi")]
    Scsi,
    #[strum(to_string = "virtio")]
    Virtio,
    #[strum(to_string = "sata")]
    Sata,
    #[strum(to_string = "ide")]
    Ide,
}

impl Kind for DiskDevice {
    const FIELD: &'static str = "diskDevice";

    fn qm_value(&self) -> &'static str {
        match self {
            DiskDevice::Scsi => "scsi",
            DiskDevice::Virtio => "virtio",
            DiskDevice::Sata => "sata",
            DiskDevice::Ide => "ide",
        }
    }
}

impl DiskDevice {
    /// Slot of the root disk, e.g. `scsi0`.
    pub fn slot(&self) -> String {
        format!("{}0", self.qm_value())
    }
}

/// Display adapter (`qm --vga`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, strum::Display, VariantNames)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayType {
    #[default]
    #[strum(to_string = "serial0")]
    Serial0,
    #[strum(to_string = "std")]
    Std,
    #[strum(to_string = "virtio")]
    Virtio,
    #[strum(to_string = "qxl")]
    Qxl,
    #[strum(to_string = "vmware")]
    Vmware,
    #[strum(to_string = "none")]
    None,
}

impl Kind for DisplayType {
    const FIELD: &'static str = "displayType";

    fn qm_value(&self) -> &'static str {
        match self {
            DisplayType::Serial0 => "serial0",
            DisplayType::Std => "std",
            DisplayType::Virtio => "virtio",
            DisplayType::Qxl => "qxl",
            DisplayType::Vmware => "vmware",
            DisplayType::None => "none",
        }
    }
}

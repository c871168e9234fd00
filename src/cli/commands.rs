//! CLI command definitions

use crate::plan::OptionSet;
use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// pve-template CLI
#[derive(Parser, Debug)]
#[command(
    name = "pve-template",
    version,
    about = "Build Proxmox VE VM templates from cloud images"
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Image cache directory
    #[arg(long, env = "PVE_TEMPLATE_CACHE", global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Download a cloud image, customize it and register it as a template
    /// (prompts for every option when none is given)
    Build(BuildArgs),

    /// Inspect or clear the image cache
    Cache {
        #[command(subcommand)]
        action: CacheCmd,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate man page
    ManPage,
}

#[derive(Subcommand, Debug)]
pub enum CacheCmd {
    /// List cached images
    List,
    /// Remove all cached images
    Clean,
}

/// Flags of the `build` command. Enum-valued options are taken as plain
/// strings and checked by the validator.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Cloud image URL
    #[arg(long, allow_hyphen_values = true)]
    pub url: Option<String>,

    /// Target storage ID (e.g. local-lvm)
    #[arg(long, allow_hyphen_values = true)]
    pub storage: Option<String>,

    /// VM ID of the template
    #[arg(long, allow_hyphen_values = true)]
    pub vmid: Option<String>,

    /// Template name (default: template-YYYYMMDD)
    #[arg(long, allow_hyphen_values = true)]
    pub name: Option<String>,

    /// Network bridge (default: vmbr0)
    #[arg(long, allow_hyphen_values = true)]
    pub bridge: Option<String>,

    /// Boot with SeaBIOS (default)
    #[arg(long, conflicts_with = "uefi")]
    pub bios: bool,

    /// Boot with OVMF (UEFI)
    #[arg(long)]
    pub uefi: bool,

    /// Import the disk as qcow2
    #[arg(long, conflicts_with = "raw")]
    pub qcow2: bool,

    /// Import the disk as raw
    #[arg(long)]
    pub raw: bool,

    /// Machine type (pc-i440fx|q35)
    #[arg(long)]
    pub machine: Option<String>,

    /// SCSI controller (virtio-scsi-single|virtio-scsi-pci|lsi|lsi53c810|megasas|pvscsi)
    #[arg(long)]
    pub scsi_controller: Option<String>,

    /// Bus of the root disk (scsi|virtio|sata|ide)
    #[arg(long)]
    pub disk_device: Option<String>,

    /// Display (serial0|std|virtio|qxl|vmware|none)
    #[arg(long)]
    pub display: Option<String>,

    /// Image is RHEL-family (RHEL, CentOS, AlmaLinux, Rocky, Fedora)
    #[arg(long)]
    pub rhel_derivative: bool,

    /// Disable SELinux in the image (RHEL derivatives only)
    #[arg(long)]
    pub disable_selinux: bool,

    /// Relabel the filesystem after customizing (RHEL derivatives only)
    #[arg(long)]
    pub selinux_relabel: bool,

    /// Make the guest agent domain permissive (RHEL derivatives only)
    #[arg(long)]
    pub qemu_permissive: bool,

    /// Update packages in the image
    #[arg(long)]
    pub update_packages: bool,

    /// Download fresh and keep nothing in the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Remove the cached image after a successful build
    #[arg(long)]
    pub cleanup: bool,

    /// Do not ask for confirmation
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Print the reproducible command and exit without building
    #[arg(long)]
    pub dry_run: bool,

    /// Print the resolved plan as JSON
    #[arg(long)]
    pub print_plan: bool,
}

impl BuildArgs {
    /// The option set these flags describe.
    pub fn option_set(&self) -> OptionSet {
        let pick = |on: bool, value: &str| on.then(|| value.to_string());

        OptionSet {
            source_url: self.url.clone(),
            storage_id: self.storage.clone(),
            vm_id: self.vmid.clone(),
            vm_name: self.name.clone(),
            network_bridge: self.bridge.clone(),
            bios_mode: pick(self.bios, "bios").or_else(|| pick(self.uefi, "uefi")),
            disk_format: pick(self.qcow2, "qcow2").or_else(|| pick(self.raw, "raw")),
            machine_type: self.machine.clone(),
            scsi_controller: self.scsi_controller.clone(),
            disk_device: self.disk_device.clone(),
            display_type: self.display.clone(),
            is_rhel_derivative: self.rhel_derivative,
            disable_selinux: self.disable_selinux,
            selinux_relabel: self.selinux_relabel,
            qemu_permissive: self.qemu_permissive,
            update_packages: self.update_packages,
            no_cache: self.no_cache,
            cleanup_cache: self.cleanup,
            assume_yes: self.yes,
        }
    }
}

//! The immutable build plan and its reproducible command line

use crate::plan::defaults::DefaultedOptions;
use crate::plan::kinds::*;
use crate::Result;
use serde::Serialize;

/// Program name used at the head of a reconstructed command line.
pub const PROGRAM: &str = "pve-template";

/// SELinux treatment for a RHEL-family image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Selinux {
    /// Switch SELinux off in the guest config.
    Disabled,
    /// Keep SELinux on, optionally relabelling and relaxing the guest agent domain.
    Enforcing { relabel: bool, qemu_permissive: bool },
}

/// Image lineage, deciding which distro-specific fixes apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum Distro {
    Generic,
    RhelDerivative { selinux: Selinux },
}

/// Switches that were given but have no effect for this image.
///
/// Kept so the reconstructed command reproduces the original invocation;
/// the executor never acts on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InertOptions {
    pub disable_selinux: bool,
    pub selinux_relabel: bool,
    pub qemu_permissive: bool,
}

impl InertOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Flag spellings of the inert switches.
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.disable_selinux {
            flags.push("--disable-selinux");
        }
        if self.selinux_relabel {
            flags.push("--selinux-relabel");
        }
        if self.qemu_permissive {
            flags.push("--qemu-permissive");
        }
        flags
    }
}

/// Validated, defaulted configuration for one template build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    source_url: String,
    storage_id: String,
    vm_id: u32,
    vm_name: String,
    network_bridge: String,
    bios_mode: BiosMode,
    disk_format: DiskFormat,
    machine_type: MachineType,
    scsi_controller: ScsiController,
    disk_device: DiskDevice,
    display_type: DisplayType,
    distro: Distro,
    inert: InertOptions,
    update_packages: bool,
    no_cache: bool,
    cleanup_cache: bool,
    assume_yes: bool,
}

impl BuildPlan {
    /// Assemble the plan. SELinux switches only take effect on a RHEL
    /// derivative with SELinux left enabled; otherwise they are recorded as inert.
    pub fn build(options: DefaultedOptions) -> Self {
        let (distro, inert) = if !options.is_rhel_derivative {
            (
                Distro::Generic,
                InertOptions {
                    disable_selinux: options.disable_selinux,
                    selinux_relabel: options.selinux_relabel,
                    qemu_permissive: options.qemu_permissive,
                },
            )
        } else if options.disable_selinux {
            (
                Distro::RhelDerivative {
                    selinux: Selinux::Disabled,
                },
                InertOptions {
                    disable_selinux: false,
                    selinux_relabel: options.selinux_relabel,
                    qemu_permissive: options.qemu_permissive,
                },
            )
        } else {
            (
                Distro::RhelDerivative {
                    selinux: Selinux::Enforcing {
                        relabel: options.selinux_relabel,
                        qemu_permissive: options.qemu_permissive,
                    },
                },
                InertOptions::default(),
            )
        };

        Self {
            source_url: options.source_url,
            storage_id: options.storage_id,
            vm_id: options.vm_id,
            vm_name: options.vm_name,
            network_bridge: options.network_bridge,
            bios_mode: options.bios_mode,
            disk_format: options.disk_format,
            machine_type: options.machine_type,
            scsi_controller: options.scsi_controller,
            disk_device: options.disk_device,
            display_type: options.display_type,
            distro,
            inert,
            update_packages: options.update_packages,
            no_cache: options.no_cache,
            cleanup_cache: options.cleanup_cache,
            assume_yes: options.assume_yes,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }

    pub fn vm_id(&self) -> u32 {
        self.vm_id
    }

    pub fn vm_name(&self) -> &str {
        &self.vm_name
    }

    pub fn network_bridge(&self) -> &str {
        &self.network_bridge
    }

    pub fn bios_mode(&self) -> BiosMode {
        self.bios_mode
    }

    pub fn disk_format(&self) -> DiskFormat {
        self.disk_format
    }

    pub fn machine_type(&self) -> MachineType {
        self.machine_type
    }

    pub fn scsi_controller(&self) -> ScsiController {
        self.scsi_controller
    }

    pub fn disk_device(&self) -> DiskDevice {
        self.disk_device
    }

    pub fn display_type(&self) -> DisplayType {
        self.display_type
    }

    pub fn distro(&self) -> Distro {
        self.distro
    }

    pub fn inert(&self) -> InertOptions {
        self.inert
    }

    pub fn update_packages(&self) -> bool {
        self.update_packages
    }

    pub fn no_cache(&self) -> bool {
        self.no_cache
    }

    pub fn cleanup_cache(&self) -> bool {
        self.cleanup_cache
    }

    pub fn assume_yes(&self) -> bool {
        self.assume_yes
    }

    /// Tokens of an equivalent non-interactive invocation, program name first.
    /// `--yes` is always appended.
    pub fn to_command_line(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![PROGRAM.into(), "build".into()];
        let mut push = |flag: &str, value: String| {
            args.push(flag.to_string());
            args.push(value);
        };

        push("--url", self.source_url.clone());
        push("--storage", self.storage_id.clone());
        push("--vmid", self.vm_id.to_string());
        push("--name", self.vm_name.clone());
        push("--bridge", self.network_bridge.clone());
        push("--machine", self.machine_type.to_string());
        push("--scsi-controller", self.scsi_controller.to_string());
        push("--disk-device", self.disk_device.to_string());
        push("--display", self.display_type.to_string());

        args.push(format!("--{}", self.bios_mode));
        args.push(format!("--{}", self.disk_format));

        if let Distro::RhelDerivative { selinux } = self.distro {
            args.push("--rhel-derivative".into());
            match selinux {
                Selinux::Disabled => args.push("--disable-selinux".into()),
                Selinux::Enforcing {
                    relabel,
                    qemu_permissive,
                } => {
                    if relabel {
                        args.push("--selinux-relabel".into());
                    }
                    if qemu_permissive {
                        args.push("--qemu-permissive".into());
                    }
                }
            }
        }
        args.extend(self.inert.flags().into_iter().map(String::from));

        if self.update_packages {
            args.push("--update-packages".into());
        }
        if self.no_cache {
            args.push("--no-cache".into());
        }
        if self.cleanup_cache {
            args.push("--cleanup".into());
        }
        args.push("--yes".into());
        args
    }

    /// [`Self::to_command_line`] quoted for a POSIX shell, ready to copy and paste.
    pub fn shell_command(&self) -> Result<String> {
        let quoted = self
            .to_command_line()
            .iter()
            .map(|arg| shlex::try_quote(arg).map(|q| q.into_owned()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(quoted.join(" "))
    }
}

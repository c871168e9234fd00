//! Raw build options, as gathered from flags or prompt answers

use crate::cli::commands::{Cli, Cmd};
use crate::Result;
use anyhow::anyhow;
use clap::Parser;
use serde::Serialize;
use std::ffi::OsString;

/// Possibly partial configuration for one invocation.
///
/// Value fields stay untyped until [`crate::plan::validate`] checks them;
/// switches are plain flags that default to off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionSet {
    pub source_url: Option<String>,
    pub storage_id: Option<String>,
    pub vm_id: Option<String>,
    pub vm_name: Option<String>,
    pub network_bridge: Option<String>,
    pub bios_mode: Option<String>,
    pub disk_format: Option<String>,
    pub machine_type: Option<String>,
    pub scsi_controller: Option<String>,
    pub disk_device: Option<String>,
    pub display_type: Option<String>,

    pub is_rhel_derivative: bool,
    pub disable_selinux: bool,
    pub selinux_relabel: bool,
    pub qemu_permissive: bool,
    pub update_packages: bool,
    pub no_cache: bool,
    pub cleanup_cache: bool,
    pub assume_yes: bool,
}

impl OptionSet {
    /// True when nothing at all was supplied, which selects interactive mode.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parse a full command line (program name first) with the real flag parser.
    pub fn from_command_line<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        match cli.cmd {
            Cmd::Build(args) => Ok(args.option_set()),
            other => Err(anyhow!("not a build command: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(OptionSet::default().is_empty());
        let set = OptionSet {
            assume_yes: true,
            ..Default::default()
        };
        assert!(!set.is_empty());
    }

    #[test]
    fn test_from_command_line() {
        let set = OptionSet::from_command_line([
            "pve-template",
            "build",
            "--url",
            "https://example.com/a.qcow2",
            "--storage",
            "local-lvm",
            "--vmid",
            "9000",
            "--uefi",
            "--raw",
            "--rhel-derivative",
            "-y",
        ])
        .unwrap();

        assert_eq!(set.source_url.as_deref(), Some("https://example.com/a.qcow2"));
        assert_eq!(set.storage_id.as_deref(), Some("local-lvm"));
        assert_eq!(set.vm_id.as_deref(), Some("9000"));
        assert_eq!(set.bios_mode.as_deref(), Some("uefi"));
        assert_eq!(set.disk_format.as_deref(), Some("raw"));
        assert!(set.is_rhel_derivative);
        assert!(set.assume_yes);
        assert!(!set.no_cache);
        assert_eq!(set.machine_type, None);
    }

    #[test]
    fn test_from_command_line_rejects_other_commands() {
        let result = OptionSet::from_command_line(["pve-template", "man-page"]);
        assert!(result.is_err());
    }
}

//! Offline image customization with virt-customize

use crate::plan::{BuildPlan, Distro, Selinux};
use std::path::Path;

/// Packages every template gets.
pub const GUEST_PACKAGES: &str = "qemu-guest-agent,cloud-init";

fn op(args: &mut Vec<String>, name: &str, value: &str) {
    args.push(name.to_string());
    args.push(value.to_string());
}

/// Arguments for `virt-customize` on the work copy at `disk`.
pub fn customize_args(plan: &BuildPlan, disk: &Path) -> Vec<String> {
    let mut args: Vec<String> = vec!["-a".into(), disk.to_string_lossy().into_owned()];

    if plan.update_packages() {
        args.push("--update".into());
    }
    op(&mut args, "--install", GUEST_PACKAGES);
    op(&mut args, "--run-command", "systemctl enable qemu-guest-agent");

    // Clones must regenerate their identity on first boot
    op(&mut args, "--truncate", "/etc/machine-id");
    op(&mut args, "--delete", "/var/lib/dbus/machine-id");

    if let Distro::RhelDerivative { selinux } = plan.distro() {
        match selinux {
            Selinux::Disabled => {
                op(&mut args, "--edit", "/etc/selinux/config:s/^SELINUX=.*/SELINUX=disabled/");
            }
            Selinux::Enforcing {
                relabel,
                qemu_permissive,
            } => {
                if qemu_permissive {
                    op(&mut args, "--run-command", "semanage permissive -a virt_qemu_ga_t");
                }
                // Must come last so files written above get labelled
                if relabel {
                    args.push("--selinux-relabel".into());
                }
            }
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{resolve, OptionSet};

    fn plan(edit: impl FnOnce(&mut OptionSet)) -> BuildPlan {
        let mut options = OptionSet {
            source_url: Some("https://example.com/alma-9.qcow2".into()),
            storage_id: Some("local-lvm".into()),
            vm_id: Some("9000".into()),
            disk_format: Some("qcow2".into()),
            ..Default::default()
        };
        edit(&mut options);
        resolve(&options).unwrap()
    }

    #[test]
    fn test_generic_image() {
        let args = customize_args(&plan(|_| {}), Path::new("/tmp/work/disk.qcow2"));
        assert_eq!(&args[..4], &["-a", "/tmp/work/disk.qcow2", "--install", GUEST_PACKAGES]);
        assert!(args.contains(&"/etc/machine-id".to_string()));
        assert!(!args.contains(&"--update".to_string()));
        assert!(!args.iter().any(|a| a.contains("selinux") || a.contains("semanage")));
    }

    #[test]
    fn test_update_comes_before_install() {
        let args = customize_args(&plan(|o| o.update_packages = true), Path::new("d"));
        let update = args.iter().position(|a| a == "--update").unwrap();
        let install = args.iter().position(|a| a == "--install").unwrap();
        assert!(update < install);
    }

    #[test]
    fn test_rhel_enforcing_relabels_last() {
        let args = customize_args(
            &plan(|o| {
                o.is_rhel_derivative = true;
                o.selinux_relabel = true;
                o.qemu_permissive = true;
            }),
            Path::new("d"),
        );
        assert_eq!(args.last().map(String::as_str), Some("--selinux-relabel"));
        assert!(args.contains(&"semanage permissive -a virt_qemu_ga_t".to_string()));
    }

    #[test]
    fn test_rhel_disabled_ignores_relabel() {
        let args = customize_args(
            &plan(|o| {
                o.is_rhel_derivative = true;
                o.disable_selinux = true;
                o.selinux_relabel = true;
            }),
            Path::new("d"),
        );
        assert!(args.iter().any(|a| a.contains("SELINUX=disabled")));
        assert!(!args.contains(&"--selinux-relabel".to_string()));
    }

    #[test]
    fn test_inert_switches_not_acted_on() {
        let args = customize_args(
            &plan(|o| {
                o.disable_selinux = true;
                o.selinux_relabel = true;
                o.qemu_permissive = true;
            }),
            Path::new("d"),
        );
        assert!(!args.iter().any(|a| a.contains("selinux") || a.contains("semanage")));
    }
}

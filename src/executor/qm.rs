//! Proxmox VM lifecycle: `qm`, `pvesm` and `pvesh` invocations

use crate::plan::kinds::{BiosMode, DisplayType, Kind};
use crate::plan::BuildPlan;
use crate::utils::system::CommandRunner;
use crate::Result;
use std::path::Path;

pub const MEMORY_MB: u32 = 2048;
pub const CORES: u32 = 2;

/// `qm create` arguments: an empty VM with the plan's hardware.
pub fn create_args(plan: &BuildPlan) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "create".into(),
        plan.vm_id().to_string(),
        "--name".into(),
        plan.vm_name().into(),
        "--memory".into(),
        MEMORY_MB.to_string(),
        "--cores".into(),
        CORES.to_string(),
        "--net0".into(),
        format!("virtio,bridge={}", plan.network_bridge()),
        "--bios".into(),
        plan.bios_mode().qm_value().into(),
        "--machine".into(),
        plan.machine_type().qm_value().into(),
        "--scsihw".into(),
        plan.scsi_controller().qm_value().into(),
        "--ostype".into(),
        "l26".into(),
        "--agent".into(),
        "enabled=1".into(),
    ];

    if plan.display_type() == DisplayType::Serial0 {
        args.extend(["--serial0".into(), "socket".into()]);
    }
    args.extend(["--vga".into(), plan.display_type().qm_value().into()]);

    if plan.bios_mode() == BiosMode::Uefi {
        args.extend([
            "--efidisk0".into(),
            format!("{}:0,efitype=4m,pre-enrolled-keys=0", plan.storage_id()),
        ]);
    }
    args
}

/// `qm set` arguments importing the customized image as the root disk.
pub fn import_disk_args(plan: &BuildPlan, disk: &Path) -> Vec<String> {
    vec![
        "set".into(),
        plan.vm_id().to_string(),
        format!("--{}", plan.disk_device().slot()),
        format!(
            "{}:0,import-from={},format={}",
            plan.storage_id(),
            disk.display(),
            plan.disk_format().qm_value()
        ),
    ]
}

/// `qm set` arguments attaching the cloud-init drive and booting from the root disk.
pub fn cloud_init_args(plan: &BuildPlan) -> Vec<String> {
    vec![
        "set".into(),
        plan.vm_id().to_string(),
        "--ide2".into(),
        format!("{}:cloudinit", plan.storage_id()),
        "--boot".into(),
        format!("order={}", plan.disk_device().slot()),
        "--ipconfig0".into(),
        "ip=dhcp".into(),
    ]
}

pub fn template_args(plan: &BuildPlan) -> Vec<String> {
    vec!["template".into(), plan.vm_id().to_string()]
}

/// Every `qm` invocation needed to turn `disk` into a template, in order.
pub fn steps(plan: &BuildPlan, disk: &Path) -> Vec<Vec<String>> {
    vec![
        create_args(plan),
        import_disk_args(plan, disk),
        cloud_init_args(plan),
        template_args(plan),
    ]
}

/// Storage IDs from `pvesm status` output (header line skipped).
pub fn parse_storage_list(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Storages on this host that can hold VM disk images.
pub fn list_storages(runner: &mut dyn CommandRunner) -> Result<Vec<String>> {
    let output = runner.output(
        "pvesm",
        &["status".into(), "--content".into(), "images".into()],
    )?;
    Ok(parse_storage_list(&output))
}

/// Whether a VM with this ID already exists.
pub fn vm_exists(runner: &mut dyn CommandRunner, vm_id: u32) -> Result<bool> {
    runner.succeeds("qm", &["status".into(), vm_id.to_string()])
}

/// Next free VM ID according to the cluster.
pub fn next_vm_id(runner: &mut dyn CommandRunner) -> Result<String> {
    let output = runner.output("pvesh", &["get".into(), "/cluster/nextid".into()])?;
    Ok(output.trim().trim_matches('"').to_string())
}

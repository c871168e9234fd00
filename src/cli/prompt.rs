//! Interactive prompting for build options

use crate::plan::defaults::{default_vm_name, DEFAULT_BRIDGE};
use crate::plan::validate::check_url;
use crate::plan::kinds::*;
use crate::plan::OptionSet;
use crate::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// What the host could tell us before prompting; either may be unknown.
#[derive(Debug, Default, Clone)]
pub struct HostHints {
    pub storages: Vec<String>,
    pub next_vm_id: Option<String>,
}

fn text(theme: &ColorfulTheme, prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?)
}

fn choose<K: Kind>(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    let items = K::VARIANTS;
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;
    Ok(items[index].to_string())
}

fn yes_no(theme: &ColorfulTheme, prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Accept the same URLs the validator does: absolute, with a host.
fn url_answer(input: &str) -> std::result::Result<(), String> {
    check_url(input.trim()).map_err(|e| e.to_string())
}

/// Ask for every option in flag order, accumulating the answers.
pub fn prompt_options(hints: &HostHints) -> Result<OptionSet> {
    let theme = ColorfulTheme::default();
    let mut options = OptionSet::default();

    let url = Input::<String>::with_theme(&theme)
        .with_prompt("Cloud image URL")
        .validate_with(|input: &String| url_answer(input))
        .interact_text()?;
    options.source_url = Some(url);

    options.storage_id = Some(if hints.storages.is_empty() {
        text(&theme, "Storage ID", Some("local-lvm"))?
    } else {
        let index = Select::with_theme(&theme)
            .with_prompt("Storage")
            .items(&hints.storages)
            .default(0)
            .interact()?;
        hints.storages[index].clone()
    });

    let vm_id = Input::<String>::with_theme(&theme)
        .with_prompt("VM ID")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
                Ok(())
            } else {
                Err("digits only".to_string())
            }
        });
    let vm_id = match &hints.next_vm_id {
        Some(next) => vm_id.default(next.clone()),
        None => vm_id,
    };
    options.vm_id = Some(vm_id.interact_text()?);

    let default_name = default_vm_name(crate::utils::system::today());
    options.vm_name = Some(text(&theme, "Template name", Some(&default_name))?);
    options.network_bridge = Some(text(&theme, "Network bridge", Some(DEFAULT_BRIDGE))?);

    options.bios_mode = Some(choose::<BiosMode>(&theme, "Firmware")?);
    options.disk_format = Some(choose::<DiskFormat>(&theme, "Disk format")?);
    options.machine_type = Some(choose::<MachineType>(&theme, "Machine type")?);
    options.scsi_controller = Some(choose::<ScsiController>(&theme, "SCSI controller")?);
    options.disk_device = Some(choose::<DiskDevice>(&theme, "Disk bus")?);
    options.display_type = Some(choose::<DisplayType>(&theme, "Display")?);

    options.is_rhel_derivative = yes_no(
        &theme,
        "Is this a RHEL derivative (RHEL, CentOS, AlmaLinux, Rocky, Fedora)?",
    )?;
    if options.is_rhel_derivative {
        options.disable_selinux = yes_no(&theme, "Disable SELinux?")?;
        if !options.disable_selinux {
            options.selinux_relabel = yes_no(&theme, "Relabel SELinux contexts after customizing?")?;
            options.qemu_permissive = yes_no(&theme, "Make the guest agent SELinux domain permissive?")?;
        }
    }

    options.update_packages = yes_no(&theme, "Update packages in the image?")?;
    options.no_cache = yes_no(&theme, "Skip the image cache?")?;
    if !options.no_cache {
        options.cleanup_cache = yes_no(&theme, "Remove the cached image afterwards?")?;
    }

    Ok(options)
}

/// Final go/no-go before touching the host.
pub fn confirm(summary: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(summary)
        .default(true)
        .interact()?)
}

//! Drives a [`BuildPlan`] through download, customization and registration

pub mod customize;
pub mod image;
pub mod qm;

#[cfg(test)]
pub(crate) mod testing;

use crate::plan::BuildPlan;
use crate::utils::paths::image_file_name;
use crate::utils::system::CommandRunner;
use crate::Result;
use anyhow::{bail, Context};
use customize::customize_args;
use image::ImageCache;
use std::fs;
use tracing::{info, warn};

/// Host tools the pipeline shells out to.
pub const REQUIRED_TOOLS: &[&str] = &["wget", "virt-customize", "qm", "pvesm"];

/// Runs the template build on the host.
pub struct Executor<R: CommandRunner> {
    runner: R,
    cache: ImageCache,
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(runner: R, cache: ImageCache) -> Self {
        Self { runner, cache }
    }

    #[cfg(test)]
    pub(crate) fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Checks that need the live host: the storage exists and the VM ID is free.
    pub fn preflight(&mut self, plan: &BuildPlan) -> Result<()> {
        let storages = qm::list_storages(&mut self.runner)?;
        if !storages.iter().any(|s| s == plan.storage_id()) {
            bail!(
                "storage '{}' not found on this host (available: {})",
                plan.storage_id(),
                storages.join(", ")
            );
        }
        if qm::vm_exists(&mut self.runner, plan.vm_id())? {
            bail!("VM {} already exists", plan.vm_id());
        }
        Ok(())
    }

    /// Download, customize and register the image as a template.
    pub fn run(&mut self, plan: &BuildPlan) -> Result<()> {
        let url = plan.source_url();
        fs::create_dir_all(self.cache.dir())
            .with_context(|| format!("failed to create {}", self.cache.dir().display()))?;

        // Work next to the cache rather than in /tmp; images are large
        let work = tempfile::Builder::new()
            .prefix(".work-")
            .tempdir_in(self.cache.dir())?;
        let disk = work.path().join(image_file_name(url));

        if plan.no_cache() {
            image::download(&mut self.runner, url, &disk)?;
        } else {
            let cached = self.cache.fetch(&mut self.runner, url)?;
            fs::copy(&cached, &disk)
                .with_context(|| format!("failed to copy {}", cached.display()))?;
        }

        info!("Customizing {}", disk.display());
        self.runner.run("virt-customize", &customize_args(plan, &disk))?;

        info!("Creating VM {} ({})", plan.vm_id(), plan.vm_name());
        for (i, args) in qm::steps(plan, &disk).iter().enumerate() {
            if let Err(e) = self.runner.run("qm", args) {
                if i > 0 {
                    warn!(
                        "VM {} was left partially configured; remove it with 'qm destroy {}'",
                        plan.vm_id(),
                        plan.vm_id()
                    );
                }
                return Err(e);
            }
        }

        if plan.cleanup_cache() && !plan.no_cache() {
            self.cache.evict(url)?;
        }
        Ok(())
    }
}

//! The `build` command: resolve a plan, then hand it to the executor

use crate::cli::commands::BuildArgs;
use crate::cli::prompt::{self, HostHints};
use crate::executor::image::ImageCache;
use crate::executor::{qm, Executor, REQUIRED_TOOLS};
use crate::plan::{self, BuildPlan};
use crate::utils::paths::default_cache_dir;
use crate::utils::system::{require_tools, CommandRunner, SystemRunner};
use crate::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Ask the host for storages and a free VM ID to offer while prompting.
fn host_hints(runner: &mut dyn CommandRunner) -> HostHints {
    let storages = qm::list_storages(runner).unwrap_or_else(|e| {
        debug!("could not list storages: {e}");
        Vec::new()
    });
    let next_vm_id = qm::next_vm_id(runner)
        .map_err(|e| debug!("could not get next VM ID: {e}"))
        .ok();
    HostHints {
        storages,
        next_vm_id,
    }
}

fn summary(plan: &BuildPlan) -> String {
    format!(
        "Create template '{}' (VM {}) on '{}' from {}?",
        plan.vm_name(),
        plan.vm_id(),
        plan.storage_id(),
        plan.source_url()
    )
}

fn print_reproducible(plan: &BuildPlan) -> Result<()> {
    println!("To repeat this build non-interactively:");
    println!("  {}", plan.shell_command()?);
    Ok(())
}

/// Run the `build` command.
pub fn run(args: &BuildArgs, cache_dir: Option<PathBuf>) -> Result<()> {
    let mut runner = SystemRunner;
    let flags = args.option_set();
    let interactive = flags.is_empty();

    let options = if interactive {
        prompt::prompt_options(&host_hints(&mut runner))?
    } else {
        flags
    };

    let plan = plan::resolve(&options)?;
    for flag in plan.inert().flags() {
        warn!("{} has no effect for this image and will be ignored", flag);
    }

    if args.print_plan {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    }
    if args.dry_run {
        println!("{}", plan.shell_command()?);
        return Ok(());
    }

    require_tools(REQUIRED_TOOLS)?;
    let cache = ImageCache::new(match cache_dir {
        Some(dir) => dir,
        None => default_cache_dir()?,
    });
    let mut executor = Executor::new(runner, cache);
    executor.preflight(&plan)?;

    if !plan.assume_yes() && !prompt::confirm(&summary(&plan))? {
        println!("Cancelled.");
        return Ok(());
    }

    let result = executor.run(&plan);
    if interactive || result.is_err() {
        print_reproducible(&plan)?;
    }
    result?;

    println!(
        "Created template '{}' (VM {})",
        plan.vm_name(),
        plan.vm_id()
    );
    Ok(())
}

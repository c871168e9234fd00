//! System utility functions

use crate::Result;
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Today's date in the host's local time zone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Locate a required host tool on PATH
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| anyhow!("required tool '{}' not found in PATH", name))
}

/// Locate every tool in `names`, failing on the first missing one
pub fn require_tools(names: &[&str]) -> Result<()> {
    for name in names {
        let path = require_tool(name)?;
        debug!("found {} at {}", name, path.display());
    }
    Ok(())
}

/// Runs external programs. Abstracted so the build pipeline can be driven
/// without touching the host.
pub trait CommandRunner {
    /// Run to completion with inherited stdio; non-zero exit is an error.
    fn run(&mut self, program: &str, args: &[String]) -> Result<()>;

    /// Run and capture stdout; non-zero exit is an error.
    fn output(&mut self, program: &str, args: &[String]) -> Result<String>;

    /// Run quietly and report whether it exited successfully.
    fn succeeds(&mut self, program: &str, args: &[String]) -> Result<bool>;
}

/// Runs commands on the host.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<()> {
        debug!("running {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to start {program}"))?;
        if !status.success() {
            return Err(anyhow!("{} failed ({})", program, status));
        }
        Ok(())
    }

    fn output(&mut self, program: &str, args: &[String]) -> Result<String> {
        debug!("running {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("failed to start {program}"))?;
        if !output.status.success() {
            return Err(anyhow!("{} failed ({})", program, output.status));
        }
        Ok(String::from_utf8(output.stdout)?)
    }

    fn succeeds(&mut self, program: &str, args: &[String]) -> Result<bool> {
        debug!("probing {} {}", program, args.join(" "));
        let status = Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("failed to start {program}"))?;
        Ok(status.success())
    }
}

use crate::utils::system::CommandRunner;
use crate::Result;
use anyhow::anyhow;
use std::collections::HashMap;
use std::fs;

/// Records invocations instead of running them. `wget` always writes its
/// output file, even when told to fail, like an interrupted download.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<(String, Vec<String>)>,
    outputs: HashMap<String, String>,
    statuses: HashMap<String, bool>,
    failing: Vec<String>,
}

impl RecordingRunner {
    pub fn with_output(mut self, program: &str, output: &str) -> Self {
        self.outputs.insert(program.into(), output.into());
        self
    }

    pub fn with_status(mut self, program: &str, succeeds: bool) -> Self {
        self.statuses.insert(program.into(), succeeds);
        self
    }

    /// Make `run` fail for invocations whose first argument is `first_arg`.
    pub fn failing_on(mut self, first_arg: &str) -> Self {
        self.failing.push(first_arg.into());
        self
    }

    pub fn programs(&self) -> Vec<&str> {
        self.calls.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, program: &str, args: &[String]) -> Result<()> {
        self.calls.push((program.into(), args.to_vec()));
        if program == "wget" {
            if let Some(i) = args.iter().position(|a| a == "--output-document") {
                fs::write(&args[i + 1], b"image")?;
            }
        }
        if args.first().is_some_and(|a| self.failing.contains(a)) {
            return Err(anyhow!("{} failed (exit status: 1)", program));
        }
        Ok(())
    }

    fn output(&mut self, program: &str, args: &[String]) -> Result<String> {
        self.calls.push((program.into(), args.to_vec()));
        self.outputs
            .get(program)
            .cloned()
            .ok_or_else(|| anyhow!("{} failed (exit status: 1)", program))
    }

    fn succeeds(&mut self, program: &str, args: &[String]) -> Result<bool> {
        self.calls.push((program.into(), args.to_vec()));
        Ok(self.statuses.get(program).copied().unwrap_or(false))
    }
}

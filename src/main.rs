use anyhow::Result;
use clap::{CommandFactory, Parser};
use pve_template::cli::commands::{Cli, Cmd};
use pve_template::cli::completions::{generate_man_page, print_completions};
use pve_template::cli::{build, cache};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.cmd {
        Cmd::Build(args) => build::run(args, cli.cache_dir.clone())?,
        Cmd::Cache { action } => cache::run(action, cli.cache_dir.clone())?,
        Cmd::Completions { shell } => print_completions(*shell, &mut Cli::command()),
        Cmd::ManPage => generate_man_page(Cli::command())?,
    }

    Ok(())
}

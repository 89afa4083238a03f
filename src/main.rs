use anyhow::Context;
use clap::Parser;
use gmcode::{init_logging, Job, Machine};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "gmcode")]
#[command(about = "Write a G-code program from a TOML or JSON job file")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_DATE"), ")"))]
struct Args {
    /// Job file (.toml or .json)
    job: PathBuf,

    /// Output program; stdout when omitted
    output: Option<PathBuf>,
}

fn write_program<W: Write>(job: &Job, mut machine: Machine<W>) -> anyhow::Result<()> {
    job.run(&mut machine)?;
    machine.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;

    let job = Job::load_from_file(&args.job)
        .with_context(|| format!("Failed to load job {}", args.job.display()))?;
    info!(path = %args.job.display(), operations = job.operations.len(), "Loaded job");

    match &args.output {
        Some(path) => {
            let machine = Machine::create_with_config(path, &job.machine)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_program(&job, machine)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote program");
        }
        None => {
            let machine = Machine::with_config(std::io::stdout().lock(), &job.machine)?;
            write_program(&job, machine).context("Failed to write program")?;
        }
    }

    Ok(())
}

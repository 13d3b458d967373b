//! Error catalog report generator.
//!
//! Dumps every error defined in the `*.errors.yaml` files under the given
//! directories into a single JSON report, and optionally crosschecks the
//! result against the condensed error policy table.
//!
//! ```bash
//! error_reports -y dir1,dir2 -e obmc-errors.json -x crosscheck.txt
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use error_policy_tools::{catalog, crosscheck, policy};

#[derive(Parser)]
#[command(name = "error_reports")]
#[command(about = "Error log policy reports")]
struct Cli {
    /// Comma separated list of error YAML directories
    #[arg(short = 'y', long = "yaml_dirs", default_value = ".")]
    yaml_dirs: String,

    /// Output error report file
    #[arg(short = 'e', long = "error_file", default_value = "obmc-errors.json")]
    error_file: PathBuf,

    /// Condensed policy in JSON
    #[arg(short = 'p', long = "policy", default_value = "condensed.json")]
    policy_file: PathBuf,

    /// YAML vs policy table crosscheck output file (skips the crosscheck
    /// when not given)
    #[arg(short = 'x', long = "crosscheck")]
    crosscheck_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let records = catalog::collect_errors(cli.yaml_dirs.split(','))?;
    catalog::write_error_report(&cli.error_file, &records)?;

    if let Some(crosscheck_file) = &cli.crosscheck_file {
        let policy = policy::load_condensed(&cli.policy_file)
            .context("loading the condensed policy (run condense_policy first)")?;
        let report = crosscheck::crosscheck(&records, &policy);
        crosscheck::write_crosscheck(crosscheck_file, &report)?;
    }

    Ok(())
}

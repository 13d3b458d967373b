//! Error log policy condenser.
//!
//! Condenses the full vendor policy table down to only the fields used by
//! the BMC code, grouped by error name for easier searching. See
//! [`error_policy_tools::policy`] for the condensed format.
//!
//! ```bash
//! condense_policy -p policyTable.json -c condensed.json
//! ```

use std::path::PathBuf;

use clap::Parser;

use error_policy_tools::policy;

#[derive(Parser)]
#[command(name = "condense_policy")]
#[command(about = "Error log policy condenser")]
struct Cli {
    /// Policy table in JSON
    #[arg(short = 'p', long = "policy", default_value = "policyTable.json")]
    policy_file: PathBuf,

    /// Condensed policy output file in JSON
    #[arg(
        short = 'c',
        long = "condensed_policy",
        default_value = "condensed.json"
    )]
    condensed_file: PathBuf,

    /// Prettify the output JSON
    #[arg(short = 't', long = "prettify_json")]
    prettify: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let table = policy::load_policy_table(&cli.policy_file)?;
    let condensed = policy::condense(&table);
    policy::write_condensed(&cli.condensed_file, &condensed, cli.prettify)?;

    Ok(())
}

//! vcbench CLI: load-test credential issuance from the terminal.
//!
//! Usage:
//! ```bash
//! # Issue CRED_COUNT credentials, CRED_BATCH at a time, against AGENT_ADMIN_URL
//! vcbench
//!
//! # Export issued registrations from the credential log to CSV
//! vcbench export --output orgbook_corp_export.csv
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod cmd_export;
mod cmd_issue;
mod logging;

#[derive(Parser)]
#[command(
    name = "vcbench",
    about = "Load-test verifiable credential issuance against an agent admin API",
    long_about = "
Issues credentials in bounded in-flight batches and reports acknowledgement throughput.
Every option can be given as an environment variable; with none set the defaults
reproduce a 300-credential run at width 32 against http://localhost:8034.

ENVIRONMENT VARIABLES:
  AGENT_ADMIN_URL        Agent admin API base URL
  AGENT_ADMIN_API_KEY    Sent as x-api-key when set and non-empty
  CRED_COUNT             Credentials to issue
  CRED_BATCH             Maximum unacknowledged exchanges in flight
  POLL_BATCH_LIMIT       Poll rounds per drain cycle before timing out
  POLL_INTERVAL_MS       Sleep between poll rounds
  DATABASE_URL           Credential log database (export)
",
    version
)]
struct Cli {
    #[command(flatten)]
    log: logging::LogArgs,

    #[command(flatten)]
    issue: cmd_issue::IssueArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export issued registration credentials to CSV, one row per corporation
    Export {
        /// Credential log database URL
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
        /// Output file
        #[arg(short, long, default_value = "orgbook_corp_export.csv")]
        output: PathBuf,
        /// Corporations exported per entity type
        #[arg(long, default_value_t = 100)]
        max_per_type: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log);

    let result = match cli.command {
        None => cmd_issue::run(cli.issue).await,
        Some(Commands::Export {
            database_url,
            output,
            max_per_type,
        }) => cmd_export::run(&database_url, &output, max_per_type).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! Tracing / logging initialisation.

use clap::Args;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging options. `RUST_LOG`, when set, takes precedence over `--log-level`.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Default level: trace | debug | info | warn | error
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit JSON structured logs instead of human-readable text
    #[arg(long, env = "LOG_JSON", global = true)]
    pub log_json: bool,
}

/// Initialise tracing. Logs go to stderr so progress output on stdout stays clean.
pub fn init_tracing(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

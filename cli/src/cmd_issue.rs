//! Default command: discover the issuance target, then run the batch issuer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use vcbench_core::offer::{REGISTRATION_SCHEMA_NAME, REGISTRATION_SCHEMA_VERSION};
use vcbench_core::policy::{RetryConfig, RetryingService};
use vcbench_core::{
    AbandonPolicy, AttributeTemplate, BatchIssuer, IssuanceService, IssueEvent, IssuerConfig,
    OfferFactory, RunStatistics,
};
use vcbench_http::{AgentAdminClient, AgentClientConfig};

#[derive(Debug, Clone, Args)]
pub struct IssueArgs {
    /// Agent admin API base URL
    #[arg(long, env = "AGENT_ADMIN_URL", default_value = "http://localhost:8034")]
    pub admin_url: String,

    /// Admin API key (x-api-key header)
    #[arg(long, env = "AGENT_ADMIN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Credentials to issue
    #[arg(long, env = "CRED_COUNT", default_value_t = 300)]
    pub total_count: usize,

    /// Maximum unacknowledged exchanges in flight
    #[arg(long, env = "CRED_BATCH", default_value_t = 32)]
    pub max_in_flight: usize,

    /// Poll rounds per drain cycle before it times out
    #[arg(long, env = "POLL_BATCH_LIMIT", default_value_t = 100)]
    pub poll_batch_limit: u32,

    /// Sleep between poll rounds, in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 100)]
    pub poll_interval_ms: u64,

    /// What to do with exchanges left after a drain timeout: purge | retain
    #[arg(long, env = "ABANDON_POLICY", default_value = "purge")]
    pub abandon_policy: AbandonPolicy,

    /// Alias of the connection to issue over
    #[arg(long, env = "AGENT_CONNECTION_ALIAS", default_value = "tob-agent")]
    pub connection_alias: String,

    #[arg(long, env = "SCHEMA_NAME", default_value = REGISTRATION_SCHEMA_NAME)]
    pub schema_name: String,

    #[arg(long, env = "SCHEMA_VERSION", default_value = REGISTRATION_SCHEMA_VERSION)]
    pub schema_version: String,

    /// Retries for transport failures (0 = fail on the first one)
    #[arg(long, env = "AGENT_MAX_RETRIES", default_value_t = 0)]
    pub max_retries: u32,

    /// Per-request timeout, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl IssueArgs {
    fn issuer_config(&self) -> IssuerConfig {
        IssuerConfig::new(self.total_count, self.max_in_flight)
            .poll_batch_limit(self.poll_batch_limit)
            .poll_interval(Duration::from_millis(self.poll_interval_ms))
            .abandon_policy(self.abandon_policy)
    }
}

pub async fn run(args: IssueArgs) -> Result<()> {
    let config = args.issuer_config();
    config.validate()?;

    let client = AgentAdminClient::new(
        AgentClientConfig::new(&args.admin_url)
            .api_key(args.api_key.clone())
            .request_timeout(Duration::from_secs(args.request_timeout_secs)),
    )?;

    let target = client
        .resolve_target(&args.schema_name, &args.schema_version, &args.connection_alias)
        .await
        .with_context(|| format!("resolving issuance target on {}", args.admin_url))?;

    let template = if target.attributes.is_empty() {
        AttributeTemplate::registration()
    } else {
        AttributeTemplate::from_names(target.attributes)
    };
    let factory = OfferFactory::new(target.context, template);
    tracing::info!(
        cred_def_id = %factory.context().cred_def_id,
        connection_id = %factory.context().connection_id,
        attributes = factory.template().len(),
        "offer template ready"
    );

    let service: Arc<dyn IssuanceService> = if args.max_retries > 0 {
        Arc::new(RetryingService::new(
            client,
            RetryConfig {
                max_retries: args.max_retries,
                ..Default::default()
            },
        ))
    } else {
        Arc::new(client)
    };

    println!("Issuing credentials for: {}", factory.context().cred_def_id);
    let mut issuer = BatchIssuer::new(service, factory, config).on_progress(print_progress);

    let stats = tokio::select! {
        stats = issuer.run() => stats.context("issuance run failed")?,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            std::process::exit(1);
        }
    };

    print_summary(&stats);
    Ok(())
}

fn print_progress(event: &IssueEvent) {
    match event {
        IssueEvent::Submitted { count } => println!("Issued: {count}"),
        IssueEvent::Acknowledged { count } => println!("Acked: {count}"),
        IssueEvent::DrainTimedOut { in_flight, rounds } => {
            println!("timeout! {in_flight} unacknowledged after {rounds} poll rounds")
        }
    }
}

fn print_summary(stats: &RunStatistics) {
    println!();
    println!("  Submitted:    {}", stats.submitted);
    println!("  Acknowledged: {}", stats.acknowledged);
    if stats.timeouts > 0 {
        println!("  Timeouts:     {} ({} abandoned)", stats.timeouts, stats.abandoned);
    }
    println!("  Elapsed:      {:.3}s", stats.elapsed.as_secs_f64());
    println!("  Throughput:   {:.1} acks/min", stats.acks_per_minute());
}

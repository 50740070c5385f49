//! The bounded in-flight issuance loop.
//!
//! # Submission
//! Offers are submitted one at a time. Each accepted exchange joins the
//! in-flight set.
//!
//! # Drain cycle
//! Once the in-flight set reaches `max_in_flight` (or after the final
//! submission while anything is still in flight) the loop polls every
//! in-flight exchange, round after round, removing the acknowledged ones:
//!   - at most `poll_batch_limit` rounds per cycle
//!   - `poll_interval` sleep after a round that left the set at or above the width
//!   - a cycle that spends its whole budget with anything still in flight
//!     times out; leftover exchanges are handled per [`AbandonPolicy`]
//!
//! Any error from the service other than a drain timeout ends the run.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{AbandonPolicy, IssuerConfig};
use crate::error::IssuanceError;
use crate::exchange::ExchangeHandle;
use crate::inflight::InFlightSet;
use crate::offer::OfferFactory;
use crate::service::IssuanceService;
use crate::stats::RunStatistics;

/// Progress is reported every this many submissions / acknowledgements.
pub const PROGRESS_EVERY: usize = 50;

/// Progress notifications emitted by the issuance loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueEvent {
    /// `count` offers submitted so far.
    Submitted { count: usize },
    /// `count` exchanges acknowledged so far.
    Acknowledged { count: usize },
    /// A drain cycle used up its poll budget.
    DrainTimedOut { in_flight: usize, rounds: u32 },
}

type ProgressCallback = Box<dyn Fn(&IssueEvent) + Send + Sync>;

/// Issues credentials while keeping at most `max_in_flight` exchanges unacknowledged.
pub struct BatchIssuer<S, R = StdRng> {
    service: S,
    factory: OfferFactory,
    config: IssuerConfig,
    rng: R,
    in_flight: InFlightSet,
    submitted: Vec<ExchangeHandle>,
    on_progress: Option<ProgressCallback>,
}

impl<S: IssuanceService> BatchIssuer<S, StdRng> {
    /// Create an issuer with an entropy-seeded random source.
    pub fn new(service: S, factory: OfferFactory, config: IssuerConfig) -> Self {
        Self {
            service,
            factory,
            config,
            rng: StdRng::from_entropy(),
            in_flight: InFlightSet::new(),
            submitted: Vec::new(),
            on_progress: None,
        }
    }
}

impl<S: IssuanceService, R: Rng> BatchIssuer<S, R> {
    /// Replace the random source used to vary offer attribute values.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> BatchIssuer<S, R2> {
        BatchIssuer {
            service: self.service,
            factory: self.factory,
            config: self.config,
            rng,
            in_flight: self.in_flight,
            submitted: self.submitted,
            on_progress: self.on_progress,
        }
    }

    pub fn on_progress<F: Fn(&IssueEvent) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Exchanges still tracked as unacknowledged.
    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    /// Every exchange submitted by the last run, in submission order.
    pub fn submitted(&self) -> &[ExchangeHandle] {
        &self.submitted
    }

    /// Issue `total_count` credentials and return the run's statistics.
    pub async fn run(&mut self) -> Result<RunStatistics, IssuanceError> {
        self.config.validate()?;
        self.in_flight = InFlightSet::new();
        self.submitted.clear();

        let total = self.config.total_count;
        let mut stats = RunStatistics::default();
        let start = Instant::now();

        tracing::info!(
            total,
            max_in_flight = self.config.max_in_flight,
            cred_def_id = %self.factory.context().cred_def_id,
            endpoint = %self.service.endpoint(),
            "issuing credentials"
        );

        for i in 1..=total {
            let offer = self.factory.build(&mut self.rng);
            let handle = self.service.submit(&offer).await?;
            tracing::trace!(exchange = %handle, "offer submitted");

            self.in_flight.insert(handle.clone());
            self.submitted.push(handle);
            stats.submitted += 1;
            if stats.submitted % PROGRESS_EVERY == 0 {
                self.emit(IssueEvent::Submitted { count: stats.submitted });
            }

            let is_last = i == total;
            if self.needs_drain(is_last) {
                self.drain(is_last, &mut stats).await?;
            }
        }

        stats.elapsed = start.elapsed();
        tracing::info!(
            submitted = stats.submitted,
            acknowledged = stats.acknowledged,
            abandoned = stats.abandoned,
            timeouts = stats.timeouts,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            acks_per_minute = stats.acks_per_minute(),
            "batch issuance complete"
        );
        Ok(stats)
    }

    fn needs_drain(&self, is_last: bool) -> bool {
        self.in_flight.len() >= self.config.max_in_flight || (is_last && !self.in_flight.is_empty())
    }

    async fn drain(&mut self, is_last: bool, stats: &mut RunStatistics) -> Result<(), IssuanceError> {
        stats.drain_cycles += 1;
        let rounds = self.config.poll_batch_limit;
        let mut budget = rounds;

        tracing::debug!(
            cycle = stats.drain_cycles,
            in_flight = self.in_flight.len(),
            is_last,
            "drain cycle started"
        );

        while self.needs_drain(is_last) && budget > 0 {
            for handle in self.in_flight.snapshot() {
                let state = self.service.status(&handle).await?;
                if state.is_acknowledged() {
                    self.in_flight.remove(&handle);
                    stats.acknowledged += 1;
                    if stats.acknowledged % PROGRESS_EVERY == 0 {
                        self.emit(IssueEvent::Acknowledged { count: stats.acknowledged });
                    }
                } else {
                    tracing::trace!(exchange = %handle, %state, "exchange pending");
                }
            }

            if self.in_flight.len() >= self.config.max_in_flight {
                tokio::time::sleep(self.config.poll_interval).await;
            }
            budget -= 1;
        }

        if budget == 0 && !self.in_flight.is_empty() {
            let in_flight = self.in_flight.len();
            let timeout = IssuanceError::Timeout { in_flight, rounds };
            tracing::warn!(
                cycle = stats.drain_cycles,
                policy = %self.config.abandon_policy,
                error = %timeout,
                "drain cycle timed out"
            );
            stats.timeouts += 1;
            self.emit(IssueEvent::DrainTimedOut { in_flight, rounds });

            if self.config.abandon_policy == AbandonPolicy::Purge {
                let abandoned = self.in_flight.drain();
                stats.abandoned += abandoned.len();
            }
        }
        Ok(())
    }

    fn emit(&self, event: IssueEvent) {
        match &event {
            IssueEvent::Submitted { count } => tracing::info!(count, "issued"),
            IssueEvent::Acknowledged { count } => tracing::info!(count, "acked"),
            IssueEvent::DrainTimedOut { .. } => {}
        }
        if let Some(cb) = &self.on_progress {
            cb(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeState;
    use crate::offer::{AttributeTemplate, CredentialOffer, OfferContext};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct AckingService {
        submits: AtomicUsize,
        fail_status: bool,
    }

    #[async_trait]
    impl IssuanceService for AckingService {
        async fn submit(&self, _offer: &CredentialOffer) -> Result<ExchangeHandle, IssuanceError> {
            let n = self.submits.fetch_add(1, Ordering::SeqCst);
            Ok(ExchangeHandle::new(format!("x-{n}")))
        }

        async fn status(&self, _handle: &ExchangeHandle) -> Result<ExchangeState, IssuanceError> {
            if self.fail_status {
                Err(IssuanceError::Transport("connection reset".into()))
            } else {
                Ok(ExchangeState::CredentialAcked)
            }
        }

        fn endpoint(&self) -> &str {
            "mock"
        }
    }

    fn factory() -> OfferFactory {
        OfferFactory::new(
            OfferContext::new("s:2:n:1.0", "n", "1.0", "did:3:CL:1:default", "c"),
            AttributeTemplate::from_names(["a", "b"]),
        )
    }

    fn service(fail_status: bool) -> AckingService {
        AckingService { submits: AtomicUsize::new(0), fail_status }
    }

    #[tokio::test]
    async fn zero_total_does_nothing() {
        let mut issuer = BatchIssuer::new(service(false), factory(), IssuerConfig::new(0, 4));
        let stats = issuer.run().await.unwrap();
        assert_eq!(stats.submitted, 0);
        assert_eq!(stats.drain_cycles, 0);
        assert_eq!(issuer.service().submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_submitting() {
        let mut issuer = BatchIssuer::new(service(false), factory(), IssuerConfig::new(3, 0));
        let err = issuer.run().await.unwrap_err();
        assert!(matches!(err, IssuanceError::Config(_)));
        assert_eq!(issuer.service().submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_failure_is_fatal() {
        let mut issuer = BatchIssuer::new(service(true), factory(), IssuerConfig::new(4, 2));
        let err = issuer.run().await.unwrap_err();
        assert!(err.is_retryable());
        // the first drain cycle fails right after the second submission
        assert_eq!(issuer.service().submits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn progress_reported_at_fixed_cadence() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = events.clone();
        let config = IssuerConfig::new(120, 10).poll_interval(Duration::ZERO);
        let mut issuer = BatchIssuer::new(service(false), factory(), config)
            .with_rng(StdRng::seed_from_u64(9))
            .on_progress(move |e| sink.lock().unwrap().push(e.clone()));

        issuer.run().await.unwrap();

        let events = events.lock().unwrap();
        let submitted: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                IssueEvent::Submitted { count } => Some(*count),
                _ => None,
            })
            .collect();
        assert_eq!(submitted, vec![50, 100]);
        assert!(events.contains(&IssueEvent::Acknowledged { count: 100 }));
    }

    #[tokio::test]
    async fn rerun_resets_tracking() {
        let mut issuer = BatchIssuer::new(service(false), factory(), IssuerConfig::new(3, 2));
        issuer.run().await.unwrap();
        let stats = issuer.run().await.unwrap();
        assert_eq!(stats.submitted, 3);
        assert_eq!(issuer.submitted().len(), 3);
        assert!(issuer.in_flight().is_empty());
    }
}

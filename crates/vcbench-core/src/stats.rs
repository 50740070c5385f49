//! Throughput summary of a batch issuance run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters collected by one [`BatchIssuer`](crate::BatchIssuer) run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Offers accepted by the service.
    pub submitted: usize,
    /// Exchanges observed in the acknowledged state.
    pub acknowledged: usize,
    /// Exchanges dropped from tracking after a drain cycle timed out.
    pub abandoned: usize,
    /// Drain cycles started.
    pub drain_cycles: usize,
    /// Drain cycles that used up their poll budget.
    pub timeouts: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl RunStatistics {
    /// Acknowledgements per minute; zero for an instantaneous run.
    pub fn acks_per_minute(&self) -> f64 {
        per_minute(self.acknowledged, self.elapsed)
    }

    /// Submissions per minute; zero for an instantaneous run.
    pub fn submitted_per_minute(&self) -> f64 {
        per_minute(self.submitted, self.elapsed)
    }
}

fn per_minute(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    60.0 * count as f64 / secs
}

impl std::fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Issued: {}, Acked: {}, Abandoned: {}, Timeouts: {}, Processing time: {:.3}s, {:.1} acks/min",
            self.submitted,
            self.acknowledged,
            self.abandoned,
            self.timeouts,
            self.elapsed.as_secs_f64(),
            self.acks_per_minute(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throughput_per_minute() {
        let stats = RunStatistics {
            submitted: 300,
            acknowledged: 150,
            elapsed: Duration::from_secs(30),
            ..Default::default()
        };
        assert!((stats.submitted_per_minute() - 600.0).abs() < 1e-9);
        assert!((stats.acks_per_minute() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn zero_elapsed_is_zero_rate() {
        let stats = RunStatistics { acknowledged: 5, ..Default::default() };
        assert_eq!(stats.acks_per_minute(), 0.0);
    }

    #[test]
    fn summary_line() {
        let stats = RunStatistics {
            submitted: 2,
            acknowledged: 2,
            elapsed: Duration::from_secs(1),
            ..Default::default()
        };
        let line = stats.to_string();
        assert!(line.starts_with("Issued: 2, Acked: 2"));
        assert!(line.contains("120.0 acks/min"));
    }
}

//! Batch issuer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::IssuanceError;

/// What to do with exchanges still unacknowledged when a drain cycle times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbandonPolicy {
    /// Drop them from the in-flight set; they no longer count against the width.
    #[default]
    Purge,
    /// Keep them in the in-flight set so later drain cycles re-poll them.
    Retain,
}

impl std::str::FromStr for AbandonPolicy {
    type Err = IssuanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "purge" => Ok(Self::Purge),
            "retain" => Ok(Self::Retain),
            other => Err(IssuanceError::Config(format!(
                "unknown abandon policy '{other}' (expected 'purge' or 'retain')"
            ))),
        }
    }
}

impl std::fmt::Display for AbandonPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Purge => write!(f, "purge"),
            Self::Retain => write!(f, "retain"),
        }
    }
}

/// Configuration for one [`BatchIssuer`](crate::BatchIssuer) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Number of credentials to issue.
    pub total_count: usize,
    /// Maximum number of unacknowledged exchanges before submission pauses.
    pub max_in_flight: usize,
    /// Poll rounds allowed per drain cycle before it times out.
    pub poll_batch_limit: u32,
    /// Sleep between poll rounds while still at or above `max_in_flight`.
    pub poll_interval: Duration,
    /// Handling of exchanges left over by a timed-out drain cycle.
    pub abandon_policy: AbandonPolicy,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            total_count: 300,
            max_in_flight: 32,
            poll_batch_limit: 100,
            poll_interval: Duration::from_millis(100),
            abandon_policy: AbandonPolicy::Purge,
        }
    }
}

impl IssuerConfig {
    /// Config for `total_count` credentials at width `max_in_flight`, other settings default.
    pub fn new(total_count: usize, max_in_flight: usize) -> Self {
        Self {
            total_count,
            max_in_flight,
            ..Default::default()
        }
    }

    pub fn poll_batch_limit(mut self, rounds: u32) -> Self {
        self.poll_batch_limit = rounds;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn abandon_policy(mut self, policy: AbandonPolicy) -> Self {
        self.abandon_policy = policy;
        self
    }

    /// Reject settings the issuance loop cannot honour.
    pub fn validate(&self) -> Result<(), IssuanceError> {
        if self.max_in_flight == 0 {
            return Err(IssuanceError::Config("max_in_flight must be at least 1".into()));
        }
        if self.poll_batch_limit == 0 {
            return Err(IssuanceError::Config("poll_batch_limit must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let c = IssuerConfig::default();
        assert_eq!(c.total_count, 300);
        assert_eq!(c.max_in_flight, 32);
        assert_eq!(c.poll_batch_limit, 100);
        assert_eq!(c.poll_interval, Duration::from_millis(100));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_width_rejected() {
        let err = IssuerConfig::new(10, 0).validate().unwrap_err();
        assert!(matches!(err, IssuanceError::Config(_)));
    }

    #[test]
    fn zero_poll_budget_rejected() {
        let err = IssuerConfig::new(10, 2).poll_batch_limit(0).validate().unwrap_err();
        assert!(matches!(err, IssuanceError::Config(_)));
    }

    #[test]
    fn zero_total_is_valid() {
        assert!(IssuerConfig::new(0, 1).validate().is_ok());
    }

    #[test]
    fn abandon_policy_parse() {
        assert_eq!("Retain".parse::<AbandonPolicy>().unwrap(), AbandonPolicy::Retain);
        assert_eq!("purge".parse::<AbandonPolicy>().unwrap(), AbandonPolicy::Purge);
        assert!("drop".parse::<AbandonPolicy>().is_err());
    }
}

//! Resilience policies layered on top of an [`IssuanceService`](crate::IssuanceService).
//!
//! The batch issuer never retries; wrap the service in a [`RetryingService`]
//! to absorb transient transport failures instead.

pub mod retry;

pub use retry::{RetryConfig, RetryingService};

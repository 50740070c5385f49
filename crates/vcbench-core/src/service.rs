//! The `IssuanceService` trait: the seam between the batch issuer and an agent.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::IssuanceError;
use crate::exchange::{ExchangeHandle, ExchangeState};
use crate::offer::CredentialOffer;

/// An external service that issues credentials and reports exchange state.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so they can be shared across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn IssuanceService>`.
#[async_trait]
pub trait IssuanceService: Send + Sync {
    /// Submit one credential offer and return the handle of the new exchange.
    async fn submit(&self, offer: &CredentialOffer) -> Result<ExchangeHandle, IssuanceError>;

    /// Fetch the current state of an exchange.
    async fn status(&self, handle: &ExchangeHandle) -> Result<ExchangeState, IssuanceError>;

    /// Return the service's identifier (base URL or name).
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<S: IssuanceService + ?Sized> IssuanceService for Arc<S> {
    async fn submit(&self, offer: &CredentialOffer) -> Result<ExchangeHandle, IssuanceError> {
        (**self).submit(offer).await
    }

    async fn status(&self, handle: &ExchangeHandle) -> Result<ExchangeState, IssuanceError> {
        (**self).status(handle).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

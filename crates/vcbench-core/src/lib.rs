//! vcbench-core: foundation traits and types for vcbench.
//!
//! # Overview
//!
//! vcbench drives a credential-issuing agent at a fixed concurrency width
//! and measures how fast issued credentials are acknowledged. The core crate
//! defines:
//!
//! - [`IssuanceService`]: the async trait every issuance backend implements
//! - [`CredentialOffer`] / [`OfferFactory`]: randomized offer payloads
//! - [`ExchangeHandle`] / [`ExchangeState`]: exchange lifecycle types
//! - [`BatchIssuer`]: the bounded in-flight submit/poll loop
//! - [`RunStatistics`]: throughput summary of one run
//! - [`IssuanceError`]: structured error type
//! - [`policy`] module: retry wrapper for transient transport failures

pub mod config;
pub mod error;
pub mod exchange;
pub mod inflight;
pub mod issuer;
pub mod offer;
pub mod policy;
pub mod service;
pub mod stats;

pub use config::{AbandonPolicy, IssuerConfig};
pub use error::IssuanceError;
pub use exchange::{ExchangeHandle, ExchangeState};
pub use inflight::InFlightSet;
pub use issuer::{BatchIssuer, IssueEvent, PROGRESS_EVERY};
pub use offer::{AttributeTemplate, CredentialAttribute, CredentialOffer, OfferContext, OfferFactory};
pub use service::IssuanceService;
pub use stats::RunStatistics;

//! vcbench-http: agent admin API client.
//!
//! Implements [`vcbench_core::IssuanceService`] over the agent's admin REST
//! API and adds the lookups needed to build offers: schemas, credential
//! definitions and connections.

pub mod client;
pub mod discovery;
pub mod types;

pub use client::{AgentAdminClient, AgentClientConfig};
pub use discovery::{schema_key, IssuanceTarget, SchemaCatalog, SchemaEntry};

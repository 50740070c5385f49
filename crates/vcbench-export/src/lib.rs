//! # vcbench-export
//!
//! Exports a sample of issued registration credentials as CSV, one row per
//! corporation, capped per entity type.
//!
//! ## Sources
//! - [`memory::MemoryCredentialLog`]: rows held in RAM (tests, fixtures)
//! - `postgres::PgCredentialLog`: the `credential_log` table (feature `postgres`)

pub mod error;
pub mod exporter;
pub mod memory;
pub mod record;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use error::ExportError;
pub use exporter::{CorpExporter, CorpSelector, ExportSummary, CSV_HEADER};
pub use record::{CorpExportRow, CredentialLogRow, CredentialLogSource};

//! Admin API response bodies.
//!
//! Only the fields vcbench reads are modelled; everything else in the agent's
//! records is ignored.

use serde::{Deserialize, Serialize};
use vcbench_core::ExchangeState;

/// Response of `POST /issue-credential/send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub credential_exchange_id: String,
    #[serde(default)]
    pub state: Option<ExchangeState>,
}

/// Response of `GET /issue-credential/records/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRecord {
    #[serde(default)]
    pub credential_exchange_id: Option<String>,
    pub state: ExchangeState,
}

/// Response of `GET /schemas/created`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemasCreated {
    pub schema_ids: Vec<String>,
}

/// Response of `GET /schemas/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: Option<Schema>,
}

/// A ledger schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "attrNames", default)]
    pub attr_names: Vec<String>,
    /// Ledger sequence number; credential definitions refer to the schema by it.
    #[serde(rename = "seqNo", default)]
    pub seq_no: Option<u64>,
}

/// Response of `GET /credential-definitions/created`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredDefsCreated {
    pub credential_definition_ids: Vec<String>,
}

/// Response of `GET /credential-definitions/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredDefResponse {
    pub credential_definition: Option<CredentialDefinition>,
}

/// A ledger credential definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDefinition {
    pub id: String,
    /// Sequence number of the schema, as a string.
    #[serde(rename = "schemaId")]
    pub schema_id: String,
    #[serde(default)]
    pub tag: Option<String>,
}

/// Response of `GET /connections`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionList {
    pub results: Vec<ConnectionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub connection_id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

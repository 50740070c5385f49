//! Schema, credential definition and connection discovery.
//!
//! Resolves the identifiers an offer must carry from what the agent has
//! already published: the schema (by name and version), the credential
//! definition created for it, and the connection to the holder (by alias).

use std::collections::HashMap;

use vcbench_core::{IssuanceError, OfferContext};

use crate::client::AgentAdminClient;
use crate::types::{
    ConnectionList, ConnectionRecord, CredDefResponse, CredDefsCreated, CredentialDefinition, Schema,
    SchemaResponse, SchemasCreated,
};

/// Catalog key of a schema: `<name>::<version>`.
pub fn schema_key(name: &str, version: &str) -> String {
    format!("{name}::{version}")
}

/// A schema created by the agent and, if any, its credential definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub schema: Schema,
    pub cred_def: Option<CredentialDefinition>,
}

/// Schemas created by the agent, keyed by [`schema_key`].
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entries: HashMap<String, SchemaEntry>,
}

impl SchemaCatalog {
    pub fn get(&self, name: &str, version: &str) -> Option<&SchemaEntry> {
        self.entries.get(&schema_key(name, version))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_schema(&mut self, schema: Schema) {
        let key = schema_key(&schema.name, &schema.version);
        self.entries.insert(key, SchemaEntry { schema, cred_def: None });
    }

    /// Attach `cred_def` to the schema whose sequence number it references.
    /// Returns `false` if no schema matches.
    fn attach_cred_def(&mut self, cred_def: CredentialDefinition) -> bool {
        let entry = self.entries.values_mut().find(|e| {
            e.schema
                .seq_no
                .is_some_and(|seq| seq.to_string() == cred_def.schema_id)
        });
        match entry {
            Some(e) => {
                e.cred_def = Some(cred_def);
                true
            }
            None => false,
        }
    }
}

/// Everything needed to issue against one schema over one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceTarget {
    pub context: OfferContext,
    /// Attribute names declared by the schema, in ledger order.
    pub attributes: Vec<String>,
}

impl AgentAdminClient {
    /// Load every schema and credential definition the agent has created.
    pub async fn discover_schemas(&self) -> Result<SchemaCatalog, IssuanceError> {
        let mut catalog = SchemaCatalog::default();

        let created: SchemasCreated = self.get_json("schemas/created", &[]).await?;
        for schema_id in &created.schema_ids {
            let resp: SchemaResponse = self.get_json(&format!("schemas/{schema_id}"), &[]).await?;
            match resp.schema {
                Some(schema) => catalog.insert_schema(schema),
                None => tracing::debug!(%schema_id, "schema not found on ledger"),
            }
        }

        let created: CredDefsCreated = self.get_json("credential-definitions/created", &[]).await?;
        for cred_def_id in &created.credential_definition_ids {
            let resp: CredDefResponse = self
                .get_json(&format!("credential-definitions/{cred_def_id}"), &[])
                .await?;
            if let Some(cred_def) = resp.credential_definition {
                if !catalog.attach_cred_def(cred_def) {
                    tracing::debug!(%cred_def_id, "credential definition matches no created schema");
                }
            }
        }

        tracing::info!(schemas = catalog.len(), "schema discovery complete");
        Ok(catalog)
    }

    /// First connection registered under `alias`.
    pub async fn find_connection(&self, alias: &str) -> Result<ConnectionRecord, IssuanceError> {
        let list: ConnectionList = self.get_json("connections", &[("alias", alias)]).await?;
        list.results
            .into_iter()
            .next()
            .ok_or_else(|| IssuanceError::Discovery(format!("no connection with alias '{alias}'")))
    }

    /// Resolve schema, credential definition and connection into an issuance target.
    pub async fn resolve_target(
        &self,
        schema_name: &str,
        schema_version: &str,
        connection_alias: &str,
    ) -> Result<IssuanceTarget, IssuanceError> {
        let catalog = self.discover_schemas().await?;
        let key = schema_key(schema_name, schema_version);
        let entry = catalog
            .get(schema_name, schema_version)
            .ok_or_else(|| IssuanceError::Discovery(format!("schema '{key}' not created by agent")))?;
        let cred_def = entry.cred_def.as_ref().ok_or_else(|| {
            IssuanceError::Discovery(format!("no credential definition for schema '{key}'"))
        })?;
        let connection = self.find_connection(connection_alias).await?;

        tracing::info!(
            schema_id = %entry.schema.id,
            cred_def_id = %cred_def.id,
            connection_id = %connection.connection_id,
            "issuance target resolved"
        );

        Ok(IssuanceTarget {
            context: OfferContext::new(
                entry.schema.id.clone(),
                entry.schema.name.clone(),
                entry.schema.version.clone(),
                cred_def.id.clone(),
                connection.connection_id,
            ),
            attributes: entry.schema.attr_names.clone(),
        })
    }
}

//! Credential log rows and the flattened export record.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExportError;

/// Credential type code of registration credentials in the log.
pub const REGISTRATION_TYPE_CD: &str = "REG";

/// One issued credential as recorded in the credential log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialLogRow {
    pub corp_num: String,
    pub corp_state: Option<String>,
    pub credential_type_cd: String,
    /// The issued credential's attribute map.
    pub credential_json: Value,
    pub entry_date: Option<NaiveDateTime>,
}

impl CredentialLogRow {
    /// Attribute value as text; `None` when absent, empty string when null.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.credential_json.get(name).map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    pub(crate) fn required(&self, field: &'static str) -> Result<String, ExportError> {
        self.attribute(field).ok_or_else(|| ExportError::Payload {
            corp_num: self.corp_num.clone(),
            field,
        })
    }
}

/// One CSV line of the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpExportRow {
    pub corp_num: String,
    pub corp_type: String,
    pub corp_state: String,
    pub corp_name: String,
    pub corp_name_assumed: String,
    pub effective_date: String,
}

/// Where registration credential rows come from.
///
/// Implementations return rows newest first.
#[async_trait]
pub trait CredentialLogSource: Send + Sync {
    async fn registrations(&self) -> Result<Vec<CredentialLogRow>, ExportError>;
}

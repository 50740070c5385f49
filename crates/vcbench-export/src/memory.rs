//! In-memory credential log.
//!
//! Useful for tests and for exporting rows already loaded from elsewhere.

use async_trait::async_trait;

use crate::error::ExportError;
use crate::record::{CredentialLogRow, CredentialLogSource, REGISTRATION_TYPE_CD};

/// Credential log rows held in RAM.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialLog {
    rows: Vec<CredentialLogRow>,
}

impl MemoryCredentialLog {
    pub fn new(rows: Vec<CredentialLogRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl CredentialLogSource for MemoryCredentialLog {
    /// Registration rows, newest `entry_date` first; undated rows keep their order at the end.
    async fn registrations(&self) -> Result<Vec<CredentialLogRow>, ExportError> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .filter(|r| r.credential_type_cd == REGISTRATION_TYPE_CD)
            .cloned()
            .collect();
        rows.sort_by(|a, b| match (a.entry_date, b.entry_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn row(corp_num: &str, type_cd: &str, day: Option<u32>) -> CredentialLogRow {
        CredentialLogRow {
            corp_num: corp_num.into(),
            corp_state: None,
            credential_type_cd: type_cd.into(),
            credential_json: json!({}),
            entry_date: day.and_then(|d| NaiveDate::from_ymd_opt(2019, 5, d)?.and_hms_opt(0, 0, 0)),
        }
    }

    #[tokio::test]
    async fn registrations_newest_first() {
        let log = MemoryCredentialLog::new(vec![
            row("old", "REG", Some(1)),
            row("rel", "REL", Some(9)),
            row("undated", "REG", None),
            row("new", "REG", Some(3)),
        ]);
        let rows = log.registrations().await.unwrap();
        let order: Vec<_> = rows.iter().map(|r| r.corp_num.as_str()).collect();
        assert_eq!(order, vec!["new", "old", "undated"]);
    }
}

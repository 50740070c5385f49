//! Per-corporation selection and CSV output.

use std::collections::{BTreeMap, HashSet};
use std::io;

use crate::error::ExportError;
use crate::record::{CorpExportRow, CredentialLogRow, CredentialLogSource};

/// Column order of the export file.
pub const CSV_HEADER: [&str; 6] = [
    "corp_num",
    "corp_type",
    "corp_state",
    "corp_name",
    "corp_name_assumed",
    "effective_date",
];

/// Picks the first (newest) row of each corporation, at most
/// `max_per_type` corporations per entity type.
///
/// A corporation rejected by the cap is not remembered, so a later row for
/// it is counted against its type again.
#[derive(Debug)]
pub struct CorpSelector {
    max_per_type: usize,
    seen: HashSet<String>,
    per_type: BTreeMap<String, usize>,
}

impl CorpSelector {
    pub fn new(max_per_type: usize) -> Self {
        Self {
            max_per_type,
            seen: HashSet::new(),
            per_type: BTreeMap::new(),
        }
    }

    /// Returns the export row for `row`, or `None` if it is skipped.
    pub fn select(&mut self, row: &CredentialLogRow) -> Result<Option<CorpExportRow>, ExportError> {
        if self.seen.contains(&row.corp_num) {
            return Ok(None);
        }

        let corp_type = row.required("entity_type")?;
        let count = self.per_type.entry(corp_type.clone()).or_insert(0);
        *count += 1;
        if *count > self.max_per_type {
            return Ok(None);
        }

        self.seen.insert(row.corp_num.clone());
        Ok(Some(CorpExportRow {
            corp_num: row.required("registration_id")?,
            corp_type,
            corp_state: row.attribute("entity_status").unwrap_or_default(),
            corp_name: row.attribute("entity_name").unwrap_or_default(),
            corp_name_assumed: row.attribute("entity_name_assumed").unwrap_or_default(),
            effective_date: row.attribute("effective_date").unwrap_or_default(),
        }))
    }

    /// Corporations seen per entity type, including those over the cap.
    pub fn type_counts(&self) -> &BTreeMap<String, usize> {
        &self.per_type
    }
}

/// Outcome of one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows_read: usize,
    pub corps_written: usize,
    pub per_type: BTreeMap<String, usize>,
}

/// Writes the per-corporation CSV.
#[derive(Debug, Clone)]
pub struct CorpExporter {
    max_per_type: usize,
}

impl Default for CorpExporter {
    fn default() -> Self {
        Self { max_per_type: 100 }
    }
}

impl CorpExporter {
    pub fn new(max_per_type: usize) -> Self {
        Self { max_per_type }
    }

    /// Fetch registrations from `source` and write them to `out`.
    pub async fn export<S, W>(&self, source: &S, out: W) -> Result<ExportSummary, ExportError>
    where
        S: CredentialLogSource + ?Sized,
        W: io::Write,
    {
        tracing::info!("running credential log query");
        let rows = source.registrations().await?;
        tracing::info!(rows = rows.len(), "writing csv");
        self.write_rows(rows, out)
    }

    /// Write the header and one line per selected corporation.
    pub fn write_rows<I, W>(&self, rows: I, out: W) -> Result<ExportSummary, ExportError>
    where
        I: IntoIterator<Item = CredentialLogRow>,
        W: io::Write,
    {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        writer.write_record(CSV_HEADER)?;

        let mut selector = CorpSelector::new(self.max_per_type);
        let mut summary = ExportSummary::default();
        for row in rows {
            summary.rows_read += 1;
            if let Some(record) = selector.select(&row)? {
                writer.serialize(&record)?;
                summary.corps_written += 1;
            }
        }
        writer.flush()?;

        summary.per_type = selector.type_counts().clone();
        tracing::info!(
            rows_read = summary.rows_read,
            corps_written = summary.corps_written,
            "export complete"
        );
        Ok(summary)
    }
}

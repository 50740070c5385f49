//! `vcbench export`: flatten issued registrations into a CSV file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use vcbench_export::postgres::PgCredentialLog;
use vcbench_export::CorpExporter;

pub async fn run(database_url: &str, output: &Path, max_per_type: usize) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("cannot create {}", output.display()))?;

    println!("Connecting ...");
    let log = PgCredentialLog::connect(database_url)
        .await
        .context("connecting to credential log")?;

    println!("Writing {} ...", output.display());
    let summary = CorpExporter::new(max_per_type)
        .export(&log, BufWriter::new(file))
        .await?;

    println!("  Rows read:      {}", summary.rows_read);
    println!("  Corps written:  {}", summary.corps_written);
    for (corp_type, count) in &summary.per_type {
        println!("    {corp_type:<6} {count}");
    }
    println!("Done.");
    Ok(())
}

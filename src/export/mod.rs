//! Diagnosis history export.
//!
//! [`export_records`] turns the filtered, sorted history into a dated CSV
//! artifact. An empty set yields [`ExportOutcome::NothingToExport`] and no
//! file is produced.

mod csv;

pub use csv::{escape_field, to_csv, ExportRow, EXPORT_HEADERS};

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::error::{classify_io_error, HerdResult, ValidationError};
use crate::models::DiagnosisRecord;

/// File name prefix of every history export.
pub const EXPORT_FILE_PREFIX: &str = "diagnosis_history";

/// A rendered CSV ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvArtifact {
    pub file_name: String,
    pub contents: String,
    pub row_count: usize,
}

impl CsvArtifact {
    /// Write the artifact into `dir`, creating it if needed. Returns the file path.
    pub fn write_to(&self, dir: &Path) -> HerdResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .map_err(|e| classify_io_error(e, Some(dir.to_path_buf()), "create export directory"))?;

        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)
            .map_err(|e| classify_io_error(e, Some(path.clone()), "write export"))?;

        tracing::info!(rows = self.row_count, path = %path.display(), "Exported diagnosis history");
        Ok(path)
    }
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Ready(CsvArtifact),
    NothingToExport,
}

impl ExportOutcome {
    pub fn row_count(&self) -> usize {
        match self {
            ExportOutcome::Ready(artifact) => artifact.row_count,
            ExportOutcome::NothingToExport => 0,
        }
    }

    /// The artifact, or `ValidationError::NothingToExport`.
    pub fn into_artifact(self) -> Result<CsvArtifact, ValidationError> {
        match self {
            ExportOutcome::Ready(artifact) => Ok(artifact),
            ExportOutcome::NothingToExport => Err(ValidationError::NothingToExport),
        }
    }
}

/// `diagnosis_history_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}_{}.csv", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Export `records` in the given order, dated `date`.
pub fn export_records_on<'a, I>(records: I, date: NaiveDate) -> ExportOutcome
where
    I: IntoIterator<Item = &'a DiagnosisRecord>,
{
    let rows: Vec<ExportRow> = records.into_iter().map(ExportRow::from_record).collect();
    if rows.is_empty() {
        return ExportOutcome::NothingToExport;
    }

    ExportOutcome::Ready(CsvArtifact {
        file_name: export_file_name(date),
        row_count: rows.len(),
        contents: to_csv(&rows),
    })
}

/// Export `records` dated with today's local date.
pub fn export_records<'a, I>(records: I) -> ExportOutcome
where
    I: IntoIterator<Item = &'a DiagnosisRecord>,
{
    export_records_on(records, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64) -> DiagnosisRecord {
        serde_json::from_value(json!({
            "id": id,
            "cattle": { "id": 1, "tag_number": "T-1", "name": "Bossy" },
            "top_prediction": { "disease": "Mastitis", "confidence": 0.875 },
            "confidence": 0.875,
            "severity": "high",
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_set_is_nothing_to_export() {
        let outcome = export_records(std::iter::empty());
        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert_eq!(outcome.row_count(), 0);
        assert_eq!(
            outcome.into_artifact().unwrap_err(),
            ValidationError::NothingToExport
        );
    }

    #[test]
    fn test_file_name_uses_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "diagnosis_history_2024-03-09.csv");
    }

    #[test]
    fn test_artifact_counts_rows() {
        let records = vec![record(1), record(2)];
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let artifact = export_records_on(&records, date).into_artifact().unwrap();

        assert_eq!(artifact.row_count, 2);
        assert_eq!(artifact.contents.lines().count(), 3);
        assert!(artifact.contents.lines().nth(1).unwrap().starts_with("\"1\""));
    }

    #[test]
    fn test_write_to_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![record(7)];
        let artifact = export_records(&records).into_artifact().unwrap();

        let path = artifact.write_to(&dir.path().join("out")).unwrap();
        assert!(path.ends_with(&artifact.file_name));
        assert_eq!(std::fs::read_to_string(path).unwrap(), artifact.contents);
    }
}

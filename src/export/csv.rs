//! CSV rendering for diagnosis rows.

use chrono::SecondsFormat;

use crate::models::DiagnosisRecord;

/// Column names, in row order.
pub const EXPORT_HEADERS: [&str; 9] = [
    "id",
    "cattle_name",
    "disease",
    "confidence",
    "severity",
    "submitted_by",
    "created_at",
    "review_status",
    "reviewed_by",
];

/// One exported diagnosis, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub id: String,
    pub cattle_name: String,
    pub disease: String,
    pub confidence: String,
    pub severity: String,
    pub submitted_by: String,
    pub created_at: String,
    pub review_status: String,
    pub reviewed_by: String,
}

impl ExportRow {
    pub fn from_record(record: &DiagnosisRecord) -> Self {
        Self {
            id: record.id.to_string(),
            cattle_name: record.display_name.clone(),
            disease: record.display_disease.clone(),
            confidence: record.confidence_percent().unwrap_or_default(),
            severity: record.severity.as_str().to_string(),
            submitted_by: record.submitted_by.clone().unwrap_or_default(),
            created_at: record
                .created_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .unwrap_or_default(),
            review_status: record.review.status.as_str().to_string(),
            reviewed_by: record.review.reviewer.clone().unwrap_or_default(),
        }
    }

    fn fields(&self) -> [&str; 9] {
        [
            &self.id,
            &self.cattle_name,
            &self.disease,
            &self.confidence,
            &self.severity,
            &self.submitted_by,
            &self.created_at,
            &self.review_status,
            &self.reviewed_by,
        ]
    }
}

/// Wrap a field in double quotes, doubling any quote inside it.
pub fn escape_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn render_line<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Header plus one line per row, separated by `\n`.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(EXPORT_HEADERS));
    lines.extend(rows.iter().map(|row| render_line(row.fields())));
    lines.join("\n")
}

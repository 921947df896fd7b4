//! Diagnosis history list view.
//!
//! Owns the fetched collection plus the user's query, severity filter,
//! sort key and page. The pipeline runs search, then severity filter, then
//! a stable sort, then pagination. Its output is cached and rebuilt only
//! after one of those inputs changes.
//!
//! The page index is clamped into `0..page_count` whenever the derived
//! view is rebuilt, so a shrinking result set or a larger page size never
//! leaves the view past its last page.

use std::cmp::Ordering;
use std::ops::Range;

use crate::api::ApiClient;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::{HerdResult, ValidationError};
use crate::export::{export_records, ExportOutcome};
use crate::models::{DiagnosisRecord, Severity};

use super::load_guard::{LoadGuard, LoadTicket};

// ============================================================================
// Filter and sort keys
// ============================================================================

/// Severity filter selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl SeverityFilter {
    pub fn matches(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Low => severity == Severity::Low,
            SeverityFilter::Medium => severity == Severity::Medium,
            SeverityFilter::High => severity == Severity::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityFilter::All => "all",
            SeverityFilter::Low => "low",
            SeverityFilter::Medium => "medium",
            SeverityFilter::High => "high",
        }
    }
}

impl std::str::FromStr for SeverityFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(SeverityFilter::All),
            "low" => Ok(SeverityFilter::Low),
            "medium" => Ok(SeverityFilter::Medium),
            "high" => Ok(SeverityFilter::High),
            _ => Err(ValidationError::UnknownValue {
                kind: "severity",
                value: s.to_string(),
            }),
        }
    }
}

/// Ordering of the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    ConfidenceDesc,
    ConfidenceAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::ConfidenceDesc,
        SortKey::ConfidenceAsc,
    ];

    /// Records without a timestamp sort as the earliest; without a
    /// confidence as 0.
    pub fn compare(&self, a: &DiagnosisRecord, b: &DiagnosisRecord) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
            SortKey::ConfidenceDesc => confidence_of(b).total_cmp(&confidence_of(a)),
            SortKey::ConfidenceAsc => confidence_of(a).total_cmp(&confidence_of(b)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::ConfidenceDesc => "confidence_desc",
            SortKey::ConfidenceAsc => "confidence_asc",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "confidence_desc" => Ok(SortKey::ConfidenceDesc),
            "confidence_asc" => Ok(SortKey::ConfidenceAsc),
            _ => Err(ValidationError::UnknownValue {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

fn confidence_of(record: &DiagnosisRecord) -> f64 {
    record.confidence.unwrap_or(0.0)
}

// ============================================================================
// Pipeline stages
// ============================================================================

/// True when the record's display name or display disease contains the
/// trimmed query, ignoring case. An empty query matches everything.
pub fn matches_query(record: &DiagnosisRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record.display_name.to_lowercase().contains(&needle)
        || record.display_disease.to_lowercase().contains(&needle)
}

/// Search then severity filter, preserving input order.
pub fn filter_records<'a, I>(records: I, query: &str, severity: SeverityFilter) -> Vec<&'a DiagnosisRecord>
where
    I: IntoIterator<Item = &'a DiagnosisRecord>,
{
    records
        .into_iter()
        .filter(|r| matches_query(r, query))
        .filter(|r| severity.matches(r.severity))
        .collect()
}

/// Stable sort; equal keys keep their relative order.
pub fn sort_records(records: &mut [&DiagnosisRecord], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}

/// `max(1, ceil(len / page_size))`. A zero page size counts as one.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Index range of `page` within a list of `len` items.
pub fn page_bounds(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}

// ============================================================================
// Summary
// ============================================================================

/// Aggregates over the whole fetched collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub unknown: usize,
    pub pending_review: usize,
    /// Mean over records that carry a confidence.
    pub mean_confidence: Option<f64>,
}

impl HistorySummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DiagnosisRecord>,
    {
        let mut summary = Self::default();
        let mut confidence_sum = 0.0;
        let mut confidence_count = 0usize;

        for record in records {
            summary.total += 1;
            match record.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
                Severity::Unknown => summary.unknown += 1,
            }
            if record.review.status.is_pending() {
                summary.pending_review += 1;
            }
            if let Some(c) = record.confidence {
                confidence_sum += c;
                confidence_count += 1;
            }
        }

        if confidence_count > 0 {
            summary.mean_confidence = Some(confidence_sum / confidence_count as f64);
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Unknown => self.unknown,
        }
    }
}

// ============================================================================
// DiagnosisHistory
// ============================================================================

/// One rendered page of the history.
#[derive(Debug)]
pub struct HistoryPage<'a> {
    pub rows: Vec<&'a DiagnosisRecord>,
    /// Zero-based.
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Records left after search and severity filter.
    pub matching: usize,
    /// Records fetched.
    pub total: usize,
}

impl HistoryPage<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }
}

/// State container for the diagnosis history view.
#[derive(Debug)]
pub struct DiagnosisHistory {
    records: Vec<DiagnosisRecord>,
    query: String,
    severity: SeverityFilter,
    sort: SortKey,
    page: usize,
    page_size: usize,
    guard: LoadGuard,
    loading: bool,

    /// Indices into `records` after filter and sort.
    ordered: Vec<usize>,
    /// True when an input changed and `ordered` needs rebuilding.
    dirty: bool,
}

impl Default for DiagnosisHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosisHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            query: String::new(),
            severity: SeverityFilter::All,
            sort: SortKey::Newest,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            guard: LoadGuard::new(),
            loading: false,
            ordered: Vec::new(),
            dirty: true,
        }
    }

    /// Empty history with a custom page size.
    pub fn with_page_size(page_size: usize) -> Result<Self, ValidationError> {
        let mut history = Self::new();
        history.set_page_size(page_size)?;
        Ok(history)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Start a load and return its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loading = true;
        self.guard.begin()
    }

    /// Apply a finished load. Returns false when the ticket was stale and
    /// nothing changed.
    ///
    /// A failed load empties the collection; the error is only logged.
    pub fn commit_load(&mut self, ticket: LoadTicket, result: HerdResult<Vec<DiagnosisRecord>>) -> bool {
        if !self.guard.is_current(ticket) {
            tracing::debug!(generation = ticket.generation(), "Discarding stale diagnosis load");
            return false;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                tracing::debug!(count = records.len(), "Loaded diagnosis history");
                self.set_records(records);
            }
            Err(e) => {
                tracing::warn!(code = e.error_code(), "Failed to load diagnosis history: {}", e);
                self.set_records(Vec::new());
            }
        }
        true
    }

    /// Fetch the history and apply it.
    pub async fn load(&mut self, api: &ApiClient, cattle_id: Option<u64>) -> bool {
        let ticket = self.begin_load();
        let result = api.list_diagnoses(cattle_id).await;
        self.commit_load(ticket, result)
    }

    /// The view went away. Loads still in flight will be discarded.
    pub fn unmount(&mut self) {
        self.guard.unmount();
        self.loading = false;
    }

    pub fn mount(&mut self) {
        self.guard.mount();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Replace the collection.
    pub fn set_records(&mut self, records: Vec<DiagnosisRecord>) {
        self.records = records;
        self.dirty = true;
    }

    /// Swap in the server's copy of a record after a successful mutation.
    /// Returns false if no record has that id.
    pub fn replace_record(&mut self, record: DiagnosisRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.dirty = true;
        }
    }

    pub fn set_severity_filter(&mut self, severity: SeverityFilter) {
        if severity != self.severity {
            self.severity = severity;
            self.dirty = true;
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if sort != self.sort {
            self.sort = sort;
            self.dirty = true;
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.refresh();
        Ok(())
    }

    /// Jump to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.refresh();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn records(&self) -> &[DiagnosisRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&DiagnosisRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn severity_filter(&self) -> SeverityFilter {
        self.severity
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page index, clamped.
    pub fn page(&mut self) -> usize {
        self.refresh();
        self.page
    }

    pub fn page_count(&mut self) -> usize {
        self.refresh();
        page_count(self.ordered.len(), self.page_size)
    }

    /// Filtered and sorted records.
    pub fn sorted(&mut self) -> Vec<&DiagnosisRecord> {
        self.refresh();
        self.ordered.iter().map(|&i| &self.records[i]).collect()
    }

    /// The visible page.
    pub fn current_page(&mut self) -> HistoryPage<'_> {
        self.refresh();
        let bounds = page_bounds(self.ordered.len(), self.page, self.page_size);
        HistoryPage {
            rows: self.ordered[bounds].iter().map(|&i| &self.records[i]).collect(),
            page: self.page,
            page_count: page_count(self.ordered.len(), self.page_size),
            page_size: self.page_size,
            matching: self.ordered.len(),
            total: self.records.len(),
        }
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_records(&self.records)
    }

    /// Export the whole filtered and sorted set, not just the visible page.
    pub fn export(&mut self) -> ExportOutcome {
        self.refresh();
        export_records(self.ordered.iter().map(|&i| &self.records[i]))
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    /// Rebuild the ordering if an input changed, then clamp the page.
    fn refresh(&mut self) {
        if self.dirty {
            self.ordered = self.build_order();
            self.dirty = false;
        }
        let last = page_count(self.ordered.len(), self.page_size) - 1;
        if self.page > last {
            self.page = last;
        }
    }

    fn build_order(&self) -> Vec<usize> {
        let mut ordered: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches_query(r, &self.query) && self.severity.matches(r.severity))
            .map(|(i, _)| i)
            .collect();
        ordered.sort_by(|&a, &b| self.sort.compare(&self.records[a], &self.records[b]));
        ordered
    }
}

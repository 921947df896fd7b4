//! Farm dashboard.
//!
//! Cattle and diagnoses are fetched together and fail as a unit: if either
//! request fails both lists are reset to empty.

use crate::api::ApiClient;
use crate::error::HerdResult;
use crate::models::{CattleRecord, DiagnosisRecord, Severity};

use super::diagnosis_history::{sort_records, HistorySummary, SortKey};
use super::load_guard::{LoadGuard, LoadTicket};

/// How many diagnoses the "recent" panel shows.
pub const RECENT_LIMIT: usize = 5;

/// Share of diagnoses at one severity.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityShare {
    pub severity: Severity,
    pub count: usize,
    /// In [0, 1]; 0 when there are no diagnoses.
    pub ratio: f64,
}

/// Stat cards shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub herd_size: usize,
    pub diagnoses_total: usize,
    pub high_severity: usize,
    pub pending_reviews: usize,
    pub mean_confidence: Option<f64>,
    pub distribution: Vec<SeverityShare>,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    cattle: Vec<CattleRecord>,
    diagnoses: Vec<DiagnosisRecord>,
    guard: LoadGuard,
    loading: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loading = true;
        self.guard.begin()
    }

    pub fn commit_load(
        &mut self,
        ticket: LoadTicket,
        result: HerdResult<(Vec<CattleRecord>, Vec<DiagnosisRecord>)>,
    ) -> bool {
        if !self.guard.is_current(ticket) {
            tracing::debug!(generation = ticket.generation(), "Discarding stale dashboard load");
            return false;
        }

        self.loading = false;
        match result {
            Ok((cattle, diagnoses)) => {
                self.cattle = cattle;
                self.diagnoses = diagnoses;
            }
            Err(e) => {
                tracing::warn!(code = e.error_code(), "Failed to load dashboard: {}", e);
                self.cattle.clear();
                self.diagnoses.clear();
            }
        }
        true
    }

    /// Fetch cattle and diagnoses concurrently.
    pub async fn load(&mut self, api: &ApiClient) -> bool {
        let ticket = self.begin_load();
        let result = tokio::try_join!(api.list_cattle(), api.list_diagnoses(None));
        self.commit_load(ticket, result)
    }

    pub fn unmount(&mut self) {
        self.guard.unmount();
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn cattle(&self) -> &[CattleRecord] {
        &self.cattle
    }

    pub fn diagnoses(&self) -> &[DiagnosisRecord] {
        &self.diagnoses
    }

    pub fn stats(&self) -> DashboardStats {
        let summary = HistorySummary::from_records(&self.diagnoses);
        let distribution = Severity::ALL
            .iter()
            .map(|&severity| {
                let count = summary.count(severity);
                let ratio = if summary.total == 0 {
                    0.0
                } else {
                    count as f64 / summary.total as f64
                };
                SeverityShare { severity, count, ratio }
            })
            .collect();

        DashboardStats {
            herd_size: self.cattle.len(),
            diagnoses_total: summary.total,
            high_severity: summary.high,
            pending_reviews: summary.pending_review,
            mean_confidence: summary.mean_confidence,
            distribution,
        }
    }

    /// Newest diagnoses first, at most [`RECENT_LIMIT`].
    pub fn recent(&self) -> Vec<&DiagnosisRecord> {
        let mut recent: Vec<&DiagnosisRecord> = self.diagnoses.iter().collect();
        sort_records(&mut recent, SortKey::Newest);
        recent.truncate(RECENT_LIMIT);
        recent
    }
}

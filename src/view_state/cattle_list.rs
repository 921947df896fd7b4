//! Cattle list view.
//!
//! Mutations go to the backend first; the local list changes only after the
//! server acknowledges. A failed mutation raises an error notice and leaves
//! the list as it was.

use crate::api::ApiClient;
use crate::error::HerdResult;
use crate::models::{CattleDraft, CattleRecord};
use crate::notifications::Notifications;

use super::load_guard::{LoadGuard, LoadTicket};

#[derive(Debug, Default)]
pub struct CattleList {
    records: Vec<CattleRecord>,
    query: String,
    guard: LoadGuard,
    loading: bool,
}

impl CattleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.loading = true;
        self.guard.begin()
    }

    /// Apply a finished load unless it went stale. A failure empties the list.
    pub fn commit_load(&mut self, ticket: LoadTicket, result: HerdResult<Vec<CattleRecord>>) -> bool {
        if !self.guard.is_current(ticket) {
            tracing::debug!(generation = ticket.generation(), "Discarding stale cattle load");
            return false;
        }

        self.loading = false;
        self.records = match result {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(code = e.error_code(), "Failed to load cattle: {}", e);
                Vec::new()
            }
        };
        true
    }

    pub async fn load(&mut self, api: &ApiClient) -> bool {
        let ticket = self.begin_load();
        let result = api.list_cattle().await;
        self.commit_load(ticket, result)
    }

    pub fn unmount(&mut self) {
        self.guard.unmount();
        self.loading = false;
    }

    pub fn set_records(&mut self, records: Vec<CattleRecord>) {
        self.records = records;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn records(&self) -> &[CattleRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&CattleRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records matching the query by tag number, name or breed.
    pub fn visible(&self) -> Vec<&CattleRecord> {
        self.records.iter().filter(|r| r.matches(&self.query)).collect()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn create(
        &mut self,
        api: &ApiClient,
        draft: &CattleDraft,
        notices: &mut Notifications,
    ) -> Option<&CattleRecord> {
        match api.create_cattle(draft).await {
            Ok(record) => {
                notices.success(format!("Added {}", record.display_name()));
                self.records.push(record);
                self.records.last()
            }
            Err(e) => {
                notices.error("Adding cattle", &e);
                None
            }
        }
    }

    pub async fn update(
        &mut self,
        api: &ApiClient,
        id: u64,
        draft: &CattleDraft,
        notices: &mut Notifications,
    ) -> Option<&CattleRecord> {
        match api.update_cattle(id, draft).await {
            Ok(record) => {
                notices.success(format!("Updated {}", record.display_name()));
                match self.records.iter().position(|r| r.id == id) {
                    Some(index) => {
                        self.records[index] = record;
                        self.records.get(index)
                    }
                    None => {
                        self.records.push(record);
                        self.records.last()
                    }
                }
            }
            Err(e) => {
                notices.error("Updating cattle", &e);
                None
            }
        }
    }

    pub async fn delete(&mut self, api: &ApiClient, id: u64, notices: &mut Notifications) -> bool {
        match api.delete_cattle(id).await {
            Ok(()) => {
                self.records.retain(|r| r.id != id);
                notices.success(format!("Deleted cattle #{}", id));
                true
            }
            Err(e) => {
                notices.error("Deleting cattle", &e);
                false
            }
        }
    }
}

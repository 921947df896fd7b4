//! View state for the farm client.
//!
//! Each view owns its fetched data and the user's inputs, and derives what
//! is rendered. Presentation code only reads from these types and calls
//! their setters.
//!
//! | View | Contents |
//! |------|----------|
//! | [`DiagnosisHistory`] | search, severity filter, sort, pagination, export |
//! | [`CattleList`] | herd list with create/update/delete |
//! | [`Dashboard`] | stat cards and recent diagnoses |
//! | [`ReviewForm`] | veterinarian review of one diagnosis |
//!
//! Every loading view holds a [`LoadGuard`] so a response that arrives
//! after a newer load or after unmount is dropped.

pub mod cattle_list;
pub mod dashboard;
pub mod diagnosis_history;
pub mod load_guard;
pub mod review;

pub use cattle_list::CattleList;
pub use dashboard::{Dashboard, DashboardStats, SeverityShare, RECENT_LIMIT};
pub use diagnosis_history::{
    filter_records, matches_query, page_bounds, page_count, sort_records, DiagnosisHistory,
    HistoryPage, HistorySummary, SeverityFilter, SortKey,
};
pub use load_guard::{LoadGuard, LoadTicket};
pub use review::{ReviewForm, REVIEW_ACTION};

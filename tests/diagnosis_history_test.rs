//! Diagnosis history pipeline: search, severity filter, sort, pagination.
//!
//! Property tests cover the pipeline invariants over generated records;
//! the scenario tests pin down concrete screens.

mod common;

use std::cmp::Ordering;

use proptest::prelude::*;

use common::{diagnosis, sample_diagnoses};
use herdview::models::DiagnosisRecord;
use herdview::view_state::{
    filter_records, sort_records, DiagnosisHistory, SeverityFilter, SortKey,
};

// ============================================================================
// Strategies
// ============================================================================

const NAMES: [&str; 4] = ["Bossy", "Daisy", "Bella", "Rosie"];
const DISEASES: [&str; 3] = ["Mastitis", "Foot Rot", "Lumpy Skin"];
const SEVERITIES: [&str; 4] = ["high", "medium", "low", "none"];

fn records_strategy() -> impl Strategy<Value = Vec<DiagnosisRecord>> {
    prop::collection::vec(
        (
            0..NAMES.len(),
            0..DISEASES.len(),
            0..SEVERITIES.len(),
            prop::option::of(0u8..=4),
            1u32..=5,
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, disease, severity, confidence, day))| {
                // Coarse buckets so equal keys are common.
                let confidence = confidence.map(|c| f64::from(c) / 4.0);
                diagnosis(
                    i as u64 + 1,
                    NAMES[name],
                    DISEASES[disease],
                    SEVERITIES[severity],
                    confidence,
                    day,
                )
            })
            .collect()
    })
}

fn severity_strategy() -> impl Strategy<Value = SeverityFilter> {
    prop_oneof![
        Just(SeverityFilter::All),
        Just(SeverityFilter::Low),
        Just(SeverityFilter::Medium),
        Just(SeverityFilter::High),
    ]
}

fn sort_strategy() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", "bo", "ROSIE", " rot ", "skin", "zzz"]).prop_map(str::to_string)
}

fn ids(records: &[&DiagnosisRecord]) -> Vec<u64> {
    records.iter().map(|r| r.id).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_filter_is_idempotent(
        records in records_strategy(),
        query in query_strategy(),
        severity in severity_strategy(),
    ) {
        let once = filter_records(&records, &query, severity);
        let twice = filter_records(once.iter().copied(), &query, severity);
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn prop_sort_orders_and_is_stable(records in records_strategy(), key in sort_strategy()) {
        let mut sorted: Vec<&DiagnosisRecord> = records.iter().collect();
        sort_records(&mut sorted, key);

        let mut before = ids(&records.iter().collect::<Vec<_>>());
        let mut after = ids(&sorted);
        prop_assert_eq!(after.len(), before.len());

        for pair in sorted.windows(2) {
            let ordering = key.compare(pair[0], pair[1]);
            prop_assert_ne!(ordering, Ordering::Greater);
            // Ids follow input order, so ties must keep ascending ids.
            if ordering == Ordering::Equal {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }

        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_pages_reconstruct_sorted_set(
        records in records_strategy(),
        query in query_strategy(),
        severity in severity_strategy(),
        key in sort_strategy(),
        page_size in 1usize..8,
    ) {
        let mut history = DiagnosisHistory::with_page_size(page_size).unwrap();
        history.set_records(records);
        history.set_query(query);
        history.set_severity_filter(severity);
        history.set_sort(key);

        let expected = ids(&history.sorted());
        let pages = history.page_count();
        prop_assert!(pages >= 1);

        let mut collected = Vec::new();
        for page in 0..pages {
            history.set_page(page);
            let view = history.current_page();
            prop_assert!(view.rows.len() <= page_size);
            if page + 1 < pages {
                prop_assert_eq!(view.rows.len(), page_size);
            }
            collected.extend(ids(&view.rows));
        }
        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn prop_page_is_always_in_range(
        records in records_strategy(),
        requested in 0usize..50,
        new_size in 1usize..20,
        severity in severity_strategy(),
    ) {
        let mut history = DiagnosisHistory::with_page_size(3).unwrap();
        history.set_records(records);
        history.set_page(requested);
        prop_assert!(history.page() < history.page_count());

        history.set_page_size(new_size).unwrap();
        prop_assert!(history.page() < history.page_count());

        history.set_severity_filter(severity);
        prop_assert!(history.page() < history.page_count());
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_confidence_desc_puts_missing_last() {
    let mut history = DiagnosisHistory::new();
    history.set_records(sample_diagnoses());
    history.set_sort(SortKey::ConfidenceDesc);

    assert_eq!(ids(&history.sorted()), vec![1, 5, 2, 3, 4]);
}

#[test]
fn test_search_by_cattle_name_with_severity() {
    let mut history = DiagnosisHistory::new();
    history.set_records(sample_diagnoses());
    history.set_query("bossy");
    assert_eq!(ids(&history.sorted()), vec![4, 1]);

    history.set_severity_filter(SeverityFilter::High);
    assert_eq!(ids(&history.sorted()), vec![1]);

    history.set_query("");
    history.set_sort(SortKey::Oldest);
    assert_eq!(ids(&history.sorted()), vec![1, 5]);
}

#[test]
fn test_filter_change_pulls_page_back() {
    let mut history = DiagnosisHistory::with_page_size(2).unwrap();
    history.set_records(sample_diagnoses());
    history.set_page(2);
    assert_eq!(history.page(), 2);
    assert_eq!(ids(&history.current_page().rows), vec![1]);

    history.set_severity_filter(SeverityFilter::Medium);
    let view = history.current_page();
    assert_eq!(view.page, 0);
    assert_eq!(view.page_count, 1);
    assert_eq!(view.matching, 2);
    assert_eq!(view.total, 5);
    assert!(!view.has_next());
}

#[test]
fn test_unmount_before_load_resolves() {
    let mut history = DiagnosisHistory::new();
    let ticket = history.begin_load();
    assert!(history.is_loading());

    history.unmount();
    assert!(!history.commit_load(ticket, Ok(sample_diagnoses())));
    assert!(history.records().is_empty());

    history.mount();
    let ticket = history.begin_load();
    assert!(history.commit_load(ticket, Ok(vec![diagnosis(9, "Late", "Mastitis", "low", None, 9)])));
    assert_eq!(history.records().len(), 1);
}

#[test]
fn test_newer_load_wins() {
    let mut history = DiagnosisHistory::new();
    let first = history.begin_load();
    let second = history.begin_load();

    assert!(history.commit_load(second, Ok(sample_diagnoses())));
    assert!(!history.commit_load(first, Ok(Vec::new())));
    assert_eq!(history.records().len(), 5);
}

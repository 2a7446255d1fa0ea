// src/filter/engine.rs
//! Pure faceted filtering over loaded records
//!
//! Every recompute is a linear scan, O(records x facets). Inputs are small and
//! already in memory, so nothing is indexed or cached between calls.

use std::collections::BTreeMap;

use super::record::{FacetValue, Record};
use super::state::{FacetSelection, FilterState};
use crate::utils::parse_amount;

/// Visible subsequence of `records` under `state`, in input order.
pub fn apply<'a, R: Record>(records: &'a [R], state: &FilterState) -> Vec<&'a R> {
    if state.is_identity() {
        return records.iter().collect();
    }

    let needle = state.search_term.to_lowercase();
    records
        .iter()
        .filter(|record| matches_prepared(*record, &needle, state))
        .collect()
}

/// Whether a single record passes the search term and every active facet.
pub fn matches<R: Record + ?Sized>(record: &R, state: &FilterState) -> bool {
    matches_prepared(record, &state.search_term.to_lowercase(), state)
}

fn matches_prepared<R: Record + ?Sized>(record: &R, needle: &str, state: &FilterState) -> bool {
    matches_search(record, needle)
        && state
            .facet_selections
            .iter()
            .all(|(facet, selection)| matches_facet(record, facet, selection))
}

fn matches_search<R: Record + ?Sized>(record: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn matches_facet<R: Record + ?Sized>(record: &R, facet: &str, selection: &FacetSelection) -> bool {
    if !selection.is_active() {
        return true;
    }

    // Thresholds that do not parse impose no constraint
    let threshold = match selection {
        FacetSelection::AtLeast(raw) => match parse_amount(raw) {
            Some(value) => Some(value),
            None => return true,
        },
        _ => None,
    };

    let Some(value) = record.facet(facet) else {
        return false;
    };

    match (selection, value) {
        (FacetSelection::Exact(wanted), FacetValue::Text(text)) => text == wanted.as_str(),
        (FacetSelection::Exact(wanted), FacetValue::Tags(tags)) => tags.iter().any(|t| t == wanted),
        (FacetSelection::AnyOf(wanted), FacetValue::Text(text)) => wanted.contains(text),
        (FacetSelection::AnyOf(wanted), FacetValue::Tags(tags)) => {
            tags.iter().any(|t| wanted.contains(t))
        }
        (FacetSelection::Contains(fragment), FacetValue::Text(text)) => {
            text.to_lowercase().contains(&fragment.to_lowercase())
        }
        (FacetSelection::Contains(fragment), FacetValue::Tags(tags)) => {
            let fragment = fragment.to_lowercase();
            tags.iter().any(|t| t.to_lowercase().contains(&fragment))
        }
        (FacetSelection::AtLeast(_), FacetValue::Number(number)) => {
            threshold.is_some_and(|min| number >= min)
        }
        _ => false,
    }
}

/// One value of a facet together with how many records would show if it were picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Value counts for a text or tag facet.
///
/// The facet's own selection is ignored so that unselected values keep their
/// counts. Sorted by descending count, then by value.
pub fn facet_counts<R: Record>(records: &[R], state: &FilterState, facet: &str) -> Vec<FacetCount> {
    let others = state.without_facet(facet);
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for record in apply(records, &others) {
        match record.facet(facet) {
            Some(FacetValue::Text(text)) if !text.is_empty() => {
                *counts.entry(text.to_string()).or_default() += 1;
            }
            Some(FacetValue::Tags(tags)) => {
                let mut seen: Vec<&String> = Vec::with_capacity(tags.len());
                for tag in tags {
                    if !seen.contains(&tag) {
                        seen.push(tag);
                        *counts.entry(tag.clone()).or_default() += 1;
                    }
                }
            }
            _ => {}
        }
    }

    let mut result: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount { value, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    result
}

// src/filter/controller.rs
use std::collections::{BTreeMap, BTreeSet};

use super::engine;
use super::record::Record;
use super::state::{FacetSelection, FilterState};

/// How a facet reacts to user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    /// One value at a time; re-selecting the current value clears it
    Single,
    /// Any number of values; each toggle adds or removes one
    Multi,
    /// Free-text substring input
    Contains,
    /// Free-text numeric minimum
    Threshold,
}

/// Facet names and kinds understood by one browse page.
#[derive(Debug, Clone, Default)]
pub struct FacetSchema {
    kinds: BTreeMap<String, FacetKind>,
}

impl FacetSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facet(mut self, facet: impl Into<String>, kind: FacetKind) -> Self {
        self.kinds.insert(facet.into(), kind);
        self
    }

    /// Job browse page: job type dropdown, location box, minimum salary box
    pub fn jobs() -> Self {
        Self::new()
            .with_facet("job_type", FacetKind::Single)
            .with_facet("location", FacetKind::Contains)
            .with_facet("salary", FacetKind::Threshold)
    }

    /// Category browse page: tag chips
    pub fn categories() -> Self {
        Self::new().with_facet("tags", FacetKind::Multi)
    }

    /// Kind for `facet`; facets outside the schema behave as single-select
    pub fn kind(&self, facet: &str) -> FacetKind {
        self.kinds.get(facet).copied().unwrap_or(FacetKind::Single)
    }
}

/// Owns the filter state of a page and applies user actions to it.
#[derive(Debug, Clone, Default)]
pub struct FilterController {
    schema: FacetSchema,
    state: FilterState,
}

impl FilterController {
    pub fn new(schema: FacetSchema) -> Self {
        Self {
            schema,
            state: FilterState::default(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn schema(&self) -> &FacetSchema {
        &self.schema
    }

    /// Replace the search term verbatim. Case is normalized at match time.
    pub fn set_search_term(&mut self, value: impl Into<String>) {
        self.state.search_term = value.into();
    }

    pub fn toggle_facet_value(&mut self, facet: &str, value: &str) {
        match self.schema.kind(facet) {
            FacetKind::Multi => self.toggle_multi(facet, value),
            kind => {
                let selections = &mut self.state.facet_selections;
                let reselected = selections
                    .get(facet)
                    .is_some_and(|current| selection_text(current) == Some(value));

                if reselected {
                    selections.remove(facet);
                } else {
                    selections.insert(facet.to_string(), single_selection(kind, value));
                }
            }
        }
    }

    /// Set the raw text of an input-box facet. Empty input removes the constraint.
    pub fn set_facet_input(&mut self, facet: &str, value: &str) {
        if value.is_empty() {
            self.state.facet_selections.remove(facet);
            return;
        }
        let selection = match self.schema.kind(facet) {
            FacetKind::Multi => FacetSelection::AnyOf(BTreeSet::from([value.to_string()])),
            kind => single_selection(kind, value),
        };
        self.state.facet_selections.insert(facet.to_string(), selection);
    }

    /// Remove any constraint on `facet`
    pub fn clear_facet(&mut self, facet: &str) {
        self.state.facet_selections.remove(facet);
    }

    pub fn clear_all(&mut self) {
        self.state.search_term.clear();
        self.state.facet_selections.clear();
    }

    /// Values currently selected on a multi-select facet
    pub fn selected_values(&self, facet: &str) -> Vec<&str> {
        match self.state.facet_selections.get(facet) {
            Some(FacetSelection::AnyOf(values)) => values.iter().map(String::as_str).collect(),
            Some(other) => selection_text(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn visible<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        engine::apply(records, &self.state)
    }

    fn toggle_multi(&mut self, facet: &str, value: &str) {
        let entry = self
            .state
            .facet_selections
            .entry(facet.to_string())
            .or_insert_with(|| FacetSelection::AnyOf(BTreeSet::new()));

        // A facet switched from another kind starts over as an empty set
        if !matches!(entry, FacetSelection::AnyOf(_)) {
            *entry = FacetSelection::AnyOf(BTreeSet::new());
        }

        if let FacetSelection::AnyOf(values) = entry {
            if !values.remove(value) {
                values.insert(value.to_string());
            }
            if values.is_empty() {
                self.state.facet_selections.remove(facet);
            }
        }
    }
}

fn single_selection(kind: FacetKind, value: &str) -> FacetSelection {
    match kind {
        FacetKind::Contains => FacetSelection::Contains(value.to_string()),
        FacetKind::Threshold => FacetSelection::AtLeast(value.to_string()),
        FacetKind::Single | FacetKind::Multi => FacetSelection::Exact(value.to_string()),
    }
}

fn selection_text(selection: &FacetSelection) -> Option<&str> {
    match selection {
        FacetSelection::Exact(v) | FacetSelection::Contains(v) | FacetSelection::AtLeast(v) => {
            Some(v.as_str())
        }
        FacetSelection::AnyOf(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_search_term_is_verbatim() {
        let mut controller = FilterController::new(FacetSchema::jobs());
        controller.set_search_term("  Nurse ");
        assert_eq!(controller.state().search_term, "  Nurse ");
    }

    #[test]
    fn test_single_select_toggle() {
        let mut controller = FilterController::new(FacetSchema::jobs());
        controller.toggle_facet_value("job_type", "full_time");
        assert_eq!(
            controller.state().selection("job_type"),
            Some(&FacetSelection::Exact("full_time".into()))
        );

        controller.toggle_facet_value("job_type", "contract");
        assert_eq!(controller.selected_values("job_type"), vec!["contract"]);

        controller.toggle_facet_value("job_type", "contract");
        assert!(controller.state().selection("job_type").is_none());
    }

    #[test]
    fn test_multi_select_toggle_round_trip() {
        let mut controller = FilterController::new(FacetSchema::categories());
        controller.toggle_facet_value("tags", "Heart");
        let before = controller.state().clone();

        controller.toggle_facet_value("tags", "Surgery");
        assert_eq!(controller.selected_values("tags"), vec!["Heart", "Surgery"]);

        controller.toggle_facet_value("tags", "Surgery");
        assert_eq!(controller.state(), &before);

        controller.toggle_facet_value("tags", "Heart");
        assert!(controller.state().is_identity());
        assert!(controller.state().facet_selections.is_empty());
    }

    #[test]
    fn test_facet_input_kinds() {
        let mut controller = FilterController::new(FacetSchema::jobs());
        controller.set_facet_input("location", "Lagos");
        controller.set_facet_input("salary", "50000");
        assert_eq!(
            controller.state().selection("location"),
            Some(&FacetSelection::Contains("Lagos".into()))
        );
        assert_eq!(
            controller.state().selection("salary"),
            Some(&FacetSelection::AtLeast("50000".into()))
        );

        controller.set_facet_input("salary", "");
        assert!(controller.state().selection("salary").is_none());
    }

    #[test]
    fn test_clear_all_restores_identity() {
        let mut controller = FilterController::new(FacetSchema::jobs());
        controller.set_search_term("nurse");
        controller.toggle_facet_value("job_type", "full_time");
        controller.set_facet_input("salary", "1");
        controller.clear_all();
        assert_eq!(controller.state(), &FilterState::default());
    }
}

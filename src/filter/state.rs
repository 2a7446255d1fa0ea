// src/filter/state.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Active constraint on a single facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FacetSelection {
    /// Single-select: the record value must equal this one
    Exact(String),
    /// Multi-select: the record values must intersect this set
    AnyOf(BTreeSet<String>),
    /// Case-insensitive substring on a text facet
    Contains(String),
    /// Numeric threshold, kept as the raw user input and parsed at match time
    AtLeast(String),
}

impl FacetSelection {
    /// Whether this selection constrains anything at all
    pub fn is_active(&self) -> bool {
        match self {
            Self::Exact(value) => !value.is_empty(),
            Self::AnyOf(values) => !values.is_empty(),
            Self::Contains(value) | Self::AtLeast(value) => !value.is_empty(),
        }
    }
}

/// Current search term plus facet selections for one page instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub facet_selections: BTreeMap<String, FacetSelection>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_selection(mut self, facet: impl Into<String>, selection: FacetSelection) -> Self {
        self.facet_selections.insert(facet.into(), selection);
        self
    }

    /// True when this state matches every record (identity filter)
    pub fn is_identity(&self) -> bool {
        self.search_term.is_empty() && self.facet_selections.values().all(|s| !s.is_active())
    }

    pub fn selection(&self, facet: &str) -> Option<&FacetSelection> {
        self.facet_selections.get(facet)
    }

    /// Copy of this state without any constraint on `facet`
    pub fn without_facet(&self, facet: &str) -> Self {
        let mut state = self.clone();
        state.facet_selections.remove(facet);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_identity() {
        assert!(FilterState::new().is_identity());
    }

    #[test]
    fn test_empty_selections_are_inactive() {
        let state = FilterState::new()
            .with_selection("tags", FacetSelection::AnyOf(BTreeSet::new()))
            .with_selection("location", FacetSelection::Contains(String::new()));
        assert!(state.is_identity());

        let state = state.with_search_term(" ");
        assert!(!state.is_identity());
    }

    #[test]
    fn test_without_facet() {
        let state = FilterState::new()
            .with_selection("job_type", FacetSelection::Exact("full_time".into()))
            .with_selection("location", FacetSelection::Contains("lagos".into()));
        let reduced = state.without_facet("job_type");
        assert!(reduced.selection("job_type").is_none());
        assert!(reduced.selection("location").is_some());
    }
}

// src/filter/record.rs
//! Record abstraction consumed by the facet filter engine

/// Value a record exposes for a named facet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FacetValue<'a> {
    Text(&'a str),
    Tags(&'a [String]),
    Number(f64),
}

/// A listing entity (job posting, category, ...) subject to search and filtering.
pub trait Record {
    /// Unique, stable identifier while the record is loaded
    fn id(&self) -> &str;

    /// Fields eligible for free-text matching, in display order
    fn searchable_fields(&self) -> Vec<&str>;

    /// Value for `facet`, or `None` when the record has no usable value for it.
    ///
    /// A `None` against an active selection is a non-match, never an error.
    fn facet(&self, facet: &str) -> Option<FacetValue<'_>>;
}

impl<R: Record + ?Sized> Record for &R {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn searchable_fields(&self) -> Vec<&str> {
        (**self).searchable_fields()
    }

    fn facet(&self, facet: &str) -> Option<FacetValue<'_>> {
        (**self).facet(facet)
    }
}

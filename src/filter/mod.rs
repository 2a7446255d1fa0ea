// src/filter/mod.rs
//! Client-side search and faceted filtering shared by the browse pages

pub mod controller;
pub mod engine;
pub mod record;
pub mod state;

pub use controller::{FacetKind, FacetSchema, FilterController};
pub use engine::{apply, facet_counts, matches, FacetCount};
pub use record::{FacetValue, Record};
pub use state::{FacetSelection, FilterState};

//! Job board client core: typed records, faceted filtering over browse lists
//! and the REST client for jobs, applications and job seeker profiles.

use std::sync::Arc;

pub mod cli;
pub mod core;
pub mod environment;
pub mod filter;
pub mod listing;
pub mod page;
pub mod types;
pub mod upload_validator;
pub mod utils;

pub use crate::core::{ApiClient, ConfigManager, FetchError, FieldErrors};
pub use filter::{FacetSchema, FacetSelection, FilterController, FilterState, Record};
pub use listing::{ListingProvider, RemoteJobListing, StaticListing};
pub use page::{BrowsePage, LoadState, MountToken};
pub use types::{Category, Job, JobSeekerProfile};

/// Fetch the job list once and return the postings matching `state`
pub async fn browse_jobs(client: Arc<ApiClient>, state: &FilterState) -> Result<Vec<Job>, FetchError> {
    let jobs = RemoteJobListing::new(client).load().await?;
    Ok(filter::apply(&jobs, state).into_iter().cloned().collect())
}

/// Filter the built-in category table
pub fn browse_categories(state: &FilterState) -> Vec<Category> {
    let listing = StaticListing::categories();
    filter::apply(listing.records(), state)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_categories_by_tag() {
        let state = FilterState::new().with_selection(
            "tags",
            FacetSelection::AnyOf(["Children".to_string()].into()),
        );
        let names: Vec<String> = browse_categories(&state).into_iter().map(|c| c.name).collect();
        assert!(names.contains(&"Pediatrics".to_string()));
        assert!(names.iter().all(|n| n != "Cardiology"));
    }
}

// src/page.rs
//! One mounted browse page: the loaded records, its filter controller and the
//! load lifecycle.

use tracing::{debug, info, warn};

use crate::core::error::FetchError;
use crate::filter::{FacetSchema, FilterController, Record};
use crate::listing::ListingProvider;
use crate::types::category::Category;
use crate::types::job::Job;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<R> {
    /// Not mounted, or unmounted
    Idle,
    Loading,
    Ready(Vec<R>),
    Failed(String),
}

/// Identifies the mount a fetch was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountToken(u64);

#[derive(Debug)]
pub struct BrowsePage<R> {
    noun: &'static str,
    schema: FacetSchema,
    controller: FilterController,
    load: LoadState<R>,
    generation: u64,
    mounted: bool,
}

impl BrowsePage<Job> {
    pub fn jobs() -> Self {
        Self::new("jobs", FacetSchema::jobs())
    }
}

impl BrowsePage<Category> {
    pub fn categories() -> Self {
        Self::new("categories", FacetSchema::categories())
    }
}

impl<R: Record> BrowsePage<R> {
    pub fn new(noun: &'static str, schema: FacetSchema) -> Self {
        Self {
            noun,
            controller: FilterController::new(schema.clone()),
            schema,
            load: LoadState::Idle,
            generation: 0,
            mounted: false,
        }
    }

    /// Start a fresh page instance. Filter state starts empty on every mount.
    pub fn mount(&mut self) -> MountToken {
        self.generation += 1;
        self.mounted = true;
        self.load = LoadState::Loading;
        self.controller = FilterController::new(self.schema.clone());
        debug!("Mounted {} page (generation {})", self.noun, self.generation);
        MountToken(self.generation)
    }

    /// Apply a finished fetch. Returns `false` and drops the result when the
    /// page was unmounted or remounted since `token` was issued.
    pub fn resolve(&mut self, token: MountToken, result: Result<Vec<R>, FetchError>) -> bool {
        if !self.mounted || token.0 != self.generation {
            debug!(
                "Discarding stale {} result (generation {}, current {})",
                self.noun, token.0, self.generation
            );
            return false;
        }

        self.load = match result {
            Ok(records) => {
                info!("Loaded {} {}", records.len(), self.noun);
                LoadState::Ready(records)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", self.noun, e);
                LoadState::Failed(e.to_string())
            }
        };
        true
    }

    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
        self.load = LoadState::Idle;
        self.controller = FilterController::new(self.schema.clone());
    }

    /// Mount, load from `provider` and apply the result
    pub async fn load_with<P>(&mut self, provider: &P) -> bool
    where
        P: ListingProvider<Record = R>,
    {
        let token = self.mount();
        let result = provider.load().await;
        self.resolve(token, result)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    pub fn load_state(&self) -> &LoadState<R> {
        &self.load
    }

    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FilterController {
        &mut self.controller
    }

    /// Everything loaded, before filtering
    pub fn records(&self) -> &[R] {
        match &self.load {
            LoadState::Ready(records) => records.as_slice(),
            _ => &[],
        }
    }

    pub fn visible(&self) -> Vec<&R> {
        self.controller.visible(self.records())
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} {}",
            self.visible().len(),
            self.records().len(),
            self.noun
        )
    }

    /// Error or empty-list notice, if one applies
    pub fn banner(&self) -> Option<String> {
        match &self.load {
            LoadState::Failed(message) => Some(format!("Failed to load {}: {}", self.noun, message)),
            LoadState::Ready(records) if records.is_empty() => {
                Some(format!("No {} available", self.noun))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::StaticListing;

    fn jobs() -> Vec<Job> {
        vec![
            Job::new("1", "Registered Nurse", "St. Mary").with_job_type("full_time"),
            Job::new("2", "Physician", "City Clinic").with_job_type("part_time"),
        ]
    }

    #[test]
    fn test_resolve_current_mount() {
        let mut page = BrowsePage::jobs();
        let token = page.mount();
        assert!(page.is_loading());
        assert!(page.resolve(token, Ok(jobs())));
        assert_eq!(page.records().len(), 2);
        assert_eq!(page.summary(), "Showing 2 of 2 jobs");
        assert_eq!(page.banner(), None);
    }

    #[test]
    fn test_stale_result_after_unmount_is_discarded() {
        let mut page = BrowsePage::jobs();
        let token = page.mount();
        page.unmount();
        assert!(!page.is_mounted());
        assert!(!page.resolve(token, Ok(jobs())));
        assert_eq!(page.load_state(), &LoadState::Idle);
        assert!(page.records().is_empty());
    }

    #[test]
    fn test_stale_result_after_remount_is_discarded() {
        let mut page = BrowsePage::jobs();
        let first = page.mount();
        let second = page.mount();
        assert!(!page.resolve(first, Ok(jobs())));
        assert!(page.is_loading());
        assert!(page.resolve(second, Ok(Vec::new())));
        assert_eq!(page.banner().as_deref(), Some("No jobs available"));
    }

    #[test]
    fn test_failure_banner() {
        let mut page = BrowsePage::jobs();
        let token = page.mount();
        page.resolve(token, Err(FetchError::Decode("no list found".into())));
        assert_eq!(
            page.banner().as_deref(),
            Some("Failed to load jobs: Invalid response: no list found")
        );
        assert!(page.visible().is_empty());
    }

    #[test]
    fn test_filter_reset_on_remount() {
        let mut page = BrowsePage::jobs();
        let token = page.mount();
        page.resolve(token, Ok(jobs()));
        page.controller_mut().toggle_facet_value("job_type", "part_time");
        assert_eq!(page.summary(), "Showing 1 of 2 jobs");

        page.unmount();
        page.mount();
        assert!(page.controller().state().is_identity());
    }

    #[tokio::test]
    async fn test_load_with_static_listing() {
        let mut page = BrowsePage::categories();
        assert!(page.load_with(&StaticListing::categories()).await);
        page.controller_mut().set_search_term("heart");
        let visible: Vec<&str> = page.visible().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(visible, vec!["Cardiology"]);
    }
}

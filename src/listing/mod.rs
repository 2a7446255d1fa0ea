// src/listing/mod.rs
//! Sources of browsable records

pub mod remote;
pub mod static_listing;

use std::future::Future;

use crate::core::error::FetchError;
use crate::filter::Record;

pub use remote::RemoteJobListing;
pub use static_listing::StaticListing;

/// Produces the full record list for a browse page.
///
/// One read per call. Failures are returned to the caller as-is; nothing is
/// retried here.
pub trait ListingProvider {
    type Record: Record;

    fn load(&self) -> impl Future<Output = Result<Vec<Self::Record>, FetchError>> + Send;
}

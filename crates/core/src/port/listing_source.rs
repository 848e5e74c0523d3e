// Listing Source Port (Interface)

use crate::domain::{JobRecord, ProfileRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to the records the sitemap is built from
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// All jobs with status "Open"
    async fn fetch_open_jobs(&self) -> Result<Vec<JobRecord>>;

    /// All referrer profiles with a non-null username
    async fn fetch_public_profiles(&self) -> Result<Vec<ProfileRecord>>;

    /// Count of open jobs (same filter as `fetch_open_jobs`)
    async fn count_open_jobs(&self) -> Result<i64>;

    /// Count of profiles with a non-blank username
    async fn count_public_profiles(&self) -> Result<i64>;
}

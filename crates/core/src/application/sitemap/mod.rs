// Sitemap Builder - fetch listings, merge, order, serialize

pub mod constants;
pub mod xml;


use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use self::constants::{
    DEFAULT_BASE_URL, DEFAULT_FETCH_TIMEOUT, JOB_PATH_PREFIX, JOB_PRIORITY, PROFILE_PATH_PREFIX,
    PROFILE_PRIORITY,
};
use crate::domain::{
    ChangeFrequency, JobRecord, Priority, ProfileRecord, SitemapEntry, SitemapStats, SourceKind,
    STATIC_ROUTES,
};
use crate::error::{AppError, Result};
use crate::port::time_provider::iso8601;
use crate::port::{ListingSource, TimeProvider};

/// Sitemap builder configuration
#[derive(Debug, Clone)]
pub struct SitemapConfig {
    /// Absolute base URL without trailing slash (e.g. `https://refery.io`)
    pub base_url: String,
    /// Timeout applied to each data-source read
    pub fetch_timeout: Duration,
}

impl SitemapConfig {
    /// Create a validated configuration
    ///
    /// A trailing `/` on `base_url` is stripped.
    pub fn new(base_url: impl Into<String>, fetch_timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let host = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"));
        match host {
            Some(host) if !host.is_empty() => {}
            _ => {
                return Err(AppError::Config(format!(
                    "base_url must be an absolute http(s) URL, got {:?}",
                    base_url
                )))
            }
        }

        if fetch_timeout.is_zero() {
            return Err(AppError::Config("fetch_timeout must be > 0".to_string()));
        }

        Ok(Self {
            base_url,
            fetch_timeout,
        })
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Result of one generation run
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    /// Serialized sitemap
    pub xml: String,
    /// Entries in output order
    pub entries: Vec<SitemapEntry>,
    /// Frozen generation time used for static and fallback `lastmod`
    pub generated_at: String,
    /// Categories that failed or timed out and contributed no entries
    pub failed_sources: Vec<SourceKind>,
}

/// Sitemap Builder
///
/// Holds its data source and clock as injected ports; nothing global.
pub struct SitemapBuilder {
    source: Arc<dyn ListingSource>,
    time_provider: Arc<dyn TimeProvider>,
    config: SitemapConfig,
}

impl SitemapBuilder {
    pub fn new(
        source: Arc<dyn ListingSource>,
        time_provider: Arc<dyn TimeProvider>,
        config: SitemapConfig,
    ) -> Self {
        Self {
            source,
            time_provider,
            config,
        }
    }

    /// Generate the sitemap XML
    pub async fn generate(&self) -> Result<String> {
        Ok(self.generate_report().await?.xml)
    }

    /// Generate the sitemap and keep the ordered entries alongside the XML
    ///
    /// Data-source failures never abort: the failing category contributes no
    /// entries and is listed in `failed_sources`. Only invalid entry
    /// construction (a programming error) is returned as `Err`.
    pub async fn generate_report(&self) -> Result<SitemapDocument> {
        let generated_at = iso8601(self.time_provider.now_millis())?;

        let mut entries = self.static_entries(&generated_at)?;
        let mut failed_sources = Vec::new();

        let (jobs, profiles) = tokio::join!(
            self.guarded(SourceKind::Jobs, self.source.fetch_open_jobs()),
            self.guarded(SourceKind::ReferrerProfiles, self.source.fetch_public_profiles()),
        );

        match jobs {
            Some(jobs) => entries.extend(self.job_entries(&jobs, &generated_at)?),
            None => failed_sources.push(SourceKind::Jobs),
        }
        match profiles {
            Some(profiles) => entries.extend(self.profile_entries(&profiles, &generated_at)?),
            None => failed_sources.push(SourceKind::ReferrerProfiles),
        }

        let mut entries = dedup_locations(entries);
        entries.sort_by(SitemapEntry::sitemap_order);

        let xml = xml::render(&entries);

        info!(
            url_count = entries.len(),
            failed_sources = ?failed_sources,
            generated_at = %generated_at,
            "Sitemap generated"
        );

        Ok(SitemapDocument {
            xml,
            entries,
            generated_at,
            failed_sources,
        })
    }

    /// Compute aggregate counts
    ///
    /// Count failures are logged and contribute 0; this never fails.
    pub async fn stats(&self) -> SitemapStats {
        let (jobs, profiles) = tokio::join!(
            self.guarded(SourceKind::Jobs, self.source.count_open_jobs()),
            self.guarded(SourceKind::ReferrerProfiles, self.source.count_public_profiles()),
        );

        let mut failed_sources = Vec::new();
        let job_listings = jobs.map(non_negative).unwrap_or_else(|| {
            failed_sources.push(SourceKind::Jobs);
            0
        });
        let referrer_profiles = profiles.map(non_negative).unwrap_or_else(|| {
            failed_sources.push(SourceKind::ReferrerProfiles);
            0
        });

        let last_generated = iso8601(self.time_provider.now_millis()).unwrap_or_else(|e| {
            warn!(error = %e, "Clock out of range, leaving last_generated empty");
            String::new()
        });

        SitemapStats::new(
            STATIC_ROUTES.len() as u64,
            job_listings,
            referrer_profiles,
            last_generated,
            failed_sources,
        )
    }

    /// Await a data-source read under the fetch timeout, degrading to `None`
    async fn guarded<T, F>(&self, kind: SourceKind, fut: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.config.fetch_timeout, fut).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(source = %kind, error = %e, "Listing read failed, continuing without it");
                None
            }
            Err(_) => {
                warn!(
                    source = %kind,
                    timeout_ms = self.config.fetch_timeout.as_millis() as u64,
                    "Listing read timed out, continuing without it"
                );
                None
            }
        }
    }

    fn static_entries(&self, generated_at: &str) -> Result<Vec<SitemapEntry>> {
        STATIC_ROUTES
            .iter()
            .map(|route| -> Result<SitemapEntry> {
                Ok(SitemapEntry::new(
                    &self.config.base_url,
                    route.path,
                    generated_at,
                    route.change_frequency,
                    route.priority.parse::<Priority>()?,
                )?)
            })
            .collect()
    }

    fn job_entries(&self, jobs: &[JobRecord], generated_at: &str) -> Result<Vec<SitemapEntry>> {
        let priority: Priority = JOB_PRIORITY.parse()?;
        let mut entries = Vec::with_capacity(jobs.len());

        for job in jobs {
            if !job.is_open() {
                debug!(job_id = %job.id, status = %job.status, "Skipping job that is not open");
                continue;
            }
            if !JobRecord::is_listable_id(&job.id) {
                warn!("Skipping open job with empty id");
                continue;
            }

            entries.push(SitemapEntry::new(
                &self.config.base_url,
                &format!("{}{}", JOB_PATH_PREFIX, job.id),
                job.last_modified().unwrap_or(generated_at),
                ChangeFrequency::Daily,
                priority,
            )?);
        }

        Ok(entries)
    }

    fn profile_entries(
        &self,
        profiles: &[ProfileRecord],
        generated_at: &str,
    ) -> Result<Vec<SitemapEntry>> {
        let priority: Priority = PROFILE_PRIORITY.parse()?;
        let mut entries = Vec::with_capacity(profiles.len());

        for profile in profiles {
            let Some(username) = profile.public_username() else {
                debug!("Skipping profile without a public username");
                continue;
            };

            entries.push(SitemapEntry::new(
                &self.config.base_url,
                &format!("{}{}", PROFILE_PATH_PREFIX, username),
                profile.last_modified().unwrap_or(generated_at),
                ChangeFrequency::Weekly,
                priority,
            )?);
        }

        Ok(entries)
    }
}

/// Keep the first entry for each location
fn dedup_locations(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| {
            let fresh = seen.insert(entry.location.clone());
            if !fresh {
                warn!(location = %entry.location, "Dropping duplicate sitemap location");
            }
            fresh
        })
        .collect()
}

fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

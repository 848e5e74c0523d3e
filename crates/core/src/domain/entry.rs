// Sitemap Entry Domain Model

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Crawler hint for how often a page changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ChangeFrequency::Always),
            "hourly" => Ok(ChangeFrequency::Hourly),
            "daily" => Ok(ChangeFrequency::Daily),
            "weekly" => Ok(ChangeFrequency::Weekly),
            "monthly" => Ok(ChangeFrequency::Monthly),
            "yearly" => Ok(ChangeFrequency::Yearly),
            "never" => Ok(ChangeFrequency::Never),
            _ => Err(DomainError::InvalidChangeFrequency(s.to_string())),
        }
    }
}

/// Crawler priority in [0.0, 1.0]
///
/// Always compared numerically; rendered with one decimal place ("0.9").
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Priority(f64);

impl Priority {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(DomainError::InvalidPriority(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Total order over priorities (NaN is rejected at construction)
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidPriority(s.to_string()))?;
        Self::new(value)
    }
}

/// One `<url>` record in the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub location: String,
    pub last_modified: String,
    pub change_frequency: ChangeFrequency,
    pub priority: Priority,
}

impl SitemapEntry {
    /// Build an entry for `path` under `base_url`
    ///
    /// `base_url` must be an absolute http(s) URL without a trailing slash and
    /// `path` must start with `/`, so every location stays on the base host.
    pub fn new(
        base_url: &str,
        path: &str,
        last_modified: impl Into<String>,
        change_frequency: ChangeFrequency,
        priority: Priority,
    ) -> Result<Self> {
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(DomainError::InvalidLocation(format!(
                "base url must be absolute http(s): {:?}",
                base_url
            )));
        }
        if base_url.ends_with('/') {
            return Err(DomainError::InvalidLocation(format!(
                "base url must not end with '/': {:?}",
                base_url
            )));
        }
        if !path.starts_with('/') {
            return Err(DomainError::InvalidLocation(format!(
                "path must start with '/': {:?}",
                path
            )));
        }

        let last_modified = last_modified.into();
        if last_modified.is_empty() {
            return Err(DomainError::ValidationError(format!(
                "empty lastmod for {}",
                path
            )));
        }

        Ok(Self {
            location: format!("{}{}", base_url, path),
            last_modified,
            change_frequency,
            priority,
        })
    }

    /// Sitemap ordering: priority descending, then most recent `last_modified` first
    pub fn sitemap_order(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| compare_timestamps(&other.last_modified, &self.last_modified))
    }
}

/// Offset-less layouts read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Sort key for a `lastmod` value
///
/// Unparseable values rank below every parsed instant and order by text
/// among themselves.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TimestampKey<'a> {
    Unparsed(&'a str),
    Instant(DateTime<Utc>),
}

impl<'a> TimestampKey<'a> {
    fn parse(raw: &'a str) -> Self {
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Self::Instant(instant.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| Self::Instant(naive.and_utc()))
            .unwrap_or(Self::Unparsed(raw))
    }
}

fn compare_timestamps(a: &str, b: &str) -> Ordering {
    TimestampKey::parse(a).cmp(&TimestampKey::parse(b))
}

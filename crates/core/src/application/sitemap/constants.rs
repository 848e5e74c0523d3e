// Sitemap constants (no magic values)
use std::time::Duration;

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://refery.io";

/// Upper bound for a single data-source read (10s)
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// sitemaps.org schema namespace for the root element
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// File name used when the sitemap is written to disk
pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// Path prefix of job detail pages
pub const JOB_PATH_PREFIX: &str = "/jobs/";

/// Path prefix of public referrer profile pages
pub const PROFILE_PATH_PREFIX: &str = "/r/";

/// Job detail priority
pub const JOB_PRIORITY: &str = "0.9";

/// Referrer profile priority
pub const PROFILE_PRIORITY: &str = "0.6";

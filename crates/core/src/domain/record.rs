// Listing Records (read-only rows from the data store)
//
// Every optional column is an explicit Option; adapters validate shape at the
// boundary so the builder never probes untyped rows.

use serde::{Deserialize, Serialize};

/// Job posting as seen by the sitemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: Option<String>,
    pub status: String,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
}

impl JobRecord {
    /// Status value that makes a job publicly listed
    pub const OPEN_STATUS: &'static str = "Open";

    pub fn is_open(&self) -> bool {
        self.status == Self::OPEN_STATUS
    }

    /// Whether `id` can form a listing URL (non-blank)
    pub fn is_listable_id(id: &str) -> bool {
        !is_blank(id)
    }

    /// `updated_at`, falling back to `created_at` (empty strings count as absent)
    pub fn last_modified(&self) -> Option<&str> {
        first_present(&self.updated_at, &self.created_at)
    }
}

/// Public referrer profile as seen by the sitemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub username: Option<String>,
    pub updated_at: Option<String>,
    pub created_at: Option<String>,
}

impl ProfileRecord {
    /// Username if it is non-null and not blank; returned untrimmed
    pub fn public_username(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|username| Self::is_public_username(username))
    }

    /// Eligibility rule shared by the sitemap and the profile count
    pub fn is_public_username(username: &str) -> bool {
        !is_blank(username)
    }

    pub fn last_modified(&self) -> Option<&str> {
        first_present(&self.updated_at, &self.created_at)
    }
}

/// Blank means empty or Unicode whitespace only
fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn first_present<'a>(primary: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    primary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.as_deref().filter(|s| !s.is_empty()))
}

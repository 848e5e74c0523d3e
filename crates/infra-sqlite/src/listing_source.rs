// SQLite ListingSource Implementation

use async_trait::async_trait;
use refery_core::domain::{JobRecord, ProfileRecord};
use refery_core::error::{AppError, Result};
use refery_core::port::ListingSource;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::map_sqlx_error;

pub struct SqliteListingSource {
    pool: SqlitePool,
}

impl SqliteListingSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a company (jobs must reference one)
    pub async fn insert_company(&self, id: &str, name: &str, created_at: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO companies (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    /// Insert a job posting owned by `company_id`
    pub async fn insert_job(&self, company_id: &str, job: &JobRecord) -> Result<()> {
        if !JobRecord::is_listable_id(&job.id) {
            return Err(AppError::Validation("job id must not be empty".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO jobs (id, company_id, title, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(company_id)
        .bind(&job.title)
        .bind(&job.status)
        .bind(&job.created_at)
        .bind(&job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(job_id = %job.id, status = %job.status, "Job inserted");
        Ok(())
    }

    /// Change a job's status and stamp `updated_at`
    pub async fn update_job_status(&self, job_id: &str, status: &str, updated_at: &str) -> Result<()> {
        let result = sqlx::query("UPDATE jobs SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(updated_at)
            .bind(job_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("job {}", job_id)));
        }

        Ok(())
    }

    /// Insert a referrer profile
    pub async fn insert_profile(&self, id: &str, profile: &ProfileRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO referrer_profiles (id, username, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&profile.username)
        .bind(&profile.created_at)
        .bind(&profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl ListingSource for SqliteListingSource {
    async fn fetch_open_jobs(&self) -> Result<Vec<JobRecord>> {
        let rows: Vec<JobRow> = sqlx::query_as(
            r#"
            SELECT id, title, status, updated_at, created_at
            FROM jobs
            WHERE status = ?
            ORDER BY updated_at DESC
            "#,
        )
        .bind(JobRecord::OPEN_STATUS)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().filter_map(JobRow::into_record).collect())
    }

    async fn fetch_public_profiles(&self) -> Result<Vec<ProfileRecord>> {
        let rows: Vec<ProfileRow> = sqlx::query_as(
            r#"
            SELECT username, updated_at, created_at
            FROM referrer_profiles
            WHERE username IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProfileRow::into_record).collect())
    }

    // Counted with the record eligibility rules, not SQL TRIM (ASCII only)
    async fn count_open_jobs(&self) -> Result<i64> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM jobs WHERE status = ?")
            .bind(JobRecord::OPEN_STATUS)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count_where(&ids, JobRecord::is_listable_id))
    }

    async fn count_public_profiles(&self) -> Result<i64> {
        let usernames: Vec<String> = sqlx::query_scalar(
            "SELECT username FROM referrer_profiles WHERE username IS NOT NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count_where(&usernames, ProfileRecord::is_public_username))
    }
}

fn count_where(values: &[String], eligible: fn(&str) -> bool) -> i64 {
    values.iter().filter(|value| eligible(value.as_str())).count() as i64
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: String,
    title: Option<String>,
    status: String,
    updated_at: Option<String>,
    created_at: Option<String>,
}

impl JobRow {
    fn into_record(self) -> Option<JobRecord> {
        if !JobRecord::is_listable_id(&self.id) {
            warn!("Dropping job row with empty id");
            return None;
        }

        Some(JobRecord {
            id: self.id,
            title: self.title,
            status: self.status,
            updated_at: self.updated_at,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    username: Option<String>,
    updated_at: Option<String>,
    created_at: Option<String>,
}

impl ProfileRow {
    fn into_record(self) -> ProfileRecord {
        ProfileRecord {
            username: self.username,
            updated_at: self.updated_at,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup_test_db() -> SqliteListingSource {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let source = SqliteListingSource::new(pool);
        source
            .insert_company("acme", "Acme", "2024-01-01T00:00:00Z")
            .await
            .unwrap();
        source
    }

    fn job(id: &str, status: &str, updated_at: Option<&str>) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: Some(format!("Job {}", id)),
            status: status.to_string(),
            updated_at: updated_at.map(str::to_string),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
        }
    }

    fn profile(username: Option<&str>) -> ProfileRecord {
        ProfileRecord {
            username: username.map(str::to_string),
            updated_at: Some("2024-03-01T00:00:00Z".to_string()),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_open_jobs_filters_and_orders() {
        let source = setup_test_db().await;
        source
            .insert_job("acme", &job("1", "Open", Some("2024-05-01T00:00:00Z")))
            .await
            .unwrap();
        source
            .insert_job("acme", &job("2", "Closed", Some("2024-06-01T00:00:00Z")))
            .await
            .unwrap();
        source
            .insert_job("acme", &job("3", "Open", Some("2024-06-01T00:00:00Z")))
            .await
            .unwrap();

        let jobs = source.fetch_open_jobs().await.unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
        assert!(jobs.iter().all(JobRecord::is_open));
        assert_eq!(source.count_open_jobs().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_timestamps_pass_through_verbatim() {
        let source = setup_test_db().await;
        let mut record = job("7", "Open", None);
        record.created_at = Some("2024-02-03 04:05:06".to_string());
        source.insert_job("acme", &record).await.unwrap();

        let jobs = source.fetch_open_jobs().await.unwrap();
        assert_eq!(jobs[0].updated_at, None);
        assert_eq!(jobs[0].created_at.as_deref(), Some("2024-02-03 04:05:06"));
    }

    #[tokio::test]
    async fn test_update_job_status() {
        let source = setup_test_db().await;
        source
            .insert_job("acme", &job("1", "Open", None))
            .await
            .unwrap();

        source
            .update_job_status("1", "Closed", "2024-07-01T00:00:00Z")
            .await
            .unwrap();
        assert!(source.fetch_open_jobs().await.unwrap().is_empty());

        let missing = source
            .update_job_status("404", "Closed", "2024-07-01T00:00:00Z")
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_insert_job_requires_company() {
        let source = setup_test_db().await;
        let result = source.insert_job("ghost", &job("1", "Open", None)).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_profiles_exclude_null_usernames() {
        let source = setup_test_db().await;
        source.insert_profile("p1", &profile(Some("alice"))).await.unwrap();
        source.insert_profile("p2", &profile(None)).await.unwrap();
        source.insert_profile("p3", &profile(Some(" \t"))).await.unwrap();

        // Blank usernames are returned; the builder drops them
        let profiles = source.fetch_public_profiles().await.unwrap();
        assert_eq!(profiles.len(), 2);
        assert!(profiles.iter().all(|p| p.username.is_some()));

        // Counts agree with what ends up in the sitemap
        assert_eq!(source.count_public_profiles().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_profile_count_matches_unicode_blank_filtering() {
        let source = setup_test_db().await;
        for (id, username) in [
            ("p1", "alice"),
            ("p2", "\u{00A0}"),
            ("p3", "\u{3000}"),
            ("p4", "\u{000B}"),
        ] {
            source.insert_profile(id, &profile(Some(username))).await.unwrap();
        }

        let eligible = source
            .fetch_public_profiles()
            .await
            .unwrap()
            .iter()
            .filter(|p| p.public_username().is_some())
            .count() as i64;

        assert_eq!(eligible, 1);
        assert_eq!(source.count_public_profiles().await.unwrap(), eligible);
    }

    #[tokio::test]
    async fn test_job_count_skips_blank_ids() {
        let source = setup_test_db().await;
        source
            .insert_job("acme", &job("1", "Open", None))
            .await
            .unwrap();
        // Bypass insert_job, which refuses blank ids
        sqlx::query("INSERT INTO jobs (id, company_id, status) VALUES (?, 'acme', 'Open')")
            .bind("\u{00A0}")
            .execute(source.pool())
            .await
            .unwrap();

        assert_eq!(source.fetch_open_jobs().await.unwrap().len(), 1);
        assert_eq!(source.count_open_jobs().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let source = setup_test_db().await;
        source.insert_profile("p1", &profile(Some("alice"))).await.unwrap();
        let result = source.insert_profile("p2", &profile(Some("alice"))).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_closed_pool_surfaces_error() {
        let source = setup_test_db().await;
        source.pool().close().await;

        tokio_test::assert_err!(source.fetch_open_jobs().await);
        tokio_test::assert_err!(source.count_public_profiles().await);
    }
}

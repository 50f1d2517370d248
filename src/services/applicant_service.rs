use async_trait::async_trait;
use sqlx::PgPool;

use crate::dto::applicant_dto::ApplyPayload;
use crate::error::{Error, Result};
use crate::models::applicant::{Applicant, ApplicationStatus, PendingApplication};

/// Command/query surface of the application record store as seen by the
/// screening pipeline. The worker is the only writer of `status`,
/// `ai_score`, `skills_match`, `experience_match` and `ai_feedback`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicantStore: Send + Sync {
    /// Pending applications joined with their listing's screening context,
    /// oldest first.
    async fn select_pending(&self, limit: i64) -> Result<Vec<PendingApplication>>;

    /// Claims one application for processing: `pending -> review`,
    /// conditional on the row still being pending so two ticks cannot both
    /// take it. Returns false when the row was already claimed.
    async fn claim(&self, id: i64) -> Result<bool>;

    /// Unconditional status write, used to roll a failed item back to
    /// `pending` for a later tick.
    async fn update_status(&self, id: i64, status: ApplicationStatus) -> Result<()>;

    /// Persists the full screening result tuple in one statement.
    async fn update_result(
        &self,
        id: i64,
        status: ApplicationStatus,
        score: i32,
        skills_match: &[String],
        experience_match: &str,
        ai_feedback: &str,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct ApplicantService {
    pool: PgPool,
}

impl ApplicantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_application(&self, payload: &ApplyPayload) -> Result<i64> {
        let listing_id: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM listings WHERE listing_uuid = $1")
                .bind(payload.listing_uuid)
                .fetch_optional(&self.pool)
                .await?;
        let Some((listing_id,)) = listing_id else {
            return Err(Error::NotFound("Listing not found".to_string()));
        };

        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM applicants WHERE listing_id = $1 AND email = $2")
                .bind(listing_id)
                .bind(&payload.email)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(Error::Conflict(
                "You have already applied for this position with this email".to_string(),
            ));
        }

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO applicants
            (listing_id, fullname, email, phone, linkedin, resume_url, cover_letter, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
            RETURNING id
            "#,
        )
        .bind(listing_id)
        .bind(&payload.full_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.linkedin)
        .bind(&payload.resume_url)
        .bind(&payload.cover_letter)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn list_for_listing(&self, listing_id: i64) -> Result<Vec<Applicant>> {
        let applicants = sqlx::query_as::<_, Applicant>(
            r#"
            SELECT id, listing_id, fullname, email, phone, linkedin, resume_url,
                   cover_letter, status, ai_score, skills_match, experience_match,
                   ai_feedback, notes, created_at, updated_at
            FROM applicants
            WHERE listing_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applicants)
    }
}

#[async_trait]
impl ApplicantStore for ApplicantService {
    async fn select_pending(&self, limit: i64) -> Result<Vec<PendingApplication>> {
        let pending = sqlx::query_as::<_, PendingApplication>(
            r#"
            SELECT
                a.id,
                a.fullname,
                a.email,
                a.resume_url,
                a.cover_letter,
                a.listing_id,
                l.title AS job_title,
                l.description AS job_description,
                l.skills AS job_skills,
                l.custom_instructions,
                l.experience_level,
                l.employment_type
            FROM applicants a
            JOIN listings l ON a.listing_id = l.id
            WHERE a.status = 'pending'
            ORDER BY a.created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(pending)
    }

    async fn claim(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applicants
            SET status = 'review', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_status(&self, id: i64, status: ApplicationStatus) -> Result<()> {
        sqlx::query("UPDATE applicants SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_result(
        &self,
        id: i64,
        status: ApplicationStatus,
        score: i32,
        skills_match: &[String],
        experience_match: &str,
        ai_feedback: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE applicants
            SET status = $1,
                ai_score = $2,
                skills_match = $3,
                experience_match = $4,
                ai_feedback = $5,
                updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(status)
        .bind(score)
        .bind(skills_match)
        .bind(experience_match)
        .bind(ai_feedback)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

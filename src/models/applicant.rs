use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an application. The screening worker owns every transition
/// after insert: `pending -> review` is the claim, `review` resolves to
/// `interview`/`review`/`rejected` by score, or rolls back to `pending` when
/// processing fails after the claim. `interview` and `rejected` are terminal
/// for the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Review,
    Interview,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Review => "review",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Applicant {
    pub id: i64,
    pub listing_id: i64,
    pub fullname: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub resume_url: String,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub ai_score: Option<i32>,
    pub skills_match: Option<Vec<String>>,
    pub experience_match: Option<String>,
    pub ai_feedback: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A pending application joined with the screening context of its listing,
/// as selected by the claim query.
#[derive(Debug, Clone, FromRow)]
pub struct PendingApplication {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub resume_url: String,
    pub cover_letter: Option<String>,
    pub listing_id: i64,
    pub job_title: String,
    pub job_description: String,
    pub job_skills: Vec<String>,
    pub custom_instructions: Option<String>,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
}

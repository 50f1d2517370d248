use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::applicant::Applicant;
use crate::models::evaluation::CompatibilityAnalysis;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyPayload {
    pub listing_uuid: uuid::Uuid,
    #[validate(length(min = 1))]
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    #[validate(url)]
    #[serde(rename = "resumeUrl")]
    pub resume_url: String,
    #[serde(rename = "coverLetter")]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantListPayload {
    pub listing_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantListResponse {
    pub success: bool,
    pub applicants: Vec<Applicant>,
    pub total: usize,
}

/// Request body of the interactive resume pre-check. `resume_url` and
/// `job_description` are checked in the handler so their absence surfaces as
/// a `{success:false, message}` body instead of a 400.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeCheckPayload {
    #[serde(rename = "resumeUrl", default)]
    pub resume_url: Option<String>,
    #[serde(rename = "jobDescription", default)]
    pub job_description: Option<String>,
    #[serde(rename = "jobTitle", default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeCheckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<CompatibilityAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResumeCheckResponse {
    pub fn ok(analysis: CompatibilityAnalysis) -> Self {
        Self {
            success: true,
            analysis: Some(analysis),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis: None,
            message: Some(message.into()),
        }
    }
}

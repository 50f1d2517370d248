use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use tracing::error;
use validator::Validate;

use crate::{
    dto::applicant_dto::{
        ApplicantListPayload, ApplicantListResponse, ApplyPayload, ApplyResponse,
        ResumeCheckPayload, ResumeCheckResponse,
    },
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/listings/apply",
    request_body = ApplyPayload,
    responses(
        (status = 200, description = "Application submitted", body = Json<ApplyResponse>),
        (status = 404, description = "Listing not found")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    match state.applicant_service.create_application(&payload).await {
        Ok(application_id) => Ok(Json(ApplyResponse {
            success: true,
            application_id: Some(application_id),
            message: None,
        })),
        // Duplicate applications answer with a structured body, not a bare
        // status, so the application form can display the reason.
        Err(Error::Conflict(message)) => Ok(Json(ApplyResponse {
            success: false,
            application_id: None,
            message: Some(message),
        })),
        Err(other) => Err(other),
    }
}

#[utoipa::path(
    post,
    path = "/api/applicants/list",
    request_body = ApplicantListPayload,
    responses(
        (status = 200, description = "Applicants for a listing", body = Json<ApplicantListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_applicants(
    State(state): State<AppState>,
    Json(payload): Json<ApplicantListPayload>,
) -> Result<impl IntoResponse> {
    let applicants = state
        .applicant_service
        .list_for_listing(payload.listing_id)
        .await?;
    let total = applicants.len();
    Ok(Json(ApplicantListResponse {
        success: true,
        applicants,
        total,
    }))
}

/// Interactive resume pre-check. Always answers 200 with a structured
/// `{success, ...}` body; pipeline failures become `{success:false, message}`
/// rather than an error status.
#[utoipa::path(
    post,
    path = "/api/applicants/check",
    request_body = ResumeCheckPayload,
    responses(
        (status = 200, description = "Compatibility analysis or structured failure", body = Json<ResumeCheckResponse>)
    )
)]
#[axum::debug_handler]
pub async fn check_resume(
    State(state): State<AppState>,
    Json(payload): Json<ResumeCheckPayload>,
) -> Json<ResumeCheckResponse> {
    let Some(resume_url) = payload.resume_url.as_deref().filter(|s| !s.trim().is_empty()) else {
        return Json(ResumeCheckResponse::failed("Resume URL is required"));
    };
    let Some(job_description) = payload
        .job_description
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    else {
        return Json(ResumeCheckResponse::failed("Job description is required"));
    };

    let job_title = payload.job_title.as_deref().unwrap_or("");
    let skills = payload.skills.clone().unwrap_or_default();

    match state
        .screening_service
        .check_resume(resume_url, job_title, job_description, &skills)
        .await
    {
        Ok(analysis) => Json(ResumeCheckResponse::ok(analysis)),
        Err(e) => {
            error!(error = ?e, "Resume check error");
            Json(ResumeCheckResponse::failed(
                "Failed to check resume compatibility",
            ))
        }
    }
}

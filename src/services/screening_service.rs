use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::Result;
use crate::models::applicant::{ApplicationStatus, PendingApplication};
use crate::models::evaluation::CompatibilityAnalysis;
use crate::services::ai_service::{
    build_check_prompt, build_screening_prompt, parse_compatibility, parse_evaluation,
    CandidateEvaluator, CHECK_SYSTEM_PROMPT, SCREENING_SYSTEM_PROMPT,
};
use crate::services::applicant_service::ApplicantStore;
use crate::services::extract_service::TextExtractor;

/// Drives the resume screening pipeline: claim pending work, extract resume
/// text, ask the evaluator for a score, parse, and transition the
/// application. All collaborators are injected so the whole run can be
/// exercised against fakes.
#[derive(Clone)]
pub struct ScreeningService {
    store: Arc<dyn ApplicantStore>,
    extractor: Arc<dyn TextExtractor>,
    evaluator: Arc<dyn CandidateEvaluator>,
    batch_size: i64,
}

impl ScreeningService {
    pub fn new(
        store: Arc<dyn ApplicantStore>,
        extractor: Arc<dyn TextExtractor>,
        evaluator: Arc<dyn CandidateEvaluator>,
        batch_size: i64,
    ) -> Self {
        Self {
            store,
            extractor,
            evaluator,
            batch_size,
        }
    }

    /// One batch tick. Items are processed sequentially to bound pressure on
    /// the evaluator service. A failure after the claim rolls that item back
    /// to `pending` and never aborts the rest of the batch; selection and
    /// claim failures abort the tick and are handled by the worker loop.
    pub async fn run_once(&self) -> Result<usize> {
        let pending = self.store.select_pending(self.batch_size).await?;
        if pending.is_empty() {
            return Ok(0);
        }
        info!("Found {} pending applications to process", pending.len());

        let mut processed = 0;
        for applicant in &pending {
            // Claim before any external call. A concurrent tick that
            // selected the same row loses this write and skips it.
            if !self.store.claim(applicant.id).await? {
                debug!(
                    "Application #{} already claimed by another run, skipping",
                    applicant.id
                );
                continue;
            }

            info!(
                "Processing application #{} from {} for {}",
                applicant.id, applicant.fullname, applicant.job_title
            );

            match self.process_application(applicant).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    error!(error = ?e, "Error processing application #{}", applicant.id);
                    // Roll the claim back so a later tick retries the item.
                    if let Err(rollback_err) = self
                        .store
                        .update_status(applicant.id, ApplicationStatus::Pending)
                        .await
                    {
                        error!(
                            error = ?rollback_err,
                            "Failed to roll application #{} back to pending", applicant.id
                        );
                    }
                }
            }
        }

        info!("Completed AI resume screening pass");
        Ok(processed)
    }

    async fn process_application(&self, applicant: &PendingApplication) -> Result<()> {
        let resume_text = self.extractor.extract_text(&applicant.resume_url).await;
        let prompt = build_screening_prompt(applicant, &resume_text);
        let raw_response = self.evaluator.chat(SCREENING_SYSTEM_PROMPT, &prompt).await?;

        let evaluation = parse_evaluation(&raw_response);
        let status = evaluation.target_status();
        let feedback = format!(
            "AI Recommendation: {}. Score: {}/100.",
            evaluation.recommendation.to_uppercase(),
            evaluation.score
        );

        self.store
            .update_result(
                applicant.id,
                status,
                evaluation.score,
                &evaluation.matching_skills,
                &evaluation.experience_analysis,
                &feedback,
            )
            .await?;

        info!(
            "Processed application #{} - Score: {}, Status: {}",
            applicant.id, evaluation.score, status
        );
        Ok(())
    }

    /// Stateless scoring preview for the interactive pre-check. Runs the
    /// same extract -> evaluate -> parse chain with the shorter prompt and
    /// returns the result directly; nothing is persisted and the claim
    /// machinery is not involved.
    pub async fn check_resume(
        &self,
        resume_url: &str,
        job_title: &str,
        job_description: &str,
        skills: &[String],
    ) -> Result<CompatibilityAnalysis> {
        let resume_text = self.extractor.extract_text(resume_url).await;
        let prompt = build_check_prompt(job_title, job_description, skills, &resume_text);
        let raw_response = self.evaluator.chat(CHECK_SYSTEM_PROMPT, &prompt).await?;
        Ok(parse_compatibility(&raw_response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::ai_service::MockCandidateEvaluator;
    use crate::services::applicant_service::MockApplicantStore;
    use crate::services::extract_service::MockTextExtractor;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn pending(id: i64, fullname: &str) -> PendingApplication {
        PendingApplication {
            id,
            fullname: fullname.to_string(),
            email: format!("{}@example.com", fullname.to_lowercase()),
            resume_url: format!("https://cv.example/{}.pdf", id),
            cover_letter: None,
            listing_id: 1,
            job_title: "Backend Engineer".to_string(),
            job_description: "Build services".to_string(),
            job_skills: vec!["Python".to_string(), "AWS".to_string()],
            custom_instructions: None,
            experience_level: Some("Mid".to_string()),
            employment_type: None,
        }
    }

    fn evaluator_with_fixed_response(raw: &'static str) -> MockCandidateEvaluator {
        let mut evaluator = MockCandidateEvaluator::new();
        evaluator
            .expect_chat()
            .returning(move |_, _| Ok(raw.to_string()));
        evaluator
    }

    fn extractor_with_text(text: &'static str) -> MockTextExtractor {
        let mut extractor = MockTextExtractor::new();
        extractor
            .expect_extract_text()
            .returning(move |_| text.to_string());
        extractor
    }

    fn service(
        store: MockApplicantStore,
        extractor: MockTextExtractor,
        evaluator: MockCandidateEvaluator,
    ) -> ScreeningService {
        ScreeningService::new(
            Arc::new(store),
            Arc::new(extractor),
            Arc::new(evaluator),
            10,
        )
    }

    #[tokio::test]
    async fn high_score_moves_application_to_interview() {
        let mut store = MockApplicantStore::new();
        store
            .expect_select_pending()
            .with(eq(10))
            .returning(|_| Ok(vec![pending(1, "Ada")]));
        store.expect_claim().with(eq(1)).returning(|_| Ok(true));
        store
            .expect_update_result()
            .withf(|id, status, score, skills, experience, feedback| {
                *id == 1
                    && *status == ApplicationStatus::Interview
                    && *score == 85
                    && skills == ["Python".to_string(), "AWS".to_string()]
                    && experience == "Strong match"
                    && feedback == "AI Recommendation: STRONG MATCH. Score: 85/100."
            })
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(()));

        let svc = service(
            store,
            extractor_with_text("5 years Python, AWS, Docker"),
            evaluator_with_fixed_response(
                r#"{"score": 85, "matchingSkills": ["Python", "AWS"], "experienceAnalysis": "Strong match", "recommendation": "strong match"}"#,
            ),
        );

        assert_eq!(svc.run_once().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mid_score_keeps_application_in_review() {
        let mut store = MockApplicantStore::new();
        store
            .expect_select_pending()
            .returning(|_| Ok(vec![pending(2, "Bob")]));
        store.expect_claim().returning(|_| Ok(true));
        store
            .expect_update_result()
            .withf(|_, status, score, _, _, _| {
                *status == ApplicationStatus::Review && *score == 60
            })
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(()));

        let svc = service(
            store,
            extractor_with_text("some experience"),
            evaluator_with_fixed_response(r#"{"score": 60, "recommendation": "consider"}"#),
        );
        assert_eq!(svc.run_once().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn low_score_rejects_application() {
        let mut store = MockApplicantStore::new();
        store
            .expect_select_pending()
            .returning(|_| Ok(vec![pending(3, "Cem")]));
        store.expect_claim().returning(|_| Ok(true));
        store
            .expect_update_result()
            .withf(|_, status, score, _, _, _| {
                *status == ApplicationStatus::Rejected && *score == 20
            })
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(()));

        let svc = service(
            store,
            extractor_with_text("unrelated background"),
            evaluator_with_fixed_response(r#"{"score": 20, "recommendation": "reject"}"#),
        );
        assert_eq!(svc.run_once().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn evaluator_failure_rolls_claim_back_without_writing_results() {
        let mut store = MockApplicantStore::new();
        store
            .expect_select_pending()
            .returning(|_| Ok(vec![pending(4, "Dee")]));
        store.expect_claim().with(eq(4)).returning(|_| Ok(true));
        store.expect_update_result().times(0);
        store
            .expect_update_status()
            .with(eq(4), eq(ApplicationStatus::Pending))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut evaluator = MockCandidateEvaluator::new();
        evaluator
            .expect_chat()
            .returning(|_, _| Err(Error::Evaluation("AI service error 503".to_string())));

        let svc = service(store, extractor_with_text("text"), evaluator);
        assert_eq!(svc.run_once().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn one_failing_item_does_not_abort_the_batch() {
        let mut store = MockApplicantStore::new();
        store.expect_select_pending().returning(|_| {
            Ok(vec![pending(1, "Ada"), pending(2, "Bob"), pending(3, "Cem")])
        });
        store.expect_claim().times(3).returning(|_| Ok(true));
        store
            .expect_update_result()
            .withf(|id, status, _, _, _, _| {
                (*id == 1 || *id == 3) && *status == ApplicationStatus::Interview
            })
            .times(2)
            .returning(|_, _, _, _, _, _| Ok(()));
        store
            .expect_update_status()
            .with(eq(2), eq(ApplicationStatus::Pending))
            .times(1)
            .returning(|_, _| Ok(()));

        // Extractor tags each resume with its URL so the evaluator stub can
        // single out the middle item.
        let mut extractor = MockTextExtractor::new();
        extractor
            .expect_extract_text()
            .returning(|url| format!("resume from {}", url));

        let mut evaluator = MockCandidateEvaluator::new();
        evaluator.expect_chat().returning(|_, user_prompt| {
            if user_prompt.contains("cv.example/2.pdf") {
                Err(Error::Evaluation("connection reset".to_string()))
            } else {
                Ok(r#"{"score": 90, "recommendation": "strong match"}"#.to_string())
            }
        });

        let svc = service(store, extractor, evaluator);
        assert_eq!(svc.run_once().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn claim_write_precedes_evaluator_call() {
        let mut seq = Sequence::new();
        let mut store = MockApplicantStore::new();
        let mut evaluator = MockCandidateEvaluator::new();

        store
            .expect_select_pending()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![pending(5, "Eve")]));
        store
            .expect_claim()
            .with(eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        evaluator
            .expect_chat()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(r#"{"score": 75, "recommendation": "consider"}"#.to_string()));
        store
            .expect_update_result()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _, _, _| Ok(()));

        let svc = service(store, extractor_with_text("text"), evaluator);
        svc.run_once().await.unwrap();
    }

    #[tokio::test]
    async fn lost_claim_skips_the_item() {
        let mut store = MockApplicantStore::new();
        store
            .expect_select_pending()
            .returning(|_| Ok(vec![pending(6, "Fay")]));
        store.expect_claim().with(eq(6)).returning(|_| Ok(false));
        store.expect_update_result().times(0);
        store.expect_update_status().times(0);

        let mut evaluator = MockCandidateEvaluator::new();
        evaluator.expect_chat().times(0);

        let svc = service(store, extractor_with_text("text"), evaluator);
        assert_eq!(svc.run_once().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_queue_is_a_quiet_tick() {
        let mut store = MockApplicantStore::new();
        store.expect_select_pending().returning(|_| Ok(vec![]));

        let svc = service(
            store,
            MockTextExtractor::new(),
            MockCandidateEvaluator::new(),
        );
        assert_eq!(svc.run_once().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn garbage_evaluator_output_rejects_with_defaults() {
        let mut store = MockApplicantStore::new();
        store
            .expect_select_pending()
            .returning(|_| Ok(vec![pending(7, "Gil")]));
        store.expect_claim().returning(|_| Ok(true));
        store
            .expect_update_result()
            .withf(|_, status, score, skills, experience, feedback| {
                *status == ApplicationStatus::Rejected
                    && *score == 0
                    && skills.is_empty()
                    && experience == "Failed to analyze resume"
                    && feedback == "AI Recommendation: REJECT. Score: 0/100."
            })
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(()));

        let svc = service(
            store,
            extractor_with_text("text"),
            evaluator_with_fixed_response("I cannot answer in the requested format."),
        );
        assert_eq!(svc.run_once().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn check_resume_returns_analysis_without_touching_the_store() {
        let mut store = MockApplicantStore::new();
        store.expect_select_pending().times(0);
        store.expect_claim().times(0);
        store.expect_update_status().times(0);
        store.expect_update_result().times(0);

        let svc = service(
            store,
            extractor_with_text("5 years Python, AWS, Docker"),
            evaluator_with_fixed_response(
                r#"{"assessment": "Solid overlap with the role", "matchScore": 82, "recommendation": "Good fit"}"#,
            ),
        );

        let analysis = svc
            .check_resume(
                "https://cv.example/ada.pdf",
                "Backend Engineer",
                "Build services",
                &["Python".to_string(), "AWS".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(analysis.match_score, 82);
        assert_eq!(analysis.recommendation, "Good fit");
    }

    #[tokio::test]
    async fn check_resume_surfaces_evaluator_failure() {
        let mut evaluator = MockCandidateEvaluator::new();
        evaluator
            .expect_chat()
            .returning(|_, _| Err(Error::Evaluation("timeout".to_string())));

        let svc = service(
            MockApplicantStore::new(),
            extractor_with_text("text"),
            evaluator,
        );
        let err = svc
            .check_resume("https://cv.example/x.pdf", "Role", "Desc", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Evaluation(_)));
    }
}

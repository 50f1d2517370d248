pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::services::{
    ai_service::{AiService, CandidateEvaluator},
    applicant_service::ApplicantService,
    extract_service::{HttpTextExtractor, TextExtractor},
    listing_service::ListingService,
    screening_service::ScreeningService,
    stats_service::StatsService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub listing_service: ListingService,
    pub applicant_service: ApplicantService,
    pub stats_service: StatsService,
    pub screening_service: ScreeningService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap();

        let extractor: Arc<dyn TextExtractor> =
            Arc::new(HttpTextExtractor::new(http_client.clone()));
        let evaluator: Arc<dyn CandidateEvaluator> = Arc::new(AiService::new(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.ai_model.clone(),
            http_client,
        ));

        Self::with_components(pool, extractor, evaluator, config.screening_batch_size)
    }

    /// Wires the state from explicit pipeline components. Tests use this to
    /// substitute the extractor and evaluator with stubs.
    pub fn with_components(
        pool: PgPool,
        extractor: Arc<dyn TextExtractor>,
        evaluator: Arc<dyn CandidateEvaluator>,
        batch_size: i64,
    ) -> Self {
        let listing_service = ListingService::new(pool.clone());
        let applicant_service = ApplicantService::new(pool.clone());
        let stats_service = StatsService::new(pool.clone());
        let screening_service = ScreeningService::new(
            Arc::new(applicant_service.clone()),
            extractor,
            evaluator,
            batch_size,
        );

        Self {
            pool,
            listing_service,
            applicant_service,
            stats_service,
            screening_service,
        }
    }
}

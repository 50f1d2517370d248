pub mod ai_service;
pub mod applicant_service;
pub mod extract_service;
pub mod listing_service;
pub mod screening_service;
pub mod stats_service;

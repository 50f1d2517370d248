pub mod applicant;
pub mod evaluation;
pub mod listing;

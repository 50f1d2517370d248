pub mod applicant;
pub mod health;
pub mod listing;
pub mod stats;

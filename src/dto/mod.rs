pub mod applicant_dto;
pub mod listing_dto;
pub mod stats_dto;

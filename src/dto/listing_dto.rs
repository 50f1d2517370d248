use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::listing::Listing;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub department: Option<String>,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "experienceLevel")]
    pub experience_level: Option<String>,
    #[serde(rename = "employmentType")]
    pub employment_type: Option<String>,
    #[serde(rename = "customInstructions")]
    pub custom_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateListingPayload {
    pub listing_uuid: uuid::Uuid,
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub department: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    #[serde(rename = "experienceLevel")]
    pub experience_level: Option<String>,
    #[serde(rename = "employmentType")]
    pub employment_type: Option<String>,
    #[serde(rename = "customInstructions")]
    pub custom_instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetListingPayload {
    pub listing_uuid: uuid::Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingResponse {
    pub listing_uuid: uuid::Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingListResponse {
    pub listings: Vec<Listing>,
    pub message: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub id: i64,
    pub listing_uuid: Uuid,
    pub title: String,
    pub department: Option<String>,
    pub description: String,
    pub skills: Vec<String>,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
    pub custom_instructions: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

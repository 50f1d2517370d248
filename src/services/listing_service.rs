use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::listing_dto::{CreateListingPayload, UpdateListingPayload};
use crate::error::Result;
use crate::models::listing::Listing;

const LISTING_COLUMNS: &str = "id, listing_uuid, title, department, description, skills, \
                               experience_level, employment_type, custom_instructions, \
                               created_at, updated_at";

#[derive(Clone)]
pub struct ListingService {
    pool: PgPool,
}

impl ListingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateListingPayload) -> Result<Listing> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            r#"
            INSERT INTO listings
            (title, department, description, skills, experience_level, employment_type, custom_instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            LISTING_COLUMNS
        ))
        .bind(&payload.title)
        .bind(&payload.department)
        .bind(&payload.description)
        .bind(&payload.skills)
        .bind(&payload.experience_level)
        .bind(&payload.employment_type)
        .bind(&payload.custom_instructions)
        .fetch_one(&self.pool)
        .await?;
        Ok(listing)
    }

    pub async fn list(&self) -> Result<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {} FROM listings ORDER BY created_at DESC",
            LISTING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(listings)
    }

    pub async fn get_by_uuid(&self, listing_uuid: Uuid) -> Result<Listing> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {} FROM listings WHERE listing_uuid = $1",
            LISTING_COLUMNS
        ))
        .bind(listing_uuid)
        .fetch_one(&self.pool)
        .await?;
        Ok(listing)
    }

    pub async fn update(&self, payload: UpdateListingPayload) -> Result<Listing> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            r#"
            UPDATE listings
            SET title = COALESCE($2, title),
                department = COALESCE($3, department),
                description = COALESCE($4, description),
                skills = COALESCE($5, skills),
                experience_level = COALESCE($6, experience_level),
                employment_type = COALESCE($7, employment_type),
                custom_instructions = COALESCE($8, custom_instructions),
                updated_at = NOW()
            WHERE listing_uuid = $1
            RETURNING {}
            "#,
            LISTING_COLUMNS
        ))
        .bind(payload.listing_uuid)
        .bind(&payload.title)
        .bind(&payload.department)
        .bind(&payload.description)
        .bind(&payload.skills)
        .bind(&payload.experience_level)
        .bind(&payload.employment_type)
        .bind(&payload.custom_instructions)
        .fetch_one(&self.pool)
        .await?;
        Ok(listing)
    }
}

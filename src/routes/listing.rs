use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::listing_dto::{
        CreateListingPayload, CreateListingResponse, GetListingPayload, ListingListResponse,
        UpdateListingPayload,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/listings/new",
    request_body = CreateListingPayload,
    responses(
        (status = 201, description = "Listing created successfully", body = Json<CreateListingResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_listing(
    State(state): State<AppState>,
    Json(payload): Json<CreateListingPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let listing = state.listing_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateListingResponse {
            listing_uuid: listing.listing_uuid,
            message: "Inserted".to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/listings",
    responses(
        (status = 200, description = "All listings", body = Json<ListingListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_listings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let listings = state.listing_service.list().await?;
    Ok(Json(ListingListResponse {
        listings,
        message: "Success".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/listings/getbyid",
    request_body = GetListingPayload,
    responses(
        (status = 200, description = "Listing found"),
        (status = 404, description = "Listing not found")
    )
)]
#[axum::debug_handler]
pub async fn get_listing(
    State(state): State<AppState>,
    Json(payload): Json<GetListingPayload>,
) -> Result<impl IntoResponse> {
    let listing = state.listing_service.get_by_uuid(payload.listing_uuid).await?;
    Ok(Json(listing))
}

#[utoipa::path(
    post,
    path = "/api/listings/edit",
    request_body = UpdateListingPayload,
    responses(
        (status = 200, description = "Listing updated successfully"),
        (status = 404, description = "Listing not found")
    )
)]
#[axum::debug_handler]
pub async fn edit_listing(
    State(state): State<AppState>,
    Json(payload): Json<UpdateListingPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let listing = state.listing_service.update(payload).await?;
    Ok(Json(listing))
}

//! API route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::server::SharedState;
use crate::auth::UserIdentity;
use crate::error::{Error, Result};
use crate::store::{NewReview, Review};

// Request types

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewQuery {
    pub review_text: String,
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn current_user(Extension(identity): Extension<UserIdentity>) -> Json<Value> {
    Json(json!({ "User": identity }))
}

// Review routes

pub async fn list_reviews(
    State(state): State<SharedState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Review>>> {
    let reviews = state.store.list_reviews(page.skip, page.limit).await?;
    Ok(Json(reviews))
}

pub async fn show_review(
    State(state): State<SharedState>,
    Path(review_id): Path<i64>,
) -> Result<Json<Review>> {
    state
        .store
        .get_review(review_id)
        .await?
        .map(Json)
        .ok_or(Error::ReviewNotFound(review_id))
}

pub async fn create_review(
    State(state): State<SharedState>,
    Extension(identity): Extension<UserIdentity>,
    Json(review): Json<NewReview>,
) -> Result<(StatusCode, Json<Review>)> {
    review.validate()?;

    let created = state.store.create_review(review).await?;
    tracing::info!(
        "Review {} created by {} for '{}'",
        created.id,
        identity.username,
        created.song_name
    );

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_review(
    State(state): State<SharedState>,
    Extension(identity): Extension<UserIdentity>,
    Path(review_id): Path<i64>,
    Query(update): Query<UpdateReviewQuery>,
) -> Result<Json<Review>> {
    if update.review_text.trim().is_empty() {
        return Err(Error::Validation("review_text must not be empty".to_string()));
    }

    let review = state
        .store
        .update_review_text(review_id, &update.review_text)
        .await?
        .ok_or(Error::ReviewNotFound(review_id))?;
    tracing::info!("Review {} updated by {}", review_id, identity.username);

    Ok(Json(review))
}

pub async fn remove_review(
    State(state): State<SharedState>,
    Extension(identity): Extension<UserIdentity>,
    Path(review_id): Path<i64>,
) -> Result<Json<Value>> {
    if !state.store.delete_review(review_id).await? {
        return Err(Error::ReviewNotFound(review_id));
    }
    tracing::info!("Review {} deleted by {}", review_id, identity.username);

    Ok(Json(json!({ "id": review_id, "deleted": true })))
}

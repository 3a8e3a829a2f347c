//! Registration and login handlers

use axum::{extract::State, http::StatusCode, Form, Json};

use super::server::SharedState;
use crate::auth::models::{IssuedToken, RegisterRequest, TokenRequest, UserIdentity};
use crate::error::Result;

/// POST /auth
pub async fn register(
    State(state): State<SharedState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserIdentity>)> {
    req.validate()?;

    let identity = state.verifier.register(&req.username, &req.password).await?;
    Ok((StatusCode::CREATED, Json(identity)))
}

/// POST /token
pub async fn login(
    State(state): State<SharedState>,
    Form(req): Form<TokenRequest>,
) -> Result<Json<IssuedToken>> {
    tracing::info!("Login attempt: {}", req.username);

    let identity = state.verifier.verify(&req.username, &req.password).await?;
    let token = state.issuer.issue(&identity)?;

    tracing::info!("Login successful: {}", identity.username);
    Ok(Json(token))
}

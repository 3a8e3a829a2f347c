//! HTTP API server

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, CredentialVerifier, TokenIssuer, TokenValidator};
use crate::config::Config;
use crate::error::Result;
use crate::store::{self, SharedStore};

use super::{auth, routes};

/// Application state shared across handlers. Nothing in it changes after startup.
pub struct AppState {
    pub store: SharedStore,
    pub verifier: CredentialVerifier,
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
}

pub type SharedState = Arc<AppState>;

/// Check the auth settings, open the store and assemble the state
pub async fn build_state(config: &Config) -> Result<SharedState> {
    // Signing setup is checked before the database is touched
    let issuer = TokenIssuer::from_config(&config.auth)?;
    let validator = TokenValidator::from_config(&config.auth)?;

    let store = store::open_store(&config.database).await?;
    let verifier = CredentialVerifier::new(store.clone(), config.auth.bcrypt_cost)?;

    Ok(Arc::new(AppState {
        store,
        verifier,
        issuer,
        validator,
    }))
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = build_state(&config).await?;
    let app = create_router(state, &config.server.cors_origins);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Create the router with all routes
pub fn create_router(state: SharedState, cors_origins: &[String]) -> Router {
    let auth_layer = middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/health", get(routes::health))
        // Authentication
        .route("/auth", post(auth::register))
        .route("/token", post(auth::login))
        .route("/auth/token", post(auth::login))
        .route(
            "/current_user",
            get(routes::current_user).route_layer(auth_layer.clone()),
        )
        // Reviews
        .route("/reviews", get(routes::list_reviews))
        .route(
            "/review",
            post(routes::create_review).route_layer(auth_layer.clone()),
        )
        .route(
            "/review/{review_id}",
            get(routes::show_review).merge(
                patch(routes::update_review)
                    .delete(routes::remove_review)
                    .route_layer(auth_layer),
            ),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

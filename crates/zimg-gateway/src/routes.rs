//! Route definitions and router construction.

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{expected_header, validate_bearer};
use crate::handlers;
use crate::state::{AppState, GatewayContext};

/// Permissive CORS: any origin, method and header. Answers preflights
/// before routing, so `OPTIONS` never needs a token.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Generation endpoints, guarded by the bearer token.
fn protected_routes(api_key: &str) -> Router<AppState> {
    let expected = expected_header(api_key);
    let auth_layer = middleware::from_fn(move |req: Request, next: Next| {
        let expected = Arc::clone(&expected);
        async move { validate_bearer(expected, req, next).await }
    });

    Router::new()
        .route("/v1/images/generations", post(handlers::images::generate))
        .route("/v1/chat/completions", post(handlers::chat::completions))
        .route_layer(auth_layer)
}

/// Build the complete router.
///
/// Unknown paths get a JSON 404, or are served from the console directory
/// when one is configured.
pub fn create_router(ctx: GatewayContext) -> Router {
    let console_dir = ctx.config.console_dir.clone();
    let state: AppState = Arc::new(ctx);

    let router = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/v1/models", get(handlers::models::list))
        .route("/v1/query/status", post(handlers::status::query))
        .merge(protected_routes(&state.config.api_key));

    let router = match console_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(handlers::not_found),
    };

    router
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All REST endpoints are mounted under `/api`. The live feed lives at
//! `/ws` and, with the `swagger-ui` feature, interactive docs at
//! `/swagger-ui`.

pub mod dto;
pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the REST router with all `/api` endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().nest("/api", handlers::routes())
}

/// Builds the complete application: REST, WebSocket feed, docs, and the
/// tracing / CORS / timeout middleware stack.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let router = build_router().route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(request_timeout);

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(timeout),
        )
        .with_state(state)
}

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{health_check, translate};
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/translate", post(translate))
        .route("/health", get(health_check))
}

/// Routes plus the HTTP layers, ready to serve.
pub fn create_app(state: AppState) -> Router {
    create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

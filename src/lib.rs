pub mod config;
pub mod error;
pub mod handlers;
pub mod language;
pub mod routes;
pub mod state;
pub mod translate;
pub mod websocket;
pub mod widget;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Full application router with its shared state attached
pub fn build_app(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

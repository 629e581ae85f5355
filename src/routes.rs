use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::language::Language;
use crate::state::AppState;
use crate::widget::{view, WidgetState};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Widget page
        .route("/", get(index))
        .route("/logo.svg", get(logo))

        // WebSocket
        .route("/client-ws", get(websocket_handler))

        // REST API routes
        .route("/api/health", get(health_check))
        .route("/api/languages", get(get_languages))
}

async fn websocket_handler(
    ws: axum::extract::ws::WebSocketUpgrade,
    State(state): State<AppState>,
) -> axum::response::Response {
    crate::websocket::websocket_handler(ws, State(state)).await
}

/// First paint of a fresh widget; the WebSocket session starts from the same state
async fn index(State(state): State<AppState>) -> Html<String> {
    let translate = &state.config.translate;
    Html(view::page_html(&WidgetState::new(
        translate.char_limit,
        translate.target_language,
    )))
}

async fn logo() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], view::LOGO_SVG)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "translator": state.translator.provider(),
        "sessions": state.sessions.len()
    }))
}

async fn get_languages(State(state): State<AppState>) -> Json<Value> {
    let languages: Vec<Value> = Language::ALL
        .iter()
        .map(|lang| {
            json!({
                "code": lang.code(),
                "name": lang.display_name(),
                "rtl": lang.is_rtl()
            })
        })
        .collect();

    Json(json!({
        "languages": languages,
        "target": state.config.translate.target_language.code(),
        "char_limit": state.config.translate.char_limit
    }))
}

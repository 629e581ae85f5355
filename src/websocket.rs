use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::handlers;
use crate::state::AppState;
use crate::widget::{WidgetState, WidgetView};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Payload pushed to the client after every state change
pub fn state_update_message(widget: &WidgetState) -> Value {
    json!({
        "type": "state-update",
        "state": widget,
        "html": WidgetView::from_state(widget).render_html(),
    })
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_uid = state.generate_client_uid();
    info!("New WebSocket connection: {}", client_uid);

    let store = state.open_session(&client_uid);
    let mut updates = store.subscribe();
    let (mut sender, mut receiver) = socket.split();

    let initial_messages = vec![
        json!({
            "type": "session",
            "client_uid": client_uid
        }),
        state_update_message(&updates.borrow_and_update()),
    ];

    for msg in initial_messages {
        if let Err(e) = sender.send(Message::Text(msg.to_string())).await {
            error!("Failed to send initial message: {}", e);
            state.close_session(&client_uid);
            return;
        }
    }

    let (notice_tx, notice_rx) = mpsc::unbounded_channel::<Value>();
    let push_task = tokio::spawn(push_updates(sender, updates, notice_rx));

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = handlers::handle_message(&state, &client_uid, &text).await {
                    warn!("Rejected message from {}: {}", client_uid, e);
                    forward_notice(&notice_tx, &client_uid, error_notice(&e));
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", client_uid);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    push_task.abort();
    state.close_session(&client_uid);
    info!("Cleaned up client {}", client_uid);
}

fn error_notice(e: &anyhow::Error) -> Value {
    json!({
        "type": "error",
        "message": e.to_string()
    })
}

/// Queue a notice for the push task; returns false once that task has stopped
fn forward_notice(notices: &mpsc::UnboundedSender<Value>, client_uid: &str, notice: Value) -> bool {
    match notices.send(notice) {
        Ok(()) => true,
        Err(e) => {
            debug!("Dropped notice for {}: push task has stopped ({})", client_uid, e);
            false
        }
    }
}

/// Forward every new widget snapshot, plus any direct notices, to the client
async fn push_updates(
    mut sender: SplitSink<WebSocket, Message>,
    mut updates: watch::Receiver<WidgetState>,
    mut notices: mpsc::UnboundedReceiver<Value>,
) {
    loop {
        let msg = tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                state_update_message(&snapshot)
            }
            Some(notice) = notices.recv() => notice,
            else => break,
        };

        if let Err(e) = sender.send(Message::Text(msg.to_string())).await {
            debug!("Stopped pushing updates: {}", e);
            break;
        }
    }
}

use serde_json::Value;
use tracing::{debug, warn};

use crate::language::{Language, LanguageMode};
use crate::state::AppState;
use crate::widget::WidgetStore;

/// Apply one client event to the client's widget. State changes reach the
/// client through the session's observer, not through a reply here.
pub async fn handle_message(state: &AppState, client_uid: &str, text: &str) -> anyhow::Result<()> {
    let msg: Value = serde_json::from_str(text)?;
    let msg_type = msg.get("type").and_then(|v| v.as_str());

    let store = state
        .session(client_uid)
        .ok_or_else(|| anyhow::anyhow!("No session for client {}", client_uid))?;

    match msg_type {
        Some("set-input-text") => {
            handle_set_input_text(&store, client_uid, &msg)?;
        }
        Some("set-language-mode") => {
            handle_set_language_mode(&store, &msg)?;
        }
        Some("set-selected-language") => {
            handle_set_selected_language(&store, &msg)?;
        }
        Some("translate") => {
            handle_translate(store, client_uid);
        }
        Some("toggle-direction") => {
            store.toggle_direction();
        }
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
        }
    }

    Ok(())
}

fn required_str<'a>(msg: &'a Value, field: &str) -> anyhow::Result<&'a str> {
    msg.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("{} is required", field))
}

fn handle_set_input_text(store: &WidgetStore, client_uid: &str, msg: &Value) -> anyhow::Result<()> {
    let text = required_str(msg, "text")?;
    let accepted = match msg.get("revision").and_then(|v| v.as_u64()) {
        Some(revision) => store.apply_client_edit(text, revision),
        None => store.set_input_text(text),
    };
    if !accepted {
        debug!("Client {} edit exceeded the character limit", client_uid);
    }
    Ok(())
}

fn handle_set_language_mode(store: &WidgetStore, msg: &Value) -> anyhow::Result<()> {
    let mode: LanguageMode = required_str(msg, "mode")?.parse()?;
    store.set_language_mode(mode);
    Ok(())
}

fn handle_set_selected_language(store: &WidgetStore, msg: &Value) -> anyhow::Result<()> {
    let language: Language = required_str(msg, "language")?.parse()?;
    store.set_selected_language(language);
    Ok(())
}

/// Runs in the background so the session keeps accepting edits while the
/// request is in flight
fn handle_translate(store: WidgetStore, client_uid: &str) {
    let client_uid = client_uid.to_string();
    tokio::spawn(async move {
        match store.translate().await {
            Ok(outcome) => debug!("Translate for {} finished: {:?}", client_uid, outcome),
            Err(e) => debug!("Translate for {} failed: {}", client_uid, e),
        }
    });
}

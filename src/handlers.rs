use std::sync::Arc;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, warn};

use crate::session::TranslationSession;
use crate::state::AppState;

fn text_field<'a>(msg: &'a Value, key: &str) -> &'a str {
    msg.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Handle one client message received over the WebSocket.
pub async fn handle_message(
    state: &AppState,
    session: &Arc<TranslationSession>,
    text: &str,
    sender: &UnboundedSender<Value>,
) -> anyhow::Result<()> {
    let msg: Value = serde_json::from_str(text)?;
    let msg_type = msg.get("type").and_then(|v| v.as_str());

    match msg_type {
        Some("text-input") => {
            session.set_source_text(text_field(&msg, "text"));
        }
        Some("set-language") => {
            let language = text_field(&msg, "language");
            if language.is_empty() {
                warn!("set-language without a language");
            } else {
                session.set_language(language);
            }
        }
        Some("toggle-favorite") => {
            let favorite = session.toggle_favorite(&state.favorites)?;
            let _ = sender.send(json!({"type": "favorite", "favorite": favorite}));
        }
        Some("speak") => {
            handle_speak(state, &msg, sender);
        }
        Some("link-paste") => {
            handle_link_paste(state, session, &msg);
        }
        Some("audio-play-start") => {
            state.player.playback_started(&session.id());
        }
        Some("frontend-playback-complete") => {
            state.player.playback_ended(&session.id());
        }
        _ => {
            warn!("Unknown message type: {:?}", msg_type);
        }
    }

    Ok(())
}

fn handle_speak(state: &AppState, msg: &Value, sender: &UnboundedSender<Value>) {
    let text = text_field(msg, "text").to_string();
    let locale = msg.get("locale").and_then(|v| v.as_str()).map(str::to_string);
    let player = state.player.clone();
    let sender = sender.clone();

    tokio::spawn(async move {
        match player.play(&text, locale.as_deref()).await {
            Ok(playback) => {
                debug!("Synthesized {}", playback.audio_path);
                let _ = sender.send(prepare_audio_payload(&playback.audio_path, &text));
            }
            Err(e) => error!("Audio playback failed: {}", e),
        }
    });
}

fn handle_link_paste(state: &AppState, session: &Arc<TranslationSession>, msg: &Value) {
    let link = text_field(msg, "url").to_string();
    let state = state.clone();
    let session = session.clone();

    // Failures are logged by load_link and otherwise ignored.
    tokio::spawn(async move {
        let _ = state.load_link(&session, &link).await;
    });
}

/// Audio payload sent to the client once synthesis finished
pub fn prepare_audio_payload(audio_path: &str, display_text: &str) -> Value {
    json!({
        "type": "audio",
        "audio": audio_path,
        "display_text": {"text": display_text}
    })
}

use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::handlers;
use crate::session::SessionSnapshot;
use crate::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

pub fn state_message(snapshot: &SessionSnapshot) -> Value {
    let mut msg = json!(snapshot);
    msg["type"] = json!("translation-state");
    msg
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let session = state.create_session();
    let session_id = session.id();
    info!("New WebSocket connection: {}", session_id);

    let (mut sender, mut receiver) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Value>();

    let writer = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if let Err(e) = sender.send(Message::Text(msg.to_string())).await {
                error!("Failed to send message: {}", e);
                break;
            }
        }
    });

    // Push every state change of this session
    let state_forwarder = {
        let mut rx = session.subscribe();
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            let initial = state_message(&rx.borrow_and_update());
            if out_tx.send(initial).is_err() {
                return;
            }
            while rx.changed().await.is_ok() {
                let msg = state_message(&rx.borrow_and_update());
                if out_tx.send(msg).is_err() {
                    break;
                }
            }
        })
    };

    let character_forwarder = {
        let mut rx = state.player.subscribe_character();
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let character = *rx.borrow_and_update();
                if out_tx.send(json!({"type": "character", "state": character})).is_err() {
                    break;
                }
            }
        })
    };

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = handlers::handle_message(&state, &session, &text, &out_tx).await {
                    error!("Error handling message: {}", e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", session_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    // Cleanup
    state_forwarder.abort();
    character_forwarder.abort();
    drop(out_tx);
    writer.abort();
    state.remove_session(&session_id);

    info!("Cleaned up client {}", session_id);
}

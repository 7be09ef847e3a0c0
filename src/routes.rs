use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::{IngestError, SpeechError};
use crate::ingest::text_from_upload;
use crate::session::TranslationSession;
use crate::state::AppState;
use crate::websocket::websocket_handler;

type ApiError = (StatusCode, Json<Value>);

#[derive(Debug, Deserialize)]
struct SourcePayload {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LanguagePayload {
    language: String,
}

#[derive(Debug, Deserialize)]
struct LinkPayload {
    url: String,
}

#[derive(Debug, Deserialize)]
struct SpeakPayload {
    text: String,
    locale: Option<String>,
}

/// The full application: routes, static audio, CORS and request tracing.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // WebSocket
        .route("/client-ws", get(websocket_handler))

        // Health check
        .route("/api/health", get(health_check))

        .route("/api/languages", get(get_languages))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/sessions/:id/source", put(set_source))
        .route("/api/sessions/:id/language", put(set_language))
        .route("/api/sessions/:id/file", post(upload_file))
        .route("/api/sessions/:id/link", post(paste_link))
        .route("/api/sessions/:id/favorite", post(toggle_favorite))
        .route("/api/sessions/:id/playback/start", post(playback_start))
        .route("/api/sessions/:id/playback/end", post(playback_end))
        .route("/api/favorite", get(get_favorite))
        .route("/api/speak", post(speak))
        .route("/api/character", get(get_character))
        .route("/api/voices", get(get_voices))
        .route("/api/voices/refresh", post(refresh_voices))

        // Synthesized audio
        .nest_service("/cache", ServeDir::new(&state.config.system_config.cache_dir))
}

fn error_json(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({"error": message.into()})))
}

fn find_session(state: &AppState, id: &str) -> Result<std::sync::Arc<TranslationSession>, ApiError> {
    state
        .session(id)
        .ok_or_else(|| error_json(StatusCode::NOT_FOUND, format!("Unknown session: {}", id)))
}

fn snapshot_json(session: &TranslationSession) -> Json<Value> {
    Json(json!(session.snapshot()))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.len(),
        "voices_ready": state.player.catalog().is_ready()
    }))
}

async fn get_languages(State(state): State<AppState>) -> Json<Value> {
    let translation = &state.config.translation_config;
    Json(json!({
        "languages": translation.languages,
        "default": translation.default_language,
        "maxSourceChars": translation.max_source_chars
    }))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let session = state.create_session();
    (StatusCode::CREATED, snapshot_json(&session))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = find_session(&state, &id)?;
    Ok(snapshot_json(&session))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error_json(StatusCode::NOT_FOUND, format!("Unknown session: {}", id)))
    }
}

async fn set_source(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SourcePayload>,
) -> Result<Json<Value>, ApiError> {
    let session = find_session(&state, &id)?;
    session.set_source_text(payload.text);
    Ok(snapshot_json(&session))
}

async fn set_language(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<LanguagePayload>,
) -> Result<Json<Value>, ApiError> {
    let session = find_session(&state, &id)?;
    session.set_language(payload.language);
    Ok(snapshot_json(&session))
}

async fn upload_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let session = find_session(&state, &id)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error_json(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| error_json(StatusCode::BAD_REQUEST, e.to_string()))?;
            session.set_source_text(text_from_upload(&data));
            return Ok(snapshot_json(&session));
        }
    }

    Err(error_json(StatusCode::BAD_REQUEST, "No file provided"))
}

async fn paste_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<LinkPayload>,
) -> Result<Json<Value>, ApiError> {
    let session = find_session(&state, &id)?;
    match state.load_link(&session, &payload.url).await {
        Ok(()) => Ok(snapshot_json(&session)),
        Err(e @ IngestError::InvalidLink(_)) => Err(error_json(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e) => Err(error_json(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = find_session(&state, &id)?;
    let favorite = session.toggle_favorite(&state.favorites).map_err(|e| {
        error!("Failed to update favorite: {}", e);
        error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(json!({"favorite": favorite})))
}

async fn get_favorite(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let favorite = state
        .favorites
        .load()
        .map_err(|e| error_json(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(json!({"favoriteTranslation": favorite})))
}

async fn speak(
    State(state): State<AppState>,
    Json(payload): Json<SpeakPayload>,
) -> Result<Json<Value>, ApiError> {
    match state.player.play(&payload.text, payload.locale.as_deref()).await {
        Ok(playback) => Ok(Json(json!(playback))),
        Err(SpeechError::NoVoices) => Err(error_json(StatusCode::SERVICE_UNAVAILABLE, "No voices available")),
        Err(e) => {
            error!("Audio playback failed: {}", e);
            Err(error_json(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

async fn playback_start(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    find_session(&state, &id)?;
    state.player.playback_started(&id);
    Ok(Json(json!({"state": state.player.character()})))
}

async fn playback_end(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    find_session(&state, &id)?;
    state.player.playback_ended(&id);
    Ok(Json(json!({"state": state.player.character()})))
}

async fn get_character(State(state): State<AppState>) -> Json<Value> {
    Json(json!({"state": state.player.character()}))
}

async fn get_voices(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.player.catalog().voices()))
}

async fn refresh_voices(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state.player.refresh_voices().await.map_err(|e| {
        error!("Failed to load voices: {}", e);
        error_json(StatusCode::BAD_GATEWAY, e.to_string())
    })?;
    Ok(Json(json!({"voices": count})))
}

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use placemap_core::chat::ChatReply;
use placemap_core::import::ImportSummary;
use placemap_core::places::{Place, PlaceInput, PlacePatch};
use placemap_core::properties::PropertyRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/import/sheets", get(run_import).post(run_import))
        .route("/api/places", get(list_places).post(create_place))
        .route(
            "/api/places/{id}",
            get(get_place).put(update_place).delete(delete_place),
        )
        .route("/api/properties", get(list_properties))
        .route("/api/chat", post(chat))
        .route("/api/n8n-chat", post(session_chat))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: &'static str,
    pub results: ImportSummary,
}

pub async fn run_import(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ImportResponse>, ApiError> {
    let importer = state.importer.lock().await;
    let results = importer.run().await?;
    Ok(Json(ImportResponse {
        message: "Import completed",
        results,
    }))
}

pub async fn list_places(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Place>>, ApiError> {
    Ok(Json(state.places.list().await?))
}

pub async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Place>, ApiError> {
    Ok(Json(state.places.get(id).await?))
}

pub async fn create_place(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlaceInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    let Json(input) = payload?;
    let place = state.places.create(input.validate()?).await?;
    info!(id = %place.id, name = %place.name, "Created place");
    Ok((StatusCode::CREATED, Json(place)))
}

pub async fn update_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<PlacePatch>, JsonRejection>,
) -> Result<Json<Place>, ApiError> {
    let Json(patch) = payload?;
    let place = state.places.update(id, patch.validate()?).await?;
    Ok(Json(place))
}

pub async fn delete_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    state.places.delete(id).await?;
    info!(%id, "Deleted place");
    Ok(Json(json!({ "success": true })))
}

pub async fn list_properties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PropertyRecord>>, ApiError> {
    Ok(Json(state.properties.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload?;
    let message = request
        .message
        .filter(|message| !message.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Message is required"))?;

    Ok(Json(state.chat.send_message(&message).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
    pub action: Option<String>,
}

pub async fn session_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SessionChatRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let (Some(message), Some(session_id)) =
        (non_blank(request.message), non_blank(request.session_id))
    else {
        return Err(ApiError::bad_request("Message and sessionId are required"));
    };

    let data = state
        .chat
        .send_chat_input(&session_id, &message, request.action.as_deref())
        .await?;
    Ok(Json(data))
}

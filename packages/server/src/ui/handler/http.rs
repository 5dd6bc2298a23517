//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::values::{PlayerKey, PlayerName, RoomId},
    infrastructure::dto::{ExpelRequestDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the list of live rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let summaries = state.coordinator.room_summaries().await;
    Json(summaries.iter().map(RoomSummaryDto::from).collect())
}

/// Get a single room's summary by id
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    match state.coordinator.room_summary(&room_id).await {
        Some(summary) => Ok(Json(RoomSummaryDto::from(&summary))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Remove a participant from a room on behalf of its host, announce the
/// removal to lobby subscribers, and drop any session held under the name.
pub async fn expel_participant(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(request): Json<ExpelRequestDto>,
) -> Result<StatusCode, StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let requester = PlayerKey::new(request.requester_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let target = PlayerName::new(request.target_name).map_err(|_| StatusCode::BAD_REQUEST)?;

    state
        .coordinator
        .expel(&room_id, &requester, &target)
        .await
        .map_err(|error| {
            tracing::warn!(room_id = %room_id, target = %target, error = %error, "expulsion rejected");
            match error {
                crate::usecase::error::GameError::RoomNotFound(_) => StatusCode::NOT_FOUND,
                crate::usecase::error::GameError::Domain(_) => StatusCode::FORBIDDEN,
            }
        })?;

    if request.ban {
        state.lobby.participant_banned(&room_id, &target).await;
    } else {
        state.lobby.participant_expelled(&room_id, &target).await;
    }
    state.sessions.remove_by_name(target.as_str()).await;
    Ok(StatusCode::NO_CONTENT)
}

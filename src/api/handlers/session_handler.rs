use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::session_dto::*},
    error::AppError,
    models::session::SessionState,
};

/// 推进一轮治疗对话
pub async fn session_message(
    State(state): State<AppState>,
    Json(request): Json<SessionMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id must not be empty".into()));
    }
    debug!(user_id = %request.user_id, session_id = ?request.session_id, "Session message");

    let reply = state
        .session_service
        .handle_message(
            &request.user_id,
            request.session_id.as_deref(),
            &request.message,
        )
        .await?;

    if reply.state == Some(SessionState::Opened) {
        state.metrics.record_session_opened();
    }
    if reply.closed {
        state.metrics.record_session_closed();
    }

    Ok(Json(reply))
}

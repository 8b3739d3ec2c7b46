use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::oracle_dto::*},
    error::AppError,
};

pub async fn oracle_chat(
    State(state): State<AppState>,
    Json(request): Json<OracleChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let oracle = state
        .oracle
        .as_ref()
        .ok_or_else(|| AppError::NotFound("oracle chat is not enabled".into()))?;
    state.metrics.record_oracle_call();
    debug!(history = request.history.len(), "Oracle chat");

    let reply: OracleChatResponse = oracle.chat(&request.question, request.history).await?;
    Ok(Json(reply))
}

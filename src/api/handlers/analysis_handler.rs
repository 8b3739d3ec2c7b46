use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::analysis_dto::*},
    error::AppError,
    services::diagnosis::ConfirmedHit,
};

pub async fn gematria(
    State(state): State<AppState>,
    Json(request): Json<GematriaRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.metrics.record_gematria();

    let result = state.gematria.compute(&request.text);
    debug!(total = result.total_value, skipped = result.skipped, "Gematria computed");
    Ok(Json(result))
}

pub async fn diagnose(
    State(state): State<AppState>,
    Json(request): Json<DiagnoseRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.metrics.record_diagnosis();

    let letters = state.diagnosis.diagnose(&request.complaint);
    debug!(?letters, "Complaint diagnosed");
    Ok(Json(DiagnoseResponse { letters }))
}

pub async fn confirm_hit(
    State(state): State<AppState>,
    Json(request): Json<ConfirmHitRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(letters = ?request.letters, "Confirming diagnosis");

    let status = state
        .diagnosis
        .confirm_hit(ConfirmedHit {
            complaint: request.complaint,
            letters: request.letters,
            diagnosis: request.diagnosis,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConfirmHitResponse {
            status: status.to_string(),
        }),
    ))
}

pub async fn tarot_spread(
    State(state): State<AppState>,
    Json(request): Json<TarotSpreadRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.cards.is_empty() {
        return Err(AppError::Validation("cards must not be empty".into()));
    }
    debug!(cards = request.cards.len(), "Interpreting tarot spread");

    Ok(Json(state.tarot.interpret_spread(&request.cards)?))
}

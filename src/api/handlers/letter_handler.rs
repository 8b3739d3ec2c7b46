use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::letter_dto::*},
    error::AppError,
    services::letters::Persona,
};

pub async fn welcome(State(state): State<AppState>) -> impl IntoResponse {
    Json(WelcomeResponse {
        message: "Bem-vindo ao Oráculo SCII. As águas primordiais aguardam sua pergunta.".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        letters: state.symbols.len(),
    })
}

pub async fn get_letter(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<LetterQuery>,
) -> Result<impl IntoResponse, AppError> {
    let persona: Persona = params.persona.as_deref().unwrap_or_default().parse()?;
    debug!(letter = %name, ?persona, "Describing letter");

    let view = state.letters.describe(&name, persona)?;
    Ok(Json(view))
}

pub async fn get_body_zone(
    State(state): State<AppState>,
    Path(zone): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!(zone = %zone, "Looking up body zone");
    let letter = state.letters.by_body_zone(&zone)?;
    Ok(Json(letter))
}

pub async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".into()));
    }
    debug!(chars = request.text.chars().count(), "Analyzing text");

    Ok(Json(state.letters.analyze(&request.text)))
}

pub async fn meditation(
    State(state): State<AppState>,
    Json(request): Json<MeditationRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(letter = %request.letter, "Generating meditation");
    Ok(Json(state.letters.meditation(&request.letter)?))
}

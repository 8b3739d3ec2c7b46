use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::chart_dto::*},
    error::AppError,
};

/// 计算灵魂地图
pub async fn calculate_chart(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!(name = %request.name, "Calculating soul map");
    let map: ChartResponse = state.gnosis.soul_map(&request).await?;
    Ok(Json(map))
}

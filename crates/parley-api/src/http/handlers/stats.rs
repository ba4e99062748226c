//! Statistics endpoint.
//!
//! GET /api/v1/stats - The per-date saved/deleted session counters.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use parley_types::api::StatisticsResponse;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/stats - Every daily counter in first-appearance order.
pub async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatisticsResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let stats = state.session_service.stats().get_all().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(StatisticsResponse { stats }, request_id, elapsed)
        .with_link("self", "/api/v1/stats");

    Ok(Json(resp))
}

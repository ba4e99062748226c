//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/sessions       - List every stored session
//! - GET    /api/v1/sessions/{id}  - Get a single session
//! - POST   /api/v1/sessions       - Create a session or replace its messages
//! - DELETE /api/v1/sessions/{id}  - Delete a session (`?date=YYYY-MM-DD`)

use std::time::Instant;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use parley_types::api::{
    DeleteConfirmation, DeleteSessionRequest, GetSessionRequest, SaveSessionRequest,
    SessionResponse,
};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for session deletion.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/sessions - List every stored session.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SessionResponse>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state.session_service.list().await?;
    let data: Vec<SessionResponse> = sessions.into_iter().map(SessionResponse::from).collect();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(data, request_id, elapsed).with_link("self", "/api/v1/sessions");

    Ok(Json(resp))
}

/// GET /api/v1/sessions/{id} - Get a session by id.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let req = GetSessionRequest {
        session_id: Some(session_id),
    };
    let id = req.validate()?;
    let session = state.session_service.get(id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let self_link = format!("/api/v1/sessions/{}", session.id);
    let resp = ApiResponse::success(SessionResponse::from(session), request_id, elapsed)
        .with_link("self", &self_link)
        .with_link("sessions", "/api/v1/sessions");

    Ok(Json(resp))
}

/// POST /api/v1/sessions - Create a session (no `sessionId`) or replace the
/// messages of an existing one.
pub async fn save_session(
    State(state): State<AppState>,
    body: Result<Json<SaveSessionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let Json(req) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let save = req.validate(Utc::now().date_naive())?;
    let session = state.session_service.save(save).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let self_link = format!("/api/v1/sessions/{}", session.id);
    let resp = ApiResponse::success(SessionResponse::from(session), request_id, elapsed)
        .with_link("self", &self_link);

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/{id} - Delete a session and count the deletion.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DeleteConfirmation>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let req = DeleteSessionRequest {
        session_id: Some(session_id),
        date: query.date,
    };
    let (id, date) = req.validate(Utc::now().date_naive())?;
    let confirmation = state.session_service.delete(id, date).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(confirmation, request_id, elapsed)
        .with_link("sessions", "/api/v1/sessions")
        .with_link("stats", "/api/v1/stats");

    Ok(Json(resp))
}

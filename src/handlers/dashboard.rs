// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{common::error::AppError, config::AppState, models::dashboard::ResumoDashboard};

pub async fn resumo(State(app_state): State<AppState>) -> Result<Json<ResumoDashboard>, AppError> {
    Ok(Json(app_state.dashboard_service.resumo().await?))
}

// src/handlers/empresas.rs
//
// CRUD de empresas (painel da plataforma).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminAtual,
    models::empresa::{AlterarStatusPayload, AtualizarEmpresaPayload, Empresa, RemoverEmpresaQuery},
};

pub async fn listar(State(app_state): State<AppState>) -> Result<Json<Vec<Empresa>>, AppError> {
    Ok(Json(app_state.empresa_service.listar().await?))
}

pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Empresa>, AppError> {
    Ok(Json(app_state.empresa_service.buscar(id).await?))
}

pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarEmpresaPayload>,
) -> Result<Json<Empresa>, AppError> {
    Ok(Json(app_state.empresa_service.atualizar(id, payload).await?))
}

pub async fn alterar_status(
    State(app_state): State<AppState>,
    AdminAtual(admin): AdminAtual,
    Path(id): Path<Uuid>,
    Json(payload): Json<AlterarStatusPayload>,
) -> Result<Json<Empresa>, AppError> {
    let empresa = app_state.empresa_service.alterar_status(id, payload.status).await?;
    tracing::info!("Status da empresa {} alterado por {}", empresa.subdominio, admin.email);
    Ok(Json(empresa))
}

// Exclusão definitiva: `?confirmacao=<subdominio>`
pub async fn remover(
    State(app_state): State<AppState>,
    AdminAtual(admin): AdminAtual,
    Path(id): Path<Uuid>,
    Query(query): Query<RemoverEmpresaQuery>,
) -> Result<StatusCode, AppError> {
    app_state.empresa_service.remover(id, &query.confirmacao).await?;
    tracing::warn!("Empresa {} excluída por {}", id, admin.email);
    Ok(StatusCode::NO_CONTENT)
}

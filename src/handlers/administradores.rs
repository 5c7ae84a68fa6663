// src/handlers/administradores.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminAtual,
    models::administrador::{
        Administrador, AdministradorCriado, AtualizarAdministradorPayload, NovoAdministradorPayload,
    },
};

pub async fn listar(State(app_state): State<AppState>) -> Result<Json<Vec<Administrador>>, AppError> {
    Ok(Json(app_state.administrador_service.listar().await?))
}

pub async fn criar(
    State(app_state): State<AppState>,
    AdminAtual(ator): AdminAtual,
    Json(payload): Json<NovoAdministradorPayload>,
) -> Result<(StatusCode, Json<AdministradorCriado>), AppError> {
    let criado = app_state.administrador_service.criar(&ator, payload).await?;
    Ok((StatusCode::CREATED, Json(criado)))
}

pub async fn atualizar(
    State(app_state): State<AppState>,
    AdminAtual(ator): AdminAtual,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarAdministradorPayload>,
) -> Result<Json<Administrador>, AppError> {
    Ok(Json(app_state.administrador_service.atualizar(&ator, id, payload).await?))
}

pub async fn remover(
    State(app_state): State<AppState>,
    AdminAtual(ator): AdminAtual,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.administrador_service.remover(&ator, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

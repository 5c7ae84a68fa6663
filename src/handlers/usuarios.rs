// src/handlers/usuarios.rs
//
// Usuários da empresa. A empresa vem do `EmpresaContext`; as permissões,
// do papel do usuário logado.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AtorAtual,
        rbac::{PermLeitura, PermUsuariosGerenciar, RequirePermission},
        tenancy::EmpresaContext,
    },
    models::usuario::{AtualizarUsuarioPayload, NovoUsuarioPayload, Usuario, UsuarioCriado},
};

pub async fn listar(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermLeitura>,
) -> Result<Json<Vec<Usuario>>, AppError> {
    Ok(Json(app_state.usuario_service.listar(empresa_id).await?))
}

pub async fn buscar(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermLeitura>,
    Path(id): Path<Uuid>,
) -> Result<Json<Usuario>, AppError> {
    Ok(Json(app_state.usuario_service.buscar(empresa_id, id).await?))
}

pub async fn criar(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AtorAtual(ator): AtorAtual,
    Json(payload): Json<NovoUsuarioPayload>,
) -> Result<(StatusCode, Json<UsuarioCriado>), AppError> {
    let criado = app_state.usuario_service.criar(empresa_id, &ator, payload).await?;
    Ok((StatusCode::CREATED, Json(criado)))
}

pub async fn atualizar(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AtorAtual(ator): AtorAtual,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarUsuarioPayload>,
) -> Result<Json<Usuario>, AppError> {
    Ok(Json(app_state.usuario_service.atualizar(empresa_id, &ator, id, payload).await?))
}

pub async fn remover(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermUsuariosGerenciar>,
    AtorAtual(ator): AtorAtual,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.usuario_service.remover(empresa_id, &ator, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// src/handlers/agenda.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{agenda::hoje, error::AppError},
    config::AppState,
    middleware::{
        rbac::{PermAgendaEditar, PermLeitura, RequirePermission},
        tenancy::EmpresaContext,
    },
    models::agenda::{
        AgendaQuery, Agendamento, AtualizarServicoPayload, AtualizarStatusAgendamentoPayload,
        HorariosDisponiveis, HorariosQuery, NovoAgendamentoPayload, NovoServicoPayload, Servico,
    },
};

// ---
// Serviços
// ---

pub async fn listar_servicos(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermLeitura>,
) -> Result<Json<Vec<Servico>>, AppError> {
    Ok(Json(app_state.agenda_service.listar_servicos(empresa_id).await?))
}

pub async fn criar_servico(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermAgendaEditar>,
    Json(payload): Json<NovoServicoPayload>,
) -> Result<(StatusCode, Json<Servico>), AppError> {
    let servico = app_state.agenda_service.criar_servico(empresa_id, payload).await?;
    Ok((StatusCode::CREATED, Json(servico)))
}

pub async fn atualizar_servico(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermAgendaEditar>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarServicoPayload>,
) -> Result<Json<Servico>, AppError> {
    Ok(Json(app_state.agenda_service.atualizar_servico(empresa_id, id, payload).await?))
}

pub async fn remover_servico(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermAgendaEditar>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.agenda_service.remover_servico(empresa_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Agendamentos
// ---

pub async fn listar_agendamentos(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermLeitura>,
    Query(filtro): Query<AgendaQuery>,
) -> Result<Json<Vec<Agendamento>>, AppError> {
    let agendamentos = app_state
        .agenda_service
        .listar_agendamentos(empresa_id, filtro, hoje())
        .await?;
    Ok(Json(agendamentos))
}

pub async fn buscar_agendamento(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermLeitura>,
    Path(id): Path<Uuid>,
) -> Result<Json<Agendamento>, AppError> {
    Ok(Json(app_state.agenda_service.buscar_agendamento(empresa_id, id).await?))
}

pub async fn criar_agendamento(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermAgendaEditar>,
    Json(payload): Json<NovoAgendamentoPayload>,
) -> Result<(StatusCode, Json<Agendamento>), AppError> {
    let agendamento = app_state
        .agenda_service
        .criar_agendamento(empresa_id, payload, hoje())
        .await?;
    Ok((StatusCode::CREATED, Json(agendamento)))
}

pub async fn alterar_status(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermAgendaEditar>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarStatusAgendamentoPayload>,
) -> Result<Json<Agendamento>, AppError> {
    let agendamento = app_state
        .agenda_service
        .alterar_status(empresa_id, id, payload.status)
        .await?;
    Ok(Json(agendamento))
}

pub async fn remover_agendamento(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermAgendaEditar>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.agenda_service.remover_agendamento(empresa_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn horarios(
    State(app_state): State<AppState>,
    EmpresaContext(empresa_id): EmpresaContext,
    _perm: RequirePermission<PermLeitura>,
    Query(query): Query<HorariosQuery>,
) -> Result<Json<HorariosDisponiveis>, AppError> {
    let livres = app_state
        .agenda_service
        .horarios_disponiveis(empresa_id, query.data, hoje())
        .await?;
    Ok(Json(livres))
}

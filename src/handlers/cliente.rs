// src/handlers/cliente.rs
//
// Portal do cliente (tenant), atrás do `company_guard`.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::{
    common::{agenda::hoje, error::AppError},
    config::AppState,
    middleware::auth::CurrentCompanySession,
    models::{
        agenda::{AgendaQuery, Agendamento},
        auth::PrimeiroAcessoPayload,
        empresa::Empresa,
        usuario::Usuario,
    },
    services::empresa_service::url_tenant,
};

#[derive(Debug, Serialize)]
pub struct PerfilCliente {
    pub usuario: Usuario,
    pub empresa: Empresa,
    pub url_portal: String,
    pub primeiro_acesso_pendente: bool,
}

fn usuario_e_empresa(sessao: CurrentCompanySession) -> Result<(Usuario, Empresa), AppError> {
    let CurrentCompanySession(sessao) = sessao;
    match (sessao.usuario, sessao.empresa) {
        (Some(usuario), Some(empresa)) => Ok((usuario, empresa)),
        _ => Err(AppError::InvalidToken),
    }
}

pub async fn perfil(
    State(app_state): State<AppState>,
    sessao: CurrentCompanySession,
) -> Result<Json<PerfilCliente>, AppError> {
    let (usuario, empresa) = usuario_e_empresa(sessao)?;

    Ok(Json(PerfilCliente {
        url_portal: url_tenant(&empresa.subdominio, &app_state.dominio_base, "cliente"),
        primeiro_acesso_pendente: !usuario.primeiro_acesso_concluido,
        usuario,
        empresa,
    }))
}

pub async fn agenda(
    State(app_state): State<AppState>,
    sessao: CurrentCompanySession,
    Query(filtro): Query<AgendaQuery>,
) -> Result<Json<Vec<Agendamento>>, AppError> {
    let (_, empresa) = usuario_e_empresa(sessao)?;
    let agendamentos = app_state
        .agenda_service
        .listar_agendamentos(empresa.id, filtro, hoje())
        .await?;
    Ok(Json(agendamentos))
}

pub async fn primeiro_acesso(
    State(app_state): State<AppState>,
    sessao: CurrentCompanySession,
    Json(payload): Json<PrimeiroAcessoPayload>,
) -> Result<Json<Usuario>, AppError> {
    payload.validate()?;
    let (usuario, _) = usuario_e_empresa(sessao)?;

    let usuario = app_state
        .usuario_service
        .concluir_primeiro_acesso(usuario.id, &payload.nova_senha)
        .await?;
    Ok(Json(usuario))
}

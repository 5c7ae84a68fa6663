// src/handlers/auth.rs

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::{
    common::{error::AppError, texto::Normalizar},
    config::AppState,
    middleware::{
        auth::BearerToken,
        guard::Decision,
        session::bearer_token,
    },
    models::{
        administrador::Administrador,
        auth::{AuthResponse, Identity, LoginUserPayload},
        empresa::Empresa,
        usuario::Usuario,
    },
};

// O que o painel precisa saber sobre quem está logado
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub identity: Identity,
    pub is_super_admin: bool,
    pub is_company_user: bool,
    pub usuario: Option<Usuario>,
    pub administrador: Option<Administrador>,
    pub empresa: Option<Empresa>,
}

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let payload = payload.normalizado();
    payload.validate()?;

    let resposta = app_state.identity.sign_in(&payload.email, &payload.password).await?;

    Ok(Json(resposta))
}

pub async fn logout(
    State(app_state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, AppError> {
    app_state.sessoes.contexto().logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Handler da rota /me
pub async fn me(State(app_state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::InvalidToken)?;
    let session = app_state.sessoes.resolve(Some(&token)).await;

    if session.is_loading {
        return Ok(Decision::Loading.into_response());
    }
    let identity = session.identity.ok_or(AppError::InvalidToken)?;

    Ok(Json(MeResponse {
        identity,
        is_super_admin: session.is_super_admin,
        is_company_user: session.is_company_user,
        usuario: session.usuario,
        administrador: session.administrador,
        empresa: session.empresa,
    })
    .into_response())
}

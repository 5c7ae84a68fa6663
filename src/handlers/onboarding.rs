// src/handlers/onboarding.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::empresa::{
        DisponibilidadeResponse, OnboardingPayload, OnboardingResponse, VerificarEmailQuery,
        VerificarSubdominioQuery,
    },
    services::empresa_service::validar_subdominio,
};

pub async fn cadastrar(
    State(app_state): State<AppState>,
    Json(payload): Json<OnboardingPayload>,
) -> Result<(StatusCode, Json<OnboardingResponse>), AppError> {
    let resposta = app_state.onboarding_service.cadastrar(payload).await?;
    Ok((StatusCode::CREATED, Json(resposta)))
}

// O e-mail precisa estar livre tanto em empresas quanto em usuários
pub async fn verificar_email(
    State(app_state): State<AppState>,
    Query(query): Query<VerificarEmailQuery>,
) -> Json<DisponibilidadeResponse> {
    let disponivel = app_state.empresa_service.verificar_email_unico(&query.email).await
        && app_state.usuario_service.verificar_email_unico(&query.email).await;

    Json(DisponibilidadeResponse { disponivel })
}

pub async fn verificar_subdominio(
    State(app_state): State<AppState>,
    Query(query): Query<VerificarSubdominioQuery>,
) -> Result<Json<DisponibilidadeResponse>, AppError> {
    let subdominio = validar_subdominio(&query.subdominio)?;
    let disponivel = app_state.empresa_service.verificar_subdominio_unico(&subdominio).await;

    Ok(Json(DisponibilidadeResponse { disponivel }))
}

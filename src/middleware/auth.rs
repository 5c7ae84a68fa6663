// src/middleware/auth.rs
//
// Extratores para os handlers. A sessão já foi resolvida pelo guarda da
// rota e está nas extensions da requisição.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::session::{bearer_token, CompanySession, Session},
    models::{administrador::Administrador, usuario::AtorEmpresa},
};

// Extrator para obter a sessão autenticada diretamente nos handlers
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .filter(|s| s.is_authenticated)
            .cloned()
            .map(CurrentSession)
            .ok_or(AppError::InvalidToken)
    }
}

pub struct CurrentCompanySession(pub CompanySession);

impl<S> FromRequestParts<S> for CurrentCompanySession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CompanySession>()
            .filter(|s| s.is_authenticated)
            .cloned()
            .map(CurrentCompanySession)
            .ok_or(AppError::InvalidToken)
    }
}

/// O administrador da plataforma que fez a requisição.
pub struct AdminAtual(pub Administrador);

impl<S> FromRequestParts<S> for AdminAtual
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        session
            .administrador
            .map(AdminAtual)
            .ok_or_else(|| AppError::AcessoNegado("Área restrita a administradores da plataforma.".into()))
    }
}

/// Quem está gerenciando usuários: super admin ou o usuário da empresa.
pub struct AtorAtual(pub AtorEmpresa);

impl<S> FromRequestParts<S> for AtorAtual
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        if session.is_super_admin {
            return Ok(AtorAtual(AtorEmpresa::SuperAdmin));
        }
        let is_company_user = session.is_company_user;
        session
            .usuario
            .filter(|_| is_company_user)
            .map(|u| AtorAtual(AtorEmpresa::Usuario { id: u.id, role_empresa: u.role_empresa }))
            .ok_or_else(|| AppError::AcessoNegado("Acesso restrito aos usuários da empresa.".into()))
    }
}

// Token cru, para o logout
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_token(&parts.headers)
            .map(BearerToken)
            .ok_or(AppError::InvalidToken)
    }
}

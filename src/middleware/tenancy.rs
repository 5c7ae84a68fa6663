// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{common::error::AppError, middleware::auth::CurrentSession};

// O nome do nosso cabeçalho HTTP customizado
pub const EMPRESA_ID_HEADER: &str = "x-empresa-id";

/// A empresa (tenant) em que a requisição opera.
///
/// Usuário de empresa sempre opera na própria empresa. Super admin escolhe
/// a empresa pelo cabeçalho `X-Empresa-Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmpresaContext(pub Uuid);

fn empresa_do_cabecalho(parts: &Parts) -> Result<Option<Uuid>, AppError> {
    let Some(valor) = parts.headers.get(EMPRESA_ID_HEADER) else {
        return Ok(None);
    };

    let valor = valor
        .to_str()
        .map_err(|_| AppError::Validacao("Cabeçalho X-Empresa-Id contém caracteres inválidos.".into()))?;

    Uuid::parse_str(valor.trim())
        .map(Some)
        .map_err(|_| AppError::Validacao("Cabeçalho X-Empresa-Id inválido (não é um UUID).".into()))
}

impl<S> FromRequestParts<S> for EmpresaContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        let cabecalho = empresa_do_cabecalho(parts)?;

        if session.is_company_user {
            if let Some(usuario) = &session.usuario {
                if cabecalho.is_some_and(|id| id != usuario.empresa_id) && !session.is_super_admin {
                    return Err(AppError::AcessoNegado("Você não tem acesso a esta empresa.".into()));
                }
                return Ok(EmpresaContext(cabecalho.unwrap_or(usuario.empresa_id)));
            }
        }

        if session.is_super_admin {
            return cabecalho.map(EmpresaContext).ok_or_else(|| {
                AppError::Validacao("O cabeçalho X-Empresa-Id é obrigatório.".into())
            });
        }

        Err(AppError::AcessoNegado("Você não tem acesso a esta empresa.".into()))
    }
}

// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::CurrentSession,
    models::usuario::RoleEmpresa,
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;

    /// Se o papel do usuário na empresa concede a permissão.
    fn permite(role: RoleEmpresa) -> bool;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;

        // Super admin passa em todas as verificações
        if session.is_super_admin {
            return Ok(RequirePermission(PhantomData));
        }

        let role = session
            .usuario
            .as_ref()
            .filter(|_| session.is_company_user)
            .map(|u| u.role_empresa)
            .ok_or_else(|| AppError::AcessoNegado("Você não pertence a nenhuma empresa ativa.".into()))?;

        if !T::permite(role) {
            return Err(AppError::AcessoNegado(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                T::slug()
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermUsuariosGerenciar;
impl PermissionDef for PermUsuariosGerenciar {
    fn slug() -> &'static str { "usuarios:gerenciar" }
    fn permite(role: RoleEmpresa) -> bool { role.pode_gerenciar_usuarios() }
}

pub struct PermAgendaEditar;
impl PermissionDef for PermAgendaEditar {
    fn slug() -> &'static str { "agenda:editar" }
    fn permite(role: RoleEmpresa) -> bool { role.pode_editar_agenda() }
}

// Leitura dos dados da empresa: qualquer papel
pub struct PermLeitura;
impl PermissionDef for PermLeitura {
    fn slug() -> &'static str { "empresa:ler" }
    fn permite(_role: RoleEmpresa) -> bool { true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{middleware::session::Session, models::usuario::Usuario};
    use axum::http::Request;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(role: RoleEmpresa) -> Session {
        Session {
            is_authenticated: true,
            is_company_user: true,
            usuario: Some(Usuario {
                id: Uuid::new_v4(),
                nome: "Ana".into(),
                email: "ana@brilho.com".into(),
                empresa_id: Uuid::new_v4(),
                role_empresa: role,
                ativo: true,
                primeiro_acesso_concluido: true,
                telefone: None,
                telegram_chat_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }),
            ..Default::default()
        }
    }

    async fn checar<T: PermissionDef>(session: Session) -> bool {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(session);
        RequirePermission::<T>::from_request_parts(&mut parts, &()).await.is_ok()
    }

    #[tokio::test]
    async fn test_gerenciar_usuarios() {
        assert!(checar::<PermUsuariosGerenciar>(session(RoleEmpresa::AdminEmpresa)).await);
        assert!(checar::<PermUsuariosGerenciar>(session(RoleEmpresa::Gerente)).await);
        assert!(!checar::<PermUsuariosGerenciar>(session(RoleEmpresa::Funcionario)).await);
        assert!(!checar::<PermUsuariosGerenciar>(session(RoleEmpresa::Visualizador)).await);
    }

    #[tokio::test]
    async fn test_agenda() {
        assert!(checar::<PermAgendaEditar>(session(RoleEmpresa::Atendente)).await);
        assert!(!checar::<PermAgendaEditar>(session(RoleEmpresa::Visualizador)).await);
        assert!(checar::<PermLeitura>(session(RoleEmpresa::Visualizador)).await);
    }

    #[tokio::test]
    async fn test_super_admin_passa_em_tudo() {
        let admin = Session {
            is_authenticated: true,
            is_super_admin: true,
            ..Default::default()
        };
        assert!(checar::<PermUsuariosGerenciar>(admin.clone()).await);
        assert!(checar::<PermAgendaEditar>(admin).await);
    }

    #[tokio::test]
    async fn test_sem_empresa_nao_passa() {
        let session = Session {
            is_authenticated: true,
            ..Default::default()
        };
        assert!(!checar::<PermLeitura>(session).await);
    }
}

// src/middleware/session.rs
//
// O contexto de sessão: quem é a identidade autenticada e quais papéis ela
// tem na plataforma. Cada requisição monta o seu próprio contexto.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tokio::sync::watch;

use crate::{
    common::error::AppError,
    db::{AdministradorStore, EmpresaStore, UsuarioStore},
    models::{
        administrador::Administrador,
        auth::{AuthEvent, Identity},
        empresa::{Empresa, StatusEmpresa},
        usuario::Usuario,
    },
    services::identity::IdentityProvider,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub identity: Option<Identity>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub is_super_admin: bool,
    pub is_company_user: bool,
    pub usuario: Option<Usuario>,
    pub administrador: Option<Administrador>,
    pub empresa: Option<Empresa>,
}

impl Session {
    /// Estado inicial: ainda não sabemos quem é.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }

    pub fn anonima() -> Self {
        Self::default()
    }
}

/// Sessão do portal do cliente (tenant). Só autentica usuários ativos de
/// empresas ativas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanySession {
    pub usuario: Option<Usuario>,
    pub empresa: Option<Empresa>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl From<&Session> for CompanySession {
    fn from(session: &Session) -> Self {
        if session.is_loading {
            return Self {
                is_loading: true,
                ..Default::default()
            };
        }
        if !session.is_company_user {
            return Self::default();
        }
        Self {
            usuario: session.usuario.clone(),
            empresa: session.empresa.clone(),
            is_authenticated: true,
            is_loading: false,
        }
    }
}

// "Não encontrado" é ausência de papel; outros erros impedem decidir
fn opcional<T>(resultado: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match resultado {
        Ok(valor) => Ok(Some(valor)),
        Err(AppError::RegistroNaoEncontrado) => Ok(None),
        Err(e) => Err(e),
    }
}

pub struct SessionContext {
    identity: Arc<dyn IdentityProvider>,
    usuarios: Arc<dyn UsuarioStore>,
    administradores: Arc<dyn AdministradorStore>,
    empresas: Arc<dyn EmpresaStore>,
    estado: watch::Sender<Session>,
}

impl SessionContext {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        usuarios: Arc<dyn UsuarioStore>,
        administradores: Arc<dyn AdministradorStore>,
        empresas: Arc<dyn EmpresaStore>,
    ) -> Self {
        let (estado, _) = watch::channel(Session::loading());
        Self { identity, usuarios, administradores, empresas, estado }
    }

    async fn derivar(&self, identity: Identity) -> Result<Session, AppError> {
        let administrador = opcional(self.administradores.buscar_por_id(identity.id).await)?
            .filter(|a| a.ativo);
        let usuario = opcional(self.usuarios.buscar_por_id(identity.id).await)?.filter(|u| u.ativo);

        let empresa = match &usuario {
            Some(u) => opcional(self.empresas.buscar_por_id(u.empresa_id).await)?,
            None => None,
        };
        let is_company_user =
            usuario.is_some() && empresa.as_ref().is_some_and(|e| e.status == StatusEmpresa::Ativo);

        Ok(Session {
            identity: Some(identity),
            is_authenticated: true,
            is_loading: false,
            is_super_admin: administrador.is_some(),
            is_company_user,
            usuario,
            administrador,
            empresa,
        })
    }

    /// Recalcula todos os flags a partir do evento.
    pub async fn handle_event(&self, event: AuthEvent) {
        let identity = match event {
            AuthEvent::SignedIn(identity)
            | AuthEvent::UserUpdated(identity)
            | AuthEvent::InitialSession(Some(identity)) => identity,
            AuthEvent::SignedOut | AuthEvent::InitialSession(None) => {
                self.estado.send_replace(Session::anonima());
                return;
            }
        };

        let email = identity.email.clone();
        match self.derivar(identity).await {
            Ok(session) => {
                self.estado.send_replace(session);
            }
            Err(e) => {
                // Sem os papéis não há decisão confiável: volta a "carregando"
                tracing::error!("🔥 Falha ao resolver a sessão de {}: {:?}", email, e);
                self.estado.send_replace(Session::loading());
            }
        }
    }

    /// Encerra a sessão no provedor e limpa o estado local.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let resultado = self.identity.sign_out(token).await;
        self.estado.send_replace(Session::anonima());
        resultado
    }

    pub fn snapshot(&self) -> Session {
        self.estado.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.estado.subscribe()
    }
}

/// Monta uma [`SessionContext`] por requisição a partir do token.
#[derive(Clone)]
pub struct SessionResolver {
    identity: Arc<dyn IdentityProvider>,
    usuarios: Arc<dyn UsuarioStore>,
    administradores: Arc<dyn AdministradorStore>,
    empresas: Arc<dyn EmpresaStore>,
}

impl SessionResolver {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        usuarios: Arc<dyn UsuarioStore>,
        administradores: Arc<dyn AdministradorStore>,
        empresas: Arc<dyn EmpresaStore>,
    ) -> Self {
        Self { identity, usuarios, administradores, empresas }
    }

    pub fn contexto(&self) -> SessionContext {
        SessionContext::new(
            self.identity.clone(),
            self.usuarios.clone(),
            self.administradores.clone(),
            self.empresas.clone(),
        )
    }

    pub async fn resolve(&self, token: Option<&str>) -> Session {
        let contexto = self.contexto();

        let identity = match token {
            Some(token) => match self.identity.get_identity(token).await {
                Ok(identity) => Some(identity),
                Err(AppError::InvalidToken) => None,
                Err(e) => {
                    tracing::error!("🔥 Provedor de identidade indisponível: {:?}", e);
                    return Session::loading();
                }
            },
            None => None,
        };

        contexto.handle_event(AuthEvent::InitialSession(identity)).await;
        contexto.snapshot()
    }

    pub async fn resolve_company(&self, token: Option<&str>) -> CompanySession {
        CompanySession::from(&self.resolve(token).await)
    }
}

/// Token do cabeçalho `Authorization: Bearer ...`.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

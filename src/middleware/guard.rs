// src/middleware/guard.rs
//
// O "guarda" das rotas: uma tabela de decisão pura sobre a sessão e os
// requisitos da rota, e os middlewares que aplicam essa decisão.

use axum::{
    extract::{OriginalUri, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;

use crate::middleware::session::{bearer_token, CompanySession, Session, SessionResolver};

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const CLIENTE_LOGIN_PATH: &str = "/cliente/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirements {
    pub require_auth: bool,
    pub require_super_admin: bool,
    pub require_company_access: bool,
}

impl Default for RouteRequirements {
    fn default() -> Self {
        Self {
            require_auth: true,
            require_super_admin: false,
            require_company_access: false,
        }
    }
}

impl RouteRequirements {
    pub fn super_admin() -> Self {
        Self {
            require_super_admin: true,
            ..Default::default()
        }
    }

    pub fn company_access() -> Self {
        Self {
            require_company_access: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Loading,
    RedirectLogin { to: String, from: String },
    RedirectUnauthorized,
    Allow,
}

/// Carregando sempre vence; super admin passa por cima do acesso de empresa.
pub fn decide(requirements: &RouteRequirements, session: &Session, location: &str) -> Decision {
    if session.is_loading {
        return Decision::Loading;
    }
    if requirements.require_auth && !session.is_authenticated {
        return Decision::RedirectLogin {
            to: LOGIN_PATH.to_string(),
            from: location.to_string(),
        };
    }
    if requirements.require_super_admin && !session.is_super_admin {
        return Decision::RedirectUnauthorized;
    }
    if requirements.require_company_access && !(session.is_company_user || session.is_super_admin) {
        return Decision::RedirectUnauthorized;
    }
    Decision::Allow
}

/// Variante do portal do cliente: só olha carregando e autenticado.
pub fn decide_company(session: &CompanySession, location: &str) -> Decision {
    if session.is_loading {
        return Decision::Loading;
    }
    if !session.is_authenticated {
        return Decision::RedirectLogin {
            to: CLIENTE_LOGIN_PATH.to_string(),
            from: location.to_string(),
        };
    }
    Decision::Allow
}

pub fn login_url(to: &str, from: &str) -> String {
    let from: String = url::form_urlencoded::byte_serialize(from.as_bytes()).collect();
    format!("{}?from={}", to, from)
}

impl IntoResponse for Decision {
    fn into_response(self) -> Response {
        match self {
            Decision::Loading => (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, "1")],
                Json(json!({ "success": false, "error": "Sessão ainda carregando. Tente novamente." })),
            )
                .into_response(),
            Decision::RedirectLogin { to, from } => Redirect::to(&login_url(&to, &from)).into_response(),
            Decision::RedirectUnauthorized => Redirect::to(UNAUTHORIZED_PATH).into_response(),
            // Só chega aqui se alguém converter um Allow por engano
            Decision::Allow => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

// O caminho pedido, antes de qualquer `nest`
fn localizacao(request: &Request) -> String {
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

#[derive(Clone)]
pub struct GuardState {
    pub sessoes: SessionResolver,
    pub requisitos: RouteRequirements,
}

impl GuardState {
    pub fn new(sessoes: SessionResolver, requisitos: RouteRequirements) -> Self {
        Self { sessoes, requisitos }
    }
}

/// Resolve a sessão, aplica [`decide`] e, se liberado, deixa a [`Session`]
/// nas extensions da requisição.
pub async fn route_guard(State(guard): State<GuardState>, mut request: Request, next: Next) -> Response {
    let token = bearer_token(request.headers());
    let session = guard.sessoes.resolve(token.as_deref()).await;
    let location = localizacao(&request);

    match decide(&guard.requisitos, &session, &location) {
        Decision::Allow => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        decisao => {
            tracing::debug!("Acesso a {} barrado: {:?}", location, decisao);
            decisao.into_response()
        }
    }
}

pub async fn company_guard(State(sessoes): State<SessionResolver>, mut request: Request, next: Next) -> Response {
    let token = bearer_token(request.headers());
    let session = sessoes.resolve_company(token.as_deref()).await;
    let location = localizacao(&request);

    match decide_company(&session, &location) {
        Decision::Allow => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        decisao => decisao.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todas_as_sessoes() -> Vec<Session> {
        let mut sessoes = Vec::new();
        for bits in 0..16u8 {
            sessoes.push(Session {
                is_loading: bits & 1 != 0,
                is_authenticated: bits & 2 != 0,
                is_super_admin: bits & 4 != 0,
                is_company_user: bits & 8 != 0,
                ..Default::default()
            });
        }
        sessoes
    }

    fn todos_os_requisitos() -> Vec<RouteRequirements> {
        (0..8u8)
            .map(|bits| RouteRequirements {
                require_auth: bits & 1 != 0,
                require_super_admin: bits & 2 != 0,
                require_company_access: bits & 4 != 0,
            })
            .collect()
    }

    #[test]
    fn test_tabela_completa() {
        let mut casos = 0;
        for session in todas_as_sessoes() {
            for req in todos_os_requisitos() {
                let decisao = decide(&req, &session, "/cliente/agenda");
                casos += 1;

                if session.is_loading {
                    assert_eq!(decisao, Decision::Loading);
                    continue;
                }

                let barrado_login = req.require_auth && !session.is_authenticated;
                let barrado_admin = req.require_super_admin && !session.is_super_admin;
                let barrado_empresa =
                    req.require_company_access && !session.is_company_user && !session.is_super_admin;

                let esperado = if barrado_login {
                    Decision::RedirectLogin {
                        to: "/login".into(),
                        from: "/cliente/agenda".into(),
                    }
                } else if barrado_admin || barrado_empresa {
                    Decision::RedirectUnauthorized
                } else {
                    Decision::Allow
                };
                assert_eq!(decisao, esperado, "sessão {:?}, requisitos {:?}", session, req);
            }
        }
        assert_eq!(casos, 16 * 8);
    }

    #[test]
    fn test_carregando_sempre_vence() {
        let session = Session::loading();
        for req in todos_os_requisitos() {
            assert_eq!(decide(&req, &session, "/"), Decision::Loading);
        }
    }

    #[test]
    fn test_super_admin_passa_no_acesso_de_empresa() {
        let session = Session {
            is_authenticated: true,
            is_super_admin: true,
            ..Default::default()
        };
        assert_eq!(decide(&RouteRequirements::company_access(), &session, "/"), Decision::Allow);
    }

    #[test]
    fn test_usuario_de_empresa_nao_entra_no_admin() {
        let session = Session {
            is_authenticated: true,
            is_company_user: true,
            ..Default::default()
        };
        assert_eq!(
            decide(&RouteRequirements::super_admin(), &session, "/admin/dashboard"),
            Decision::RedirectUnauthorized
        );
    }

    #[test]
    fn test_anonimo_vai_para_login_preservando_origem() {
        let decisao = decide(&RouteRequirements::default(), &Session::anonima(), "/admin/dashboard");
        assert_eq!(
            decisao,
            Decision::RedirectLogin {
                to: "/login".into(),
                from: "/admin/dashboard".into(),
            }
        );

        let resposta = decisao.into_response();
        assert_eq!(resposta.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resposta.headers()[header::LOCATION],
            "/login?from=%2Fadmin%2Fdashboard"
        );
    }

    #[test]
    fn test_padrao_exige_so_autenticacao() {
        assert_eq!(
            RouteRequirements::default(),
            RouteRequirements {
                require_auth: true,
                require_super_admin: false,
                require_company_access: false,
            }
        );
    }

    #[test]
    fn test_decide_company() {
        assert_eq!(
            decide_company(&CompanySession { is_loading: true, ..Default::default() }, "/cliente"),
            Decision::Loading
        );
        assert_eq!(
            decide_company(&CompanySession::default(), "/cliente/agenda"),
            Decision::RedirectLogin {
                to: "/cliente/login".into(),
                from: "/cliente/agenda".into(),
            }
        );
        assert_eq!(
            decide_company(&CompanySession { is_authenticated: true, ..Default::default() }, "/cliente"),
            Decision::Allow
        );
    }

    #[test]
    fn test_resposta_carregando() {
        let resposta = Decision::Loading.into_response();
        assert_eq!(resposta.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resposta.headers()[header::RETRY_AFTER], "1");
    }

    #[test]
    fn test_login_url_codifica_query() {
        assert_eq!(
            login_url("/login", "/cliente/agenda?data=2026-03-09"),
            "/login?from=%2Fcliente%2Fagenda%3Fdata%3D2026-03-09"
        );
    }
}

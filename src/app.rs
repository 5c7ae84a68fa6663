// src/app.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};

use crate::{
    config::AppState,
    handlers,
    middleware::guard::{company_guard, route_guard, GuardState, RouteRequirements},
};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me));

    // Painel da plataforma: só super admin
    let admin_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::resumo))
        .route("/empresas", get(handlers::empresas::listar))
        .route(
            "/empresas/{id}",
            get(handlers::empresas::buscar)
                .put(handlers::empresas::atualizar)
                .delete(handlers::empresas::remover),
        )
        .route("/empresas/{id}/status", patch(handlers::empresas::alterar_status))
        .route(
            "/administradores",
            get(handlers::administradores::listar).post(handlers::administradores::criar),
        )
        .route(
            "/administradores/{id}",
            put(handlers::administradores::atualizar).delete(handlers::administradores::remover),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            GuardState::new(app_state.sessoes.clone(), RouteRequirements::super_admin()),
            route_guard,
        ));

    // Painel da empresa: usuário da empresa ou super admin (com X-Empresa-Id)
    let empresa_routes = Router::new()
        .route(
            "/usuarios",
            get(handlers::usuarios::listar).post(handlers::usuarios::criar),
        )
        .route(
            "/usuarios/{id}",
            get(handlers::usuarios::buscar)
                .put(handlers::usuarios::atualizar)
                .delete(handlers::usuarios::remover),
        )
        .route(
            "/servicos",
            get(handlers::agenda::listar_servicos).post(handlers::agenda::criar_servico),
        )
        .route(
            "/servicos/{id}",
            put(handlers::agenda::atualizar_servico).delete(handlers::agenda::remover_servico),
        )
        .route(
            "/agenda",
            get(handlers::agenda::listar_agendamentos).post(handlers::agenda::criar_agendamento),
        )
        .route("/agenda/horarios", get(handlers::agenda::horarios))
        .route(
            "/agenda/{id}",
            get(handlers::agenda::buscar_agendamento).delete(handlers::agenda::remover_agendamento),
        )
        .route("/agenda/{id}/status", patch(handlers::agenda::alterar_status))
        .route_layer(axum_middleware::from_fn_with_state(
            GuardState::new(app_state.sessoes.clone(), RouteRequirements::company_access()),
            route_guard,
        ));

    // Portal do cliente (tenant)
    let cliente_routes = Router::new()
        .route("/cliente", get(handlers::cliente::perfil))
        .route("/cliente/agenda", get(handlers::cliente::agenda))
        .route("/cliente/primeiro-acesso", post(handlers::cliente::primeiro_acesso))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.sessoes.clone(),
            company_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/planos", get(handlers::catalogo::listar_planos))
        .route("/api/veiculos", get(handlers::catalogo::listar_veiculos))
        .route("/api/onboarding", post(handlers::onboarding::cadastrar))
        .route("/api/onboarding/verificar-email", get(handlers::onboarding::verificar_email))
        .route(
            "/api/onboarding/verificar-subdominio",
            get(handlers::onboarding::verificar_subdominio),
        )
        .route("/login", get(handlers::paginas::login))
        .route("/unauthorized", get(handlers::paginas::unauthorized))
        .route("/cliente/login", get(handlers::paginas::cliente_login))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/empresa", empresa_routes)
        .merge(cliente_routes)
        .with_state(app_state)
}

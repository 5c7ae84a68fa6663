// src/handlers/paginas.rs
//
// Páginas mínimas para onde o guarda redireciona.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;

use crate::services::notificacao::escape_html;

#[derive(Debug, Deserialize)]
pub struct PaginaLoginQuery {
    pub from: Option<String>,
}

fn pagina(titulo: &str, corpo: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"pt-BR\">\n<head><meta charset=\"utf-8\"><title>{titulo} · AgendiCar</title></head>\n<body>\n<h1>{titulo}</h1>\n{corpo}\n</body>\n</html>\n"
    ))
}

fn aviso_retorno(from: Option<String>) -> String {
    match from.filter(|f| f.starts_with('/')) {
        Some(from) => format!(
            "<p>Depois de entrar você volta para <code>{}</code>.</p>",
            escape_html(&from)
        ),
        None => String::new(),
    }
}

pub async fn login(Query(query): Query<PaginaLoginQuery>) -> Html<String> {
    let corpo = format!(
        "<p>Entre com o seu e-mail e senha (POST /api/auth/login).</p>\n{}",
        aviso_retorno(query.from)
    );
    pagina("Entrar", &corpo)
}

pub async fn cliente_login(Query(query): Query<PaginaLoginQuery>) -> Html<String> {
    let corpo = format!(
        "<p>Área do cliente. Entre com as credenciais recebidas da sua empresa.</p>\n{}",
        aviso_retorno(query.from)
    );
    pagina("Área do cliente", &corpo)
}

pub async fn unauthorized() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        pagina("Acesso negado", "<p>Você não tem permissão para acessar esta página.</p>"),
    )
}

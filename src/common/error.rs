use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras de negócio que não cabem no `validator` (subdomínio, horários, ...)
    #[error("{0}")]
    Validacao(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Subdomínio já existe")]
    SubdominioJaExiste,

    #[error("Valor duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Registro não encontrado")]
    RegistroNaoEncontrado,

    #[error("Acesso negado: {0}")]
    AcessoNegado(String),

    #[error("Confirmação inválida")]
    ConfirmacaoInvalida,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Validacao(_) | AppError::ConfirmacaoInvalida => {
                StatusCode::BAD_REQUEST
            }
            AppError::EmailAlreadyExists
            | AppError::SubdominioJaExiste
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::RegistroNaoEncontrado => StatusCode::NOT_FOUND,
            AppError::AcessoNegado(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::Validacao(msg) => msg,
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::SubdominioJaExiste => "Este subdomínio já está em uso.".to_string(),
            AppError::UniqueConstraintViolation(campo) => {
                format!("Já existe um registro com este valor ({}).", campo)
            }
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::RegistroNaoEncontrado => "Registro não encontrado.".to_string(),
            AppError::AcessoNegado(motivo) => motivo,
            AppError::ConfirmacaoInvalida => {
                "A confirmação não confere. Digite o subdomínio da empresa para excluir.".to_string()
            }

            // Todos os outros erros viram 500 com mensagem genérica.
            // O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}

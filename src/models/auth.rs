// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::texto::{normalizar_email, Normalizar};

// Metadados gravados junto da identidade no cadastro.
// `senha_provisoria` indica que a senha atual foi gerada pelo sistema
// e precisa ser trocada no primeiro acesso.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    #[serde(default)]
    pub nome_cliente_empresa: Option<String>,
    #[serde(default)]
    pub subdominio: Option<String>,
    #[serde(default)]
    pub senha_provisoria: bool,
    #[serde(default)]
    pub empresa_id: Option<Uuid>,
}

// A identidade autenticada (sem hash de senha)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub metadata: IdentityMetadata,
    pub created_at: DateTime<Utc>,
}

// Linha da tabela auth_identities
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdentityRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub metadata: sqlx::types::Json<IdentityMetadata>,
    pub created_at: DateTime<Utc>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            metadata: row.metadata.0,
            created_at: row.created_at,
        }
    }
}

// Mudanças de estado emitidas pelo provedor de identidade
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    InitialSession(Option<Identity>),
    SignedIn(Identity),
    SignedOut,
    UserUpdated(Identity),
}

// Dados para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

impl Normalizar for LoginUserPayload {
    fn normalizado(self) -> Self {
        Self { email: normalizar_email(&self.email), ..self }
    }
}

// Troca da senha provisória
#[derive(Debug, Deserialize, Validate)]
pub struct PrimeiroAcessoPayload {
    #[validate(length(min = 8, message = "A nova senha deve ter no mínimo 8 caracteres."))]
    pub nova_senha: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub identity: Identity,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID da identidade
    pub sid: Uuid,  // ID da sessão (revogada no logout)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

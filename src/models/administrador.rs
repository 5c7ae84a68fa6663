// src/models/administrador.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::texto::{aparar, aparar_opcional, normalizar_email, Normalizar};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "nivel_acesso", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NivelAcesso {
    SuperAdmin,
    Admin,
    Suporte,
}

// Operador da plataforma (fora de qualquer empresa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Administrador {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub nivel_acesso: NivelAcesso,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NovoAdministradorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub nivel_acesso: NivelAcesso,
}

impl Normalizar for NovoAdministradorPayload {
    fn normalizado(self) -> Self {
        Self { nome: aparar(self.nome), email: normalizar_email(&self.email), ..self }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarAdministradorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: Option<String>,
    pub nivel_acesso: Option<NivelAcesso>,
    pub ativo: Option<bool>,
}

impl Normalizar for AtualizarAdministradorPayload {
    fn normalizado(self) -> Self {
        Self { nome: aparar_opcional(self.nome), ..self }
    }
}

#[derive(Debug, Serialize)]
pub struct AdministradorCriado {
    pub administrador: Administrador,
    pub senha_provisoria: String,
}

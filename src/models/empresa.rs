// src/models/empresa.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::texto::{aparar, aparar_opcional, normalizar_email, Normalizar};

use crate::models::usuario::Usuario;

// Mapeia o CREATE TYPE status_empresa do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "status_empresa")]
pub enum StatusEmpresa {
    Ativo,
    Inativo,
    Suspenso,
}

// ---
// Empresa (o Tenant)
// ---
// Cada lava-rápido tem o seu subdomínio e a sua partição de dados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Empresa {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub subdominio: String,
    pub status: StatusEmpresa,
    pub plano_id: Option<Uuid>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para inserir uma empresa (montados pelo onboarding)
#[derive(Debug, Clone)]
pub struct NovaEmpresa {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub subdominio: String,
    pub plano_id: Option<Uuid>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarEmpresaPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub nome: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub subdominio: Option<String>,
    pub plano_id: Option<Uuid>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
}

impl Normalizar for AtualizarEmpresaPayload {
    fn normalizado(self) -> Self {
        Self {
            nome: aparar_opcional(self.nome),
            email: self.email.as_deref().map(normalizar_email),
            telefone: aparar_opcional(self.telefone),
            cnpj: aparar_opcional(self.cnpj),
            endereco: aparar_opcional(self.endereco),
            ..self
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AlterarStatusPayload {
    pub status: StatusEmpresa,
}

// A exclusão exige que o operador digite o subdomínio da empresa
#[derive(Debug, Deserialize)]
pub struct RemoverEmpresaQuery {
    pub confirmacao: String,
}

// Cadastro de um novo lava-rápido (empresa + primeiro administrador)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OnboardingPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    pub nome_empresa: String,
    #[validate(email(message = "O e-mail da empresa é inválido."))]
    pub email_empresa: String,
    pub telefone: Option<String>,
    pub subdominio: String,
    pub plano_id: Option<Uuid>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
    #[validate(length(min = 1, message = "O nome do responsável é obrigatório."))]
    pub nome_responsavel: String,
    #[validate(email(message = "O e-mail do responsável é inválido."))]
    pub email_responsavel: String,
    pub telegram_chat_id: Option<String>,
}

impl Normalizar for OnboardingPayload {
    fn normalizado(self) -> Self {
        Self {
            nome_empresa: aparar(self.nome_empresa),
            email_empresa: normalizar_email(&self.email_empresa),
            telefone: aparar_opcional(self.telefone),
            cnpj: aparar_opcional(self.cnpj),
            endereco: aparar_opcional(self.endereco),
            nome_responsavel: aparar(self.nome_responsavel),
            email_responsavel: normalizar_email(&self.email_responsavel),
            telegram_chat_id: aparar_opcional(self.telegram_chat_id),
            ..self
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub empresa: Empresa,
    pub usuario: Usuario,
    pub url_acesso: String,
    pub senha_provisoria: String,
}

#[derive(Debug, Deserialize)]
pub struct VerificarEmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerificarSubdominioQuery {
    pub subdominio: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DisponibilidadeResponse {
    pub disponivel: bool,
}

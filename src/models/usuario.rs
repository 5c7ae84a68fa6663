// src/models/usuario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::texto::{aparar, aparar_opcional, normalizar_email, Normalizar};

// Mapeia o CREATE TYPE role_empresa do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "role_empresa", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoleEmpresa {
    AdminEmpresa,
    Gerente,
    Funcionario,
    Atendente,
    Visualizador,
}

impl RoleEmpresa {
    pub fn pode_gerenciar_usuarios(&self) -> bool {
        matches!(self, RoleEmpresa::AdminEmpresa | RoleEmpresa::Gerente)
    }

    /// Quem pode criar e alterar agendamentos e serviços.
    pub fn pode_editar_agenda(&self) -> bool {
        !matches!(self, RoleEmpresa::Visualizador)
    }

    // Hierarquia usada na gestão de usuários
    pub fn nivel(&self) -> u8 {
        match self {
            RoleEmpresa::AdminEmpresa => 4,
            RoleEmpresa::Gerente => 3,
            RoleEmpresa::Funcionario | RoleEmpresa::Atendente => 2,
            RoleEmpresa::Visualizador => 1,
        }
    }
}

/// Quem está gerenciando os usuários de uma empresa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtorEmpresa {
    SuperAdmin,
    Usuario { id: Uuid, role_empresa: RoleEmpresa },
}

impl AtorEmpresa {
    /// Ninguém concede nem altera um papel acima do próprio.
    pub fn alcanca(&self, role: RoleEmpresa) -> bool {
        match self {
            AtorEmpresa::SuperAdmin => true,
            AtorEmpresa::Usuario { role_empresa, .. } => role.nivel() <= role_empresa.nivel(),
        }
    }

    pub fn is_usuario(&self, id: Uuid) -> bool {
        matches!(self, AtorEmpresa::Usuario { id: ator_id, .. } if *ator_id == id)
    }
}

// Usuário de uma empresa. O `id` é o mesmo da identidade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub empresa_id: Uuid,
    pub role_empresa: RoleEmpresa,
    pub ativo: bool,
    pub primeiro_acesso_concluido: bool,
    pub telefone: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para inserir a linha em `usuarios`
#[derive(Debug, Clone)]
pub struct NovoUsuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub empresa_id: Uuid,
    pub role_empresa: RoleEmpresa,
    pub telefone: Option<String>,
    pub telegram_chat_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NovoUsuarioPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub role_empresa: RoleEmpresa,
    pub telefone: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Normalizar for NovoUsuarioPayload {
    fn normalizado(self) -> Self {
        Self {
            nome: aparar(self.nome),
            email: normalizar_email(&self.email),
            telefone: aparar_opcional(self.telefone),
            telegram_chat_id: aparar_opcional(self.telegram_chat_id),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarUsuarioPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: Option<String>,
    pub role_empresa: Option<RoleEmpresa>,
    pub ativo: Option<bool>,
    pub telefone: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Normalizar for AtualizarUsuarioPayload {
    fn normalizado(self) -> Self {
        Self {
            nome: aparar_opcional(self.nome),
            telefone: aparar_opcional(self.telefone),
            telegram_chat_id: aparar_opcional(self.telegram_chat_id),
            ..self
        }
    }
}

// A senha provisória só é devolvida uma vez, na criação
#[derive(Debug, Serialize)]
pub struct UsuarioCriado {
    pub usuario: Usuario,
    pub senha_provisoria: String,
}

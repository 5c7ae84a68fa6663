// src/models/agenda.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::texto::{aparar, aparar_opcional, Normalizar};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "status_agendamento", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatusAgendamento {
    Agendado,
    Confirmado,
    EmAndamento,
    Concluido,
    Cancelado,
}

impl StatusAgendamento {
    /// Concluído e cancelado são estados finais.
    pub fn is_final(&self) -> bool {
        matches!(self, StatusAgendamento::Concluido | StatusAgendamento::Cancelado)
    }

    /// Um agendamento cancelado libera o horário.
    pub fn ocupa_horario(&self) -> bool {
        !matches!(self, StatusAgendamento::Cancelado)
    }
}

// Serviço oferecido pelo lava-rápido (lavagem simples, polimento, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Servico {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: Decimal,
    pub duracao_minutos: i32,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NovoServicoPayload {
    #[validate(length(min = 1, message = "O nome do serviço é obrigatório."))]
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: Decimal,
    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 minuto."))]
    pub duracao_minutos: i32,
}

impl Normalizar for NovoServicoPayload {
    fn normalizado(self) -> Self {
        Self { nome: aparar(self.nome), descricao: aparar_opcional(self.descricao), ..self }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AtualizarServicoPayload {
    #[validate(length(min = 1, message = "O nome do serviço é obrigatório."))]
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<Decimal>,
    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 minuto."))]
    pub duracao_minutos: Option<i32>,
    pub ativo: Option<bool>,
}

impl Normalizar for AtualizarServicoPayload {
    fn normalizado(self) -> Self {
        Self { nome: aparar_opcional(self.nome), descricao: aparar_opcional(self.descricao), ..self }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Agendamento {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub servico_id: Uuid,
    pub cliente_nome: String,
    pub cliente_telefone: String,
    pub placa_veiculo: Option<String>,
    pub modelo_veiculo: Option<String>,
    pub data: NaiveDate,
    pub hora: NaiveTime,
    pub status: StatusAgendamento,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NovoAgendamentoPayload {
    pub servico_id: Uuid,
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub cliente_nome: String,
    #[validate(length(min = 8, message = "O telefone do cliente é inválido."))]
    pub cliente_telefone: String,
    pub placa_veiculo: Option<String>,
    pub modelo_veiculo: Option<String>,
    pub data: NaiveDate,
    pub hora: NaiveTime,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AtualizarStatusAgendamentoPayload {
    pub status: StatusAgendamento,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgendaQuery {
    pub de: Option<NaiveDate>,
    pub ate: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct HorariosQuery {
    pub data: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct HorariosDisponiveis {
    pub data: NaiveDate,
    pub horarios: Vec<NaiveTime>,
}

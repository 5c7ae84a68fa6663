// src/services/agenda_service.rs

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        agenda::{gerar_horarios, is_date_in_past, is_dia_util, is_horario_valido},
        error::AppError,
        texto::Normalizar,
    },
    db::AgendaStore,
    models::agenda::{
        AgendaQuery, Agendamento, AtualizarServicoPayload, HorariosDisponiveis, NovoAgendamentoPayload,
        NovoServicoPayload, Servico, StatusAgendamento,
    },
};

// Sem filtro, a agenda mostra a semana a partir de hoje
const DIAS_PADRAO: i64 = 6;

fn validar_preco(preco: Decimal) -> Result<(), AppError> {
    if preco.is_sign_negative() {
        return Err(AppError::Validacao("O preço não pode ser negativo.".into()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct AgendaService {
    agenda: Arc<dyn AgendaStore>,
}

impl AgendaService {
    pub fn new(agenda: Arc<dyn AgendaStore>) -> Self {
        Self { agenda }
    }

    // ---
    // Serviços
    // ---

    pub async fn listar_servicos(&self, empresa_id: Uuid) -> Result<Vec<Servico>, AppError> {
        self.agenda.listar_servicos(empresa_id).await
    }

    pub async fn criar_servico(&self, empresa_id: Uuid, payload: NovoServicoPayload) -> Result<Servico, AppError> {
        let payload = payload.normalizado();
        payload.validate()?;
        validar_preco(payload.preco)?;

        let servico = self.agenda.inserir_servico(empresa_id, &payload).await?;
        tracing::info!("🧽 Serviço '{}' criado na empresa {}", servico.nome, empresa_id);
        Ok(servico)
    }

    pub async fn atualizar_servico(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        dados: AtualizarServicoPayload,
    ) -> Result<Servico, AppError> {
        let dados = dados.normalizado();
        dados.validate()?;
        if let Some(preco) = dados.preco {
            validar_preco(preco)?;
        }
        self.agenda.atualizar_servico(empresa_id, id, &dados).await
    }

    pub async fn remover_servico(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.agenda.remover_servico(empresa_id, id).await
    }

    // ---
    // Agendamentos
    // ---

    pub async fn listar_agendamentos(
        &self,
        empresa_id: Uuid,
        filtro: AgendaQuery,
        hoje: NaiveDate,
    ) -> Result<Vec<Agendamento>, AppError> {
        let de = filtro.de.unwrap_or(hoje);
        let ate = filtro.ate.unwrap_or(de + Duration::days(DIAS_PADRAO));

        if ate < de {
            return Err(AppError::Validacao(
                "A data final não pode ser anterior à data inicial.".into(),
            ));
        }

        self.agenda.listar_agendamentos(empresa_id, de, ate).await
    }

    pub async fn buscar_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<Agendamento, AppError> {
        self.agenda.buscar_agendamento(empresa_id, id).await
    }

    pub async fn criar_agendamento(
        &self,
        empresa_id: Uuid,
        payload: NovoAgendamentoPayload,
        hoje: NaiveDate,
    ) -> Result<Agendamento, AppError> {
        payload.validate()?;

        if is_date_in_past(payload.data, hoje) {
            return Err(AppError::Validacao("Não é possível agendar em uma data passada.".into()));
        }
        if !is_dia_util(payload.data) {
            return Err(AppError::Validacao("O lava-rápido não funciona neste dia.".into()));
        }
        if !is_horario_valido(payload.hora) {
            return Err(AppError::Validacao("Horário fora do expediente.".into()));
        }

        let servico = match self.agenda.buscar_servico(empresa_id, payload.servico_id).await {
            Ok(servico) => servico,
            Err(AppError::RegistroNaoEncontrado) => {
                return Err(AppError::Validacao("Serviço inválido.".into()));
            }
            Err(e) => return Err(e),
        };
        if !servico.ativo {
            return Err(AppError::Validacao(format!(
                "O serviço '{}' não está disponível.",
                servico.nome
            )));
        }

        if self
            .agenda
            .horario_ocupado(empresa_id, payload.data, payload.hora)
            .await?
        {
            return Err(AppError::Validacao("Este horário já está ocupado.".into()));
        }

        let agendamento = self.agenda.inserir_agendamento(empresa_id, &payload).await?;
        tracing::info!(
            "📅 Agendamento {} em {} às {} ({})",
            agendamento.id,
            agendamento.data,
            agendamento.hora,
            servico.nome
        );
        Ok(agendamento)
    }

    /// Estados finais (concluído, cancelado) não mudam mais.
    pub async fn alterar_status(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        status: StatusAgendamento,
    ) -> Result<Agendamento, AppError> {
        let atual = self.agenda.buscar_agendamento(empresa_id, id).await?;

        if atual.status == status {
            return Ok(atual);
        }
        if atual.status.is_final() {
            return Err(AppError::Validacao(
                "Este agendamento já foi encerrado e não pode ser alterado.".into(),
            ));
        }

        self.agenda.alterar_status_agendamento(empresa_id, id, status).await
    }

    pub async fn remover_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.agenda.remover_agendamento(empresa_id, id).await
    }

    /// Horários livres de uma data. Datas passadas e dias sem
    /// expediente não têm horários.
    pub async fn horarios_disponiveis(
        &self,
        empresa_id: Uuid,
        data: NaiveDate,
        hoje: NaiveDate,
    ) -> Result<HorariosDisponiveis, AppError> {
        if is_date_in_past(data, hoje) {
            return Ok(HorariosDisponiveis { data, horarios: Vec::new() });
        }

        let ocupados: Vec<_> = self
            .agenda
            .listar_agendamentos(empresa_id, data, data)
            .await?
            .into_iter()
            .filter(|a| a.status.ocupa_horario())
            .map(|a| a.hora)
            .collect();

        let horarios = gerar_horarios(data)
            .into_iter()
            .filter(|hora| !ocupados.contains(hora))
            .collect();

        Ok(HorariosDisponiveis { data, horarios })
    }
}

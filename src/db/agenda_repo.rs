// src/db/agenda_repo.rs

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    db::AgendaStore,
    models::agenda::{
        Agendamento, AtualizarServicoPayload, NovoAgendamentoPayload, NovoServicoPayload, Servico,
        StatusAgendamento,
    },
};

// Serviços e agendamentos. Toda consulta é filtrada por empresa_id.
#[derive(Clone)]
pub struct AgendaRepository {
    pool: PgPool,
}

impl AgendaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgendaStore for AgendaRepository {
    // =========================================================================
    //  SERVIÇOS
    // =========================================================================

    async fn listar_servicos(&self, empresa_id: Uuid) -> Result<Vec<Servico>, AppError> {
        sqlx::query_as::<_, Servico>("SELECT * FROM servicos WHERE empresa_id = $1 ORDER BY nome")
            .bind(empresa_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_servico(&self, empresa_id: Uuid, id: Uuid) -> Result<Servico, AppError> {
        sqlx::query_as::<_, Servico>("SELECT * FROM servicos WHERE empresa_id = $1 AND id = $2")
            .bind(empresa_id)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn inserir_servico(&self, empresa_id: Uuid, dados: &NovoServicoPayload) -> Result<Servico, AppError> {
        sqlx::query_as::<_, Servico>(
            r#"
            INSERT INTO servicos (empresa_id, nome, descricao, preco, duracao_minutos)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(empresa_id)
        .bind(&dados.nome)
        .bind(&dados.descricao)
        .bind(dados.preco)
        .bind(dados.duracao_minutos)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn atualizar_servico(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        dados: &AtualizarServicoPayload,
    ) -> Result<Servico, AppError> {
        sqlx::query_as::<_, Servico>(
            r#"
            UPDATE servicos SET
                nome = COALESCE($3, nome),
                descricao = COALESCE($4, descricao),
                preco = COALESCE($5, preco),
                duracao_minutos = COALESCE($6, duracao_minutos),
                ativo = COALESCE($7, ativo)
            WHERE empresa_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(empresa_id)
        .bind(id)
        .bind(&dados.nome)
        .bind(&dados.descricao)
        .bind(dados.preco)
        .bind(dados.duracao_minutos)
        .bind(dados.ativo)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn remover_servico(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM servicos WHERE empresa_id = $1 AND id = $2")
            .bind(empresa_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }

    // =========================================================================
    //  AGENDAMENTOS
    // =========================================================================

    async fn listar_agendamentos(
        &self,
        empresa_id: Uuid,
        de: NaiveDate,
        ate: NaiveDate,
    ) -> Result<Vec<Agendamento>, AppError> {
        sqlx::query_as::<_, Agendamento>(
            r#"
            SELECT * FROM agendamentos
            WHERE empresa_id = $1 AND data BETWEEN $2 AND $3
            ORDER BY data, hora
            "#,
        )
        .bind(empresa_id)
        .bind(de)
        .bind(ate)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn buscar_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<Agendamento, AppError> {
        sqlx::query_as::<_, Agendamento>(
            "SELECT * FROM agendamentos WHERE empresa_id = $1 AND id = $2",
        )
        .bind(empresa_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn horario_ocupado(&self, empresa_id: Uuid, data: NaiveDate, hora: NaiveTime) -> Result<bool, AppError> {
        let ocupado = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM agendamentos
                WHERE empresa_id = $1 AND data = $2 AND hora = $3
                  AND status <> 'cancelado'
            )
            "#,
        )
        .bind(empresa_id)
        .bind(data)
        .bind(hora)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ocupado)
    }

    async fn inserir_agendamento(
        &self,
        empresa_id: Uuid,
        dados: &NovoAgendamentoPayload,
    ) -> Result<Agendamento, AppError> {
        sqlx::query_as::<_, Agendamento>(
            r#"
            INSERT INTO agendamentos (
                empresa_id, servico_id, cliente_nome, cliente_telefone,
                placa_veiculo, modelo_veiculo, data, hora, observacoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(empresa_id)
        .bind(dados.servico_id)
        .bind(&dados.cliente_nome)
        .bind(&dados.cliente_telefone)
        .bind(&dados.placa_veiculo)
        .bind(&dados.modelo_veiculo)
        .bind(dados.data)
        .bind(dados.hora)
        .bind(&dados.observacoes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn alterar_status_agendamento(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        status: StatusAgendamento,
    ) -> Result<Agendamento, AppError> {
        sqlx::query_as::<_, Agendamento>(
            "UPDATE agendamentos SET status = $3 WHERE empresa_id = $1 AND id = $2 RETURNING *",
        )
        .bind(empresa_id)
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn remover_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agendamentos WHERE empresa_id = $1 AND id = $2")
            .bind(empresa_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }
}

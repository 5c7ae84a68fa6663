// src/db/empresa_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    db::EmpresaStore,
    models::empresa::{AtualizarEmpresaPayload, Empresa, NovaEmpresa, StatusEmpresa},
};

// O repositório de empresas, responsável por todas as interações com a tabela 'empresas'
#[derive(Clone)]
pub struct EmpresaRepository {
    pool: PgPool,
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmpresaStore for EmpresaRepository {
    async fn listar(&self) -> Result<Vec<Empresa>, AppError> {
        sqlx::query_as::<_, Empresa>("SELECT * FROM empresas ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_por_id(&self, id: Uuid) -> Result<Empresa, AppError> {
        sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_por_email(&self, email: &str) -> Result<Empresa, AppError> {
        sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_por_subdominio(&self, subdominio: &str) -> Result<Empresa, AppError> {
        sqlx::query_as::<_, Empresa>("SELECT * FROM empresas WHERE subdominio = $1")
            .bind(subdominio)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn inserir(&self, nova: &NovaEmpresa) -> Result<Empresa, AppError> {
        sqlx::query_as::<_, Empresa>(
            r#"
            INSERT INTO empresas (nome, email, telefone, subdominio, plano_id, cnpj, endereco)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&nova.nome)
        .bind(&nova.email)
        .bind(&nova.telefone)
        .bind(&nova.subdominio)
        .bind(nova.plano_id)
        .bind(&nova.cnpj)
        .bind(&nova.endereco)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn atualizar(&self, id: Uuid, dados: &AtualizarEmpresaPayload) -> Result<Empresa, AppError> {
        // Campos ausentes no payload mantêm o valor atual
        sqlx::query_as::<_, Empresa>(
            r#"
            UPDATE empresas SET
                nome = COALESCE($2, nome),
                email = COALESCE($3, email),
                telefone = COALESCE($4, telefone),
                subdominio = COALESCE($5, subdominio),
                plano_id = COALESCE($6, plano_id),
                cnpj = COALESCE($7, cnpj),
                endereco = COALESCE($8, endereco),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dados.nome)
        .bind(&dados.email)
        .bind(&dados.telefone)
        .bind(&dados.subdominio)
        .bind(dados.plano_id)
        .bind(&dados.cnpj)
        .bind(&dados.endereco)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn alterar_status(&self, id: Uuid, status: StatusEmpresa) -> Result<Empresa, AppError> {
        sqlx::query_as::<_, Empresa>(
            "UPDATE empresas SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn remover(&self, id: Uuid) -> Result<(), AppError> {
        // usuarios, servicos e agendamentos caem junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM empresas WHERE id = $1")
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

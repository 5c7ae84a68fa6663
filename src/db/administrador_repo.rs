// src/db/administrador_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    db::AdministradorStore,
    models::administrador::{Administrador, AtualizarAdministradorPayload, NivelAcesso},
};

#[derive(Clone)]
pub struct AdministradorRepository {
    pool: PgPool,
}

impl AdministradorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdministradorStore for AdministradorRepository {
    async fn listar(&self) -> Result<Vec<Administrador>, AppError> {
        sqlx::query_as::<_, Administrador>("SELECT * FROM administradores ORDER BY nome")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_por_id(&self, id: Uuid) -> Result<Administrador, AppError> {
        sqlx::query_as::<_, Administrador>("SELECT * FROM administradores WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_por_email(&self, email: &str) -> Result<Administrador, AppError> {
        sqlx::query_as::<_, Administrador>("SELECT * FROM administradores WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn inserir(
        &self,
        id: Uuid,
        nome: &str,
        email: &str,
        nivel_acesso: NivelAcesso,
    ) -> Result<Administrador, AppError> {
        sqlx::query_as::<_, Administrador>(
            r#"
            INSERT INTO administradores (id, nome, email, nivel_acesso)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(email)
        .bind(nivel_acesso)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn atualizar(
        &self,
        id: Uuid,
        dados: &AtualizarAdministradorPayload,
    ) -> Result<Administrador, AppError> {
        sqlx::query_as::<_, Administrador>(
            r#"
            UPDATE administradores SET
                nome = COALESCE($2, nome),
                nivel_acesso = COALESCE($3, nivel_acesso),
                ativo = COALESCE($4, ativo)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dados.nome)
        .bind(dados.nivel_acesso)
        .bind(dados.ativo)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn remover(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM administradores WHERE id = $1")
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

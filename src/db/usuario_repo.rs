// src/db/usuario_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    db::UsuarioStore,
    models::usuario::{AtualizarUsuarioPayload, NovoUsuario, Usuario},
};

// O repositório de usuários das empresas (tabela 'usuarios')
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsuarioStore for UsuarioRepository {
    async fn listar_por_empresa(&self, empresa_id: Uuid) -> Result<Vec<Usuario>, AppError> {
        sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE empresa_id = $1 ORDER BY created_at DESC",
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn buscar_por_id(&self, id: Uuid) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_por_email(&self, email: &str) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn inserir(&self, novo: &NovoUsuario) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (id, nome, email, empresa_id, role_empresa, telefone, telegram_chat_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(novo.id)
        .bind(&novo.nome)
        .bind(&novo.email)
        .bind(novo.empresa_id)
        .bind(novo.role_empresa)
        .bind(&novo.telefone)
        .bind(&novo.telegram_chat_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn atualizar(&self, id: Uuid, dados: &AtualizarUsuarioPayload) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                nome = COALESCE($2, nome),
                role_empresa = COALESCE($3, role_empresa),
                ativo = COALESCE($4, ativo),
                telefone = COALESCE($5, telefone),
                telegram_chat_id = COALESCE($6, telegram_chat_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dados.nome)
        .bind(dados.role_empresa)
        .bind(dados.ativo)
        .bind(&dados.telefone)
        .bind(&dados.telegram_chat_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn marcar_primeiro_acesso(&self, id: Uuid) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET primeiro_acesso_concluido = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    async fn remover(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }

    async fn contar(&self, empresa_id: Option<Uuid>) -> Result<i64, AppError> {
        // `$1 IS NULL` => conta todos os usuários da plataforma
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM usuarios WHERE ($1::uuid IS NULL OR empresa_id = $1)",
        )
        .bind(empresa_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

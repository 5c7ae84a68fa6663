// src/db/identity_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::auth::{IdentityMetadata, IdentityRow},
};

// Identidades e sessões do provedor de autenticação
// (tabelas 'auth_identities' e 'auth_sessions')
#[derive(Clone)]
pub struct IdentityRepository {
    pool: PgPool,
}

impl IdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRow>, AppError> {
        sqlx::query_as::<_, IdentityRow>("SELECT * FROM auth_identities WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<IdentityRow>, AppError> {
        sqlx::query_as::<_, IdentityRow>("SELECT * FROM auth_identities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    // Cria a identidade; e-mail duplicado vira AppError::EmailAlreadyExists
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        metadata: &IdentityMetadata,
    ) -> Result<IdentityRow, AppError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO auth_identities (email, password_hash, metadata)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(Json(metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        metadata: &IdentityMetadata,
    ) -> Result<IdentityRow, AppError> {
        sqlx::query_as::<_, IdentityRow>(
            r#"
            UPDATE auth_identities SET password_hash = $2, metadata = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(Json(metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        // auth_sessions cai junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM auth_identities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(())
    }

    pub async fn create_session(
        &self,
        identity_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Uuid, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO auth_sessions (identity_id, expires_at) VALUES ($1, $2) RETURNING id",
        )
        .bind(identity_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    pub async fn session_is_active(&self, session_id: Uuid, identity_id: Uuid) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM auth_sessions
                WHERE id = $1 AND identity_id = $2
                  AND revoked_at IS NULL AND expires_at > NOW()
            )
            "#,
        )
        .bind(session_id)
        .bind(identity_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    pub async fn revoke_session(&self, session_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE auth_sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

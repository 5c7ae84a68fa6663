// src/db/catalogo_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    db::CatalogoStore,
    models::catalogo::{Plano, VeiculoComum},
};

// Tabelas de referência (somente leitura): planos e common_vehicles
#[derive(Clone)]
pub struct CatalogoRepository {
    pool: PgPool,
}

impl CatalogoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogoStore for CatalogoRepository {
    async fn listar_planos(&self) -> Result<Vec<Plano>, AppError> {
        sqlx::query_as::<_, Plano>("SELECT * FROM planos WHERE ativo = TRUE ORDER BY preco_mensal")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn buscar_plano(&self, id: Uuid) -> Result<Plano, AppError> {
        sqlx::query_as::<_, Plano>("SELECT * FROM planos WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    async fn listar_veiculos(&self, marca: Option<&str>) -> Result<Vec<VeiculoComum>, AppError> {
        sqlx::query_as::<_, VeiculoComum>(
            r#"
            SELECT id, marca, modelo, porte FROM common_vehicles
            WHERE ($1::text IS NULL OR marca ILIKE $1)
            ORDER BY marca, modelo
            "#,
        )
        .bind(marca)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

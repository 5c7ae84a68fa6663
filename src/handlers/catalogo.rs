// src/handlers/catalogo.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalogo::{Plano, VeiculoComum, VeiculosQuery},
};

pub async fn listar_planos(State(app_state): State<AppState>) -> Result<Json<Vec<Plano>>, AppError> {
    Ok(Json(app_state.catalogo.listar_planos().await?))
}

pub async fn listar_veiculos(
    State(app_state): State<AppState>,
    Query(query): Query<VeiculosQuery>,
) -> Result<Json<Vec<VeiculoComum>>, AppError> {
    let marca = query.marca.as_deref().map(str::trim).filter(|m| !m.is_empty());
    Ok(Json(app_state.catalogo.listar_veiculos(marca).await?))
}

// src/models/catalogo.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Plano de assinatura (cobrança mensal da empresa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Plano {
    pub id: Uuid,
    pub nome: String,
    pub preco_mensal: Decimal,
    // `None` = usuários ilimitados
    pub limite_usuarios: Option<i32>,
    pub ativo: bool,
}

// Tabela de referência `common_vehicles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VeiculoComum {
    pub id: i32,
    pub marca: String,
    pub modelo: String,
    pub porte: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VeiculosQuery {
    pub marca: Option<String>,
}

// src/models/dashboard.rs

use serde::Serialize;

// Os cards do topo do painel da plataforma
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ResumoDashboard {
    pub total_empresas: usize,
    pub empresas_ativas: usize,
    pub empresas_inativas: usize,
    pub empresas_suspensas: usize,
    pub total_usuarios: i64,
}

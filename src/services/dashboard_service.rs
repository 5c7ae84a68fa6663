// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{EmpresaStore, UsuarioStore},
    models::{dashboard::ResumoDashboard, empresa::StatusEmpresa},
};

#[derive(Clone)]
pub struct DashboardService {
    empresas: Arc<dyn EmpresaStore>,
    usuarios: Arc<dyn UsuarioStore>,
}

impl DashboardService {
    pub fn new(empresas: Arc<dyn EmpresaStore>, usuarios: Arc<dyn UsuarioStore>) -> Self {
        Self { empresas, usuarios }
    }

    pub async fn resumo(&self) -> Result<ResumoDashboard, AppError> {
        let empresas = self.empresas.listar().await?;
        let total_usuarios = self.usuarios.contar(None).await?;

        let mut resumo = ResumoDashboard {
            total_empresas: empresas.len(),
            total_usuarios,
            ..Default::default()
        };
        for empresa in &empresas {
            match empresa.status {
                StatusEmpresa::Ativo => resumo.empresas_ativas += 1,
                StatusEmpresa::Inativo => resumo.empresas_inativas += 1,
                StatusEmpresa::Suspenso => resumo.empresas_suspensas += 1,
            }
        }

        Ok(resumo)
    }
}

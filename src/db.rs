// src/db.rs
//
// Contratos do "Tenant Store". Os serviços dependem só destes traits;
// a implementação de produção é o Postgres (repositórios sqlx abaixo).

pub mod administrador_repo;
pub use administrador_repo::AdministradorRepository;
pub mod agenda_repo;
pub use agenda_repo::AgendaRepository;
pub mod catalogo_repo;
pub use catalogo_repo::CatalogoRepository;
pub mod empresa_repo;
pub use empresa_repo::EmpresaRepository;
pub mod identity_repo;
pub use identity_repo::IdentityRepository;
pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        administrador::{Administrador, AtualizarAdministradorPayload, NivelAcesso},
        agenda::{
            Agendamento, AtualizarServicoPayload, NovoAgendamentoPayload, NovoServicoPayload,
            Servico, StatusAgendamento,
        },
        catalogo::{Plano, VeiculoComum},
        empresa::{AtualizarEmpresaPayload, Empresa, NovaEmpresa, StatusEmpresa},
        usuario::{AtualizarUsuarioPayload, NovoUsuario, Usuario},
    },
};

// Todas as buscas "por chave" devolvem `AppError::RegistroNaoEncontrado`
// quando não existe linha.

#[async_trait]
pub trait EmpresaStore: Send + Sync {
    async fn listar(&self) -> Result<Vec<Empresa>, AppError>;
    async fn buscar_por_id(&self, id: Uuid) -> Result<Empresa, AppError>;
    async fn buscar_por_email(&self, email: &str) -> Result<Empresa, AppError>;
    async fn buscar_por_subdominio(&self, subdominio: &str) -> Result<Empresa, AppError>;
    async fn inserir(&self, nova: &NovaEmpresa) -> Result<Empresa, AppError>;
    async fn atualizar(&self, id: Uuid, dados: &AtualizarEmpresaPayload) -> Result<Empresa, AppError>;
    async fn alterar_status(&self, id: Uuid, status: StatusEmpresa) -> Result<Empresa, AppError>;
    async fn remover(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait UsuarioStore: Send + Sync {
    async fn listar_por_empresa(&self, empresa_id: Uuid) -> Result<Vec<Usuario>, AppError>;
    async fn buscar_por_id(&self, id: Uuid) -> Result<Usuario, AppError>;
    async fn buscar_por_email(&self, email: &str) -> Result<Usuario, AppError>;
    async fn inserir(&self, novo: &NovoUsuario) -> Result<Usuario, AppError>;
    async fn atualizar(&self, id: Uuid, dados: &AtualizarUsuarioPayload) -> Result<Usuario, AppError>;
    async fn marcar_primeiro_acesso(&self, id: Uuid) -> Result<Usuario, AppError>;
    async fn remover(&self, id: Uuid) -> Result<(), AppError>;
    async fn contar(&self, empresa_id: Option<Uuid>) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AdministradorStore: Send + Sync {
    async fn listar(&self) -> Result<Vec<Administrador>, AppError>;
    async fn buscar_por_id(&self, id: Uuid) -> Result<Administrador, AppError>;
    async fn buscar_por_email(&self, email: &str) -> Result<Administrador, AppError>;
    async fn inserir(
        &self,
        id: Uuid,
        nome: &str,
        email: &str,
        nivel_acesso: NivelAcesso,
    ) -> Result<Administrador, AppError>;
    async fn atualizar(
        &self,
        id: Uuid,
        dados: &AtualizarAdministradorPayload,
    ) -> Result<Administrador, AppError>;
    async fn remover(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait AgendaStore: Send + Sync {
    async fn listar_servicos(&self, empresa_id: Uuid) -> Result<Vec<Servico>, AppError>;
    async fn buscar_servico(&self, empresa_id: Uuid, id: Uuid) -> Result<Servico, AppError>;
    async fn inserir_servico(&self, empresa_id: Uuid, dados: &NovoServicoPayload) -> Result<Servico, AppError>;
    async fn atualizar_servico(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        dados: &AtualizarServicoPayload,
    ) -> Result<Servico, AppError>;
    async fn remover_servico(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError>;

    async fn listar_agendamentos(
        &self,
        empresa_id: Uuid,
        de: NaiveDate,
        ate: NaiveDate,
    ) -> Result<Vec<Agendamento>, AppError>;
    async fn buscar_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<Agendamento, AppError>;
    async fn horario_ocupado(&self, empresa_id: Uuid, data: NaiveDate, hora: NaiveTime) -> Result<bool, AppError>;
    async fn inserir_agendamento(
        &self,
        empresa_id: Uuid,
        dados: &NovoAgendamentoPayload,
    ) -> Result<Agendamento, AppError>;
    async fn alterar_status_agendamento(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        status: StatusAgendamento,
    ) -> Result<Agendamento, AppError>;
    async fn remover_agendamento(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait CatalogoStore: Send + Sync {
    async fn listar_planos(&self) -> Result<Vec<Plano>, AppError>;
    async fn buscar_plano(&self, id: Uuid) -> Result<Plano, AppError>;
    async fn listar_veiculos(&self, marca: Option<&str>) -> Result<Vec<VeiculoComum>, AppError>;
}

// src/services/administrador_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::is_unico, error::AppError, texto::Normalizar},
    db::AdministradorStore,
    models::{
        administrador::{
            Administrador, AdministradorCriado, AtualizarAdministradorPayload, NivelAcesso,
            NovoAdministradorPayload,
        },
        auth::IdentityMetadata,
    },
    services::{
        identity::{desfazer_identidade, gerar_senha_provisoria, IdentityProvider},
    },
};

#[derive(Clone)]
pub struct AdministradorService {
    administradores: Arc<dyn AdministradorStore>,
    identity: Arc<dyn IdentityProvider>,
}

// Só super administradores gerenciam outros administradores
fn exigir_super_admin(ator: &Administrador) -> Result<(), AppError> {
    if ator.ativo && ator.nivel_acesso == NivelAcesso::SuperAdmin {
        return Ok(());
    }
    Err(AppError::AcessoNegado(
        "Apenas super administradores podem gerenciar administradores.".into(),
    ))
}

impl AdministradorService {
    pub fn new(administradores: Arc<dyn AdministradorStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { administradores, identity }
    }

    pub async fn listar(&self) -> Result<Vec<Administrador>, AppError> {
        self.administradores.listar().await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Administrador, AppError> {
        self.administradores.buscar_por_id(id).await
    }

    pub async fn criar(
        &self,
        ator: &Administrador,
        payload: NovoAdministradorPayload,
    ) -> Result<AdministradorCriado, AppError> {
        exigir_super_admin(ator)?;
        let payload = payload.normalizado();
        payload.validate()?;

        let email = payload.email.clone();
        if !is_unico(self.administradores.buscar_por_email(&email).await, "email", &email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let senha_provisoria = gerar_senha_provisoria();
        let metadata = IdentityMetadata {
            senha_provisoria: true,
            ..Default::default()
        };
        let identity = self.identity.sign_up(&email, &senha_provisoria, metadata).await?;

        let administrador = match self
            .administradores
            .inserir(identity.id, payload.nome.trim(), &email, payload.nivel_acesso)
            .await
        {
            Ok(administrador) => administrador,
            Err(e) => {
                desfazer_identidade(self.identity.as_ref(), identity.id).await;
                return Err(e);
            }
        };

        tracing::info!("🛡️ Administrador {} criado por {}", administrador.email, ator.email);
        Ok(AdministradorCriado { administrador, senha_provisoria })
    }

    pub async fn atualizar(
        &self,
        ator: &Administrador,
        id: Uuid,
        dados: AtualizarAdministradorPayload,
    ) -> Result<Administrador, AppError> {
        exigir_super_admin(ator)?;
        let dados = dados.normalizado();
        dados.validate()?;

        let perde_acesso = dados.ativo == Some(false)
            || dados.nivel_acesso.is_some_and(|nivel| nivel != NivelAcesso::SuperAdmin);
        if id == ator.id && perde_acesso {
            return Err(AppError::Validacao(
                "Você não pode remover o próprio acesso de super administrador.".into(),
            ));
        }

        self.administradores.atualizar(id, &dados).await
    }

    pub async fn remover(&self, ator: &Administrador, id: Uuid) -> Result<(), AppError> {
        exigir_super_admin(ator)?;

        if id == ator.id {
            return Err(AppError::Validacao("Você não pode excluir a própria conta.".into()));
        }

        let administrador = self.administradores.buscar_por_id(id).await?;
        self.administradores.remover(id).await?;
        desfazer_identidade(self.identity.as_ref(), administrador.id).await;

        tracing::warn!("🗑️ Administrador {} removido por {}", administrador.email, ator.email);
        Ok(())
    }
}

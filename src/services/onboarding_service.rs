// src/services/onboarding_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::is_unico, error::AppError, texto::Normalizar},
    db::{CatalogoStore, EmpresaStore, UsuarioStore},
    models::{
        auth::IdentityMetadata,
        empresa::{NovaEmpresa, OnboardingPayload, OnboardingResponse},
        usuario::{NovoUsuario, RoleEmpresa},
    },
    services::{
        empresa_service::{url_tenant, validar_subdominio},
        identity::{desfazer_identidade, gerar_senha_provisoria, IdentityProvider},
        notificacao::{Credenciais, TelegramNotifier},
    },
};

#[derive(Clone)]
pub struct OnboardingService {
    empresas: Arc<dyn EmpresaStore>,
    usuarios: Arc<dyn UsuarioStore>,
    catalogo: Arc<dyn CatalogoStore>,
    identity: Arc<dyn IdentityProvider>,
    notificador: TelegramNotifier,
    dominio_base: String,
}

impl OnboardingService {
    pub fn new(
        empresas: Arc<dyn EmpresaStore>,
        usuarios: Arc<dyn UsuarioStore>,
        catalogo: Arc<dyn CatalogoStore>,
        identity: Arc<dyn IdentityProvider>,
        notificador: TelegramNotifier,
        dominio_base: String,
    ) -> Self {
        Self { empresas, usuarios, catalogo, identity, notificador, dominio_base }
    }

    async fn desfazer_empresa(&self, empresa_id: Uuid) {
        if let Err(e) = self.empresas.remover(empresa_id).await {
            tracing::error!("🔥 Não foi possível remover a empresa {}: {:?}", empresa_id, e);
        }
    }

    /// Cadastra uma empresa e o primeiro usuário (admin_empresa).
    ///
    /// As etapas são sequenciais: empresa → identidade → usuário. Se uma
    /// etapa falhar, as anteriores são desfeitas na ordem inversa.
    pub async fn cadastrar(&self, payload: OnboardingPayload) -> Result<OnboardingResponse, AppError> {
        let payload = payload.normalizado();
        payload.validate()?;

        let subdominio = validar_subdominio(&payload.subdominio)?;
        let email_empresa = payload.email_empresa.clone();
        let email_responsavel = payload.email_responsavel.clone();

        if let Some(plano_id) = payload.plano_id {
            match self.catalogo.buscar_plano(plano_id).await {
                Ok(plano) if plano.ativo => {}
                Ok(_) | Err(AppError::RegistroNaoEncontrado) => {
                    return Err(AppError::Validacao("Plano inválido.".into()));
                }
                Err(e) => return Err(e),
            }
        }

        if !is_unico(self.empresas.buscar_por_subdominio(&subdominio).await, "subdominio", &subdominio) {
            return Err(AppError::SubdominioJaExiste);
        }
        if !is_unico(self.empresas.buscar_por_email(&email_empresa).await, "email", &email_empresa) {
            return Err(AppError::EmailAlreadyExists);
        }
        if !is_unico(self.usuarios.buscar_por_email(&email_responsavel).await, "email", &email_responsavel) {
            return Err(AppError::EmailAlreadyExists);
        }

        // 1. Empresa
        let empresa = self
            .empresas
            .inserir(&NovaEmpresa {
                nome: payload.nome_empresa.trim().to_string(),
                email: email_empresa,
                telefone: payload.telefone,
                subdominio: subdominio.clone(),
                plano_id: payload.plano_id,
                cnpj: payload.cnpj,
                endereco: payload.endereco,
            })
            .await?;

        // 2. Identidade do responsável
        let senha_provisoria = gerar_senha_provisoria();
        let metadata = IdentityMetadata {
            nome_cliente_empresa: Some(empresa.nome.clone()),
            subdominio: Some(subdominio.clone()),
            senha_provisoria: true,
            empresa_id: Some(empresa.id),
        };

        let identity = match self
            .identity
            .sign_up(&email_responsavel, &senha_provisoria, metadata)
            .await
        {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!("🔥 Onboarding de {}: falha ao criar identidade: {:?}", subdominio, e);
                self.desfazer_empresa(empresa.id).await;
                return Err(e);
            }
        };

        // 3. Usuário vinculado à empresa
        let usuario = match self
            .usuarios
            .inserir(&NovoUsuario {
                id: identity.id,
                nome: payload.nome_responsavel.trim().to_string(),
                email: email_responsavel,
                empresa_id: empresa.id,
                role_empresa: RoleEmpresa::AdminEmpresa,
                telefone: None,
                telegram_chat_id: payload.telegram_chat_id,
            })
            .await
        {
            Ok(usuario) => usuario,
            Err(e) => {
                tracing::error!("🔥 Onboarding de {}: falha ao vincular usuário: {:?}", subdominio, e);
                desfazer_identidade(self.identity.as_ref(), identity.id).await;
                self.desfazer_empresa(empresa.id).await;
                return Err(e);
            }
        };

        if let Some(chat_id) = usuario.telegram_chat_id.clone() {
            self.notificador.enviar_credenciais_em_segundo_plano(
                chat_id,
                Credenciais {
                    nome: usuario.nome.clone(),
                    email: usuario.email.clone(),
                    senha_provisoria: senha_provisoria.clone(),
                    subdominio: subdominio.clone(),
                },
            );
        }

        tracing::info!("🎉 Nova empresa cadastrada: {} ({})", empresa.nome, subdominio);

        Ok(OnboardingResponse {
            url_acesso: url_tenant(&subdominio, &self.dominio_base, "login"),
            empresa,
            usuario,
            senha_provisoria,
        })
    }
}

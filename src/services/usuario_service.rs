// src/services/usuario_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::is_unico,
        error::AppError,
        texto::{normalizar_email, Normalizar},
    },
    db::{CatalogoStore, EmpresaStore, UsuarioStore},
    models::{
        auth::IdentityMetadata,
        empresa::Empresa,
        usuario::{
            AtorEmpresa, AtualizarUsuarioPayload, NovoUsuario, NovoUsuarioPayload, RoleEmpresa, Usuario,
            UsuarioCriado,
        },
    },
    services::{
        identity::{desfazer_identidade, gerar_senha_provisoria, IdentityProvider},
        notificacao::{Credenciais, TelegramNotifier},
    },
};

/// Papel acima do ator: nem conceder nem mexer em quem já o tem.
fn exigir_alcance(ator: &AtorEmpresa, role: RoleEmpresa) -> Result<(), AppError> {
    if ator.alcanca(role) {
        Ok(())
    } else {
        Err(AppError::AcessoNegado(
            "Você não pode gerenciar usuários com papel acima do seu.".into(),
        ))
    }
}

#[derive(Clone)]
pub struct UsuarioService {
    usuarios: Arc<dyn UsuarioStore>,
    empresas: Arc<dyn EmpresaStore>,
    catalogo: Arc<dyn CatalogoStore>,
    identity: Arc<dyn IdentityProvider>,
    notificador: TelegramNotifier,
}

impl UsuarioService {
    pub fn new(
        usuarios: Arc<dyn UsuarioStore>,
        empresas: Arc<dyn EmpresaStore>,
        catalogo: Arc<dyn CatalogoStore>,
        identity: Arc<dyn IdentityProvider>,
        notificador: TelegramNotifier,
    ) -> Self {
        Self { usuarios, empresas, catalogo, identity, notificador }
    }

    pub async fn listar(&self, empresa_id: Uuid) -> Result<Vec<Usuario>, AppError> {
        self.usuarios.listar_por_empresa(empresa_id).await
    }

    /// Busca restrita à empresa: usuário de outro tenant é "não encontrado".
    pub async fn buscar(&self, empresa_id: Uuid, id: Uuid) -> Result<Usuario, AppError> {
        let usuario = self.usuarios.buscar_por_id(id).await?;
        if usuario.empresa_id != empresa_id {
            return Err(AppError::RegistroNaoEncontrado);
        }
        Ok(usuario)
    }

    /// `true` exatamente quando nenhum usuário tem este e-mail.
    pub async fn verificar_email_unico(&self, email: &str) -> bool {
        let email = normalizar_email(email);
        is_unico(self.usuarios.buscar_por_email(&email).await, "email", &email)
    }

    // Respeita o limite de usuários do plano da empresa (se houver)
    async fn verificar_limite_plano(&self, empresa: &Empresa) -> Result<(), AppError> {
        let Some(plano_id) = empresa.plano_id else {
            return Ok(());
        };

        let plano = match self.catalogo.buscar_plano(plano_id).await {
            Ok(plano) => plano,
            Err(AppError::RegistroNaoEncontrado) => return Ok(()),
            Err(e) => return Err(e),
        };

        if let Some(limite) = plano.limite_usuarios {
            let total = self.usuarios.contar(Some(empresa.id)).await?;
            if total >= i64::from(limite) {
                return Err(AppError::Validacao(format!(
                    "O plano {} permite no máximo {} usuários.",
                    plano.nome, limite
                )));
            }
        }
        Ok(())
    }

    /// Cria o usuário em duas etapas: identidade (com senha provisória) e
    /// linha em `usuarios`. Se a segunda falhar, a identidade é removida.
    pub async fn criar(
        &self,
        empresa_id: Uuid,
        ator: &AtorEmpresa,
        payload: NovoUsuarioPayload,
    ) -> Result<UsuarioCriado, AppError> {
        let payload = payload.normalizado();
        payload.validate()?;
        exigir_alcance(ator, payload.role_empresa)?;

        let email = payload.email.clone();
        let empresa = self.empresas.buscar_por_id(empresa_id).await?;

        self.verificar_limite_plano(&empresa).await?;

        if !self.verificar_email_unico(&email).await {
            return Err(AppError::EmailAlreadyExists);
        }

        let senha_provisoria = gerar_senha_provisoria();
        let metadata = IdentityMetadata {
            nome_cliente_empresa: Some(empresa.nome.clone()),
            subdominio: Some(empresa.subdominio.clone()),
            senha_provisoria: true,
            empresa_id: Some(empresa.id),
        };

        let identity = self.identity.sign_up(&email, &senha_provisoria, metadata).await?;

        let novo = NovoUsuario {
            id: identity.id,
            nome: payload.nome.trim().to_string(),
            email,
            empresa_id,
            role_empresa: payload.role_empresa,
            telefone: payload.telefone,
            telegram_chat_id: payload.telegram_chat_id,
        };

        let usuario = match self.usuarios.inserir(&novo).await {
            Ok(usuario) => usuario,
            Err(e) => {
                tracing::error!("🔥 Falha ao vincular o usuário {} à empresa: {:?}", novo.email, e);
                desfazer_identidade(self.identity.as_ref(), identity.id).await;
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
                    subdominio: empresa.subdominio.clone(),
                },
            );
        }

        tracing::info!("👤 Usuário {} criado na empresa {}", usuario.email, empresa.subdominio);
        Ok(UsuarioCriado { usuario, senha_provisoria })
    }

    pub async fn atualizar(
        &self,
        empresa_id: Uuid,
        ator: &AtorEmpresa,
        id: Uuid,
        dados: AtualizarUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        let dados = dados.normalizado();
        dados.validate()?;

        let alvo = self.buscar(empresa_id, id).await?;
        exigir_alcance(ator, alvo.role_empresa)?;
        if let Some(role) = dados.role_empresa {
            exigir_alcance(ator, role)?;
        }

        self.usuarios.atualizar(id, &dados).await
    }

    /// Remove o usuário e, em seguida, a identidade dele.
    pub async fn remover(&self, empresa_id: Uuid, ator: &AtorEmpresa, id: Uuid) -> Result<(), AppError> {
        if ator.is_usuario(id) {
            return Err(AppError::Validacao("Você não pode excluir o próprio usuário.".into()));
        }

        let usuario = self.buscar(empresa_id, id).await?;
        exigir_alcance(ator, usuario.role_empresa)?;
        self.usuarios.remover(id).await?;
        desfazer_identidade(self.identity.as_ref(), usuario.id).await;

        tracing::info!("🗑️ Usuário {} removido", usuario.email);
        Ok(())
    }

    /// Troca a senha provisória e marca o primeiro acesso como concluído.
    pub async fn concluir_primeiro_acesso(&self, usuario_id: Uuid, nova_senha: &str) -> Result<Usuario, AppError> {
        let usuario = self.usuarios.buscar_por_id(usuario_id).await?;
        if usuario.primeiro_acesso_concluido {
            return Err(AppError::Validacao("O primeiro acesso já foi concluído.".into()));
        }

        self.identity.update_password(usuario_id, nova_senha).await?;
        self.usuarios.marcar_primeiro_acesso(usuario_id).await
    }
}

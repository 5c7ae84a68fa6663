// src/services/empresa_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::is_unico,
        error::AppError,
        texto::{normalizar_email, Normalizar},
    },
    db::EmpresaStore,
    models::empresa::{AtualizarEmpresaPayload, Empresa, StatusEmpresa},
};

// Subdomínios que pertencem à própria plataforma
const SUBDOMINIOS_RESERVADOS: [&str; 8] = ["www", "api", "app", "admin", "login", "mail", "suporte", "cliente"];

/// Normaliza e valida um subdomínio. Devolve a forma normalizada
/// (minúsculas, sem espaços nas pontas).
pub fn validar_subdominio(subdominio: &str) -> Result<String, AppError> {
    let sub = subdominio.trim().to_lowercase();

    if sub.len() < 3 || sub.len() > 30 {
        return Err(AppError::Validacao(
            "O subdomínio deve ter entre 3 e 30 caracteres.".into(),
        ));
    }
    if !sub.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(AppError::Validacao(
            "O subdomínio só pode conter letras minúsculas, números e hífen.".into(),
        ));
    }
    if sub.starts_with('-') || sub.ends_with('-') {
        return Err(AppError::Validacao(
            "O subdomínio não pode começar nem terminar com hífen.".into(),
        ));
    }
    if SUBDOMINIOS_RESERVADOS.contains(&sub.as_str()) {
        return Err(AppError::Validacao(format!("O subdomínio '{}' é reservado.", sub)));
    }

    Ok(sub)
}

/// `https://{subdominio}.{dominio_base}/{path}`
pub fn url_tenant(subdominio: &str, dominio_base: &str, path: &str) -> String {
    let base = format!("https://{}.{}/", subdominio, dominio_base);
    match url::Url::parse(&base).and_then(|u| u.join(path.trim_start_matches('/'))) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!("URL de tenant inválida para '{}': {}", subdominio, e);
            format!("{}{}", base, path.trim_start_matches('/'))
        }
    }
}

#[derive(Clone)]
pub struct EmpresaService {
    empresas: Arc<dyn EmpresaStore>,
}

impl EmpresaService {
    pub fn new(empresas: Arc<dyn EmpresaStore>) -> Self {
        Self { empresas }
    }

    pub async fn listar(&self) -> Result<Vec<Empresa>, AppError> {
        self.empresas.listar().await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Empresa, AppError> {
        self.empresas.buscar_por_id(id).await
    }

    /// `true` quando nenhuma empresa usa este e-mail.
    pub async fn verificar_email_unico(&self, email: &str) -> bool {
        let email = normalizar_email(email);
        is_unico(self.empresas.buscar_por_email(&email).await, "email", &email)
    }

    /// `true` quando nenhuma empresa usa este subdomínio.
    pub async fn verificar_subdominio_unico(&self, subdominio: &str) -> bool {
        let sub = subdominio.trim().to_lowercase();
        is_unico(self.empresas.buscar_por_subdominio(&sub).await, "subdominio", &sub)
    }

    pub async fn atualizar(&self, id: Uuid, dados: AtualizarEmpresaPayload) -> Result<Empresa, AppError> {
        let mut dados = dados.normalizado();
        dados.validate()?;

        let atual = self.empresas.buscar_por_id(id).await?;

        if let Some(email) = dados.email.take() {
            if email != atual.email && !self.verificar_email_unico(&email).await {
                return Err(AppError::EmailAlreadyExists);
            }
            dados.email = Some(email);
        }

        if let Some(sub) = dados.subdominio.take() {
            let sub = validar_subdominio(&sub)?;
            if sub != atual.subdominio && !self.verificar_subdominio_unico(&sub).await {
                return Err(AppError::SubdominioJaExiste);
            }
            dados.subdominio = Some(sub);
        }

        let empresa = self.empresas.atualizar(id, &dados).await?;
        tracing::info!("✏️ Empresa {} atualizada", empresa.subdominio);
        Ok(empresa)
    }

    pub async fn alterar_status(&self, id: Uuid, status: StatusEmpresa) -> Result<Empresa, AppError> {
        let empresa = self.empresas.alterar_status(id, status).await?;
        tracing::info!("Empresa {} agora está {:?}", empresa.subdominio, empresa.status);
        Ok(empresa)
    }

    /// Exclusão definitiva. `confirmacao` precisa ser igual ao subdomínio.
    pub async fn remover(&self, id: Uuid, confirmacao: &str) -> Result<(), AppError> {
        let empresa = self.empresas.buscar_por_id(id).await?;

        if confirmacao.trim() != empresa.subdominio {
            return Err(AppError::ConfirmacaoInvalida);
        }

        self.empresas.remover(id).await?;
        tracing::warn!("🗑️ Empresa {} ({}) excluída", empresa.nome, empresa.subdominio);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{empresa_exemplo, MemoryStore};

    fn service(store: &Arc<MemoryStore>) -> EmpresaService {
        EmpresaService::new(store.clone())
    }

    #[test]
    fn test_validar_subdominio() {
        assert_eq!(validar_subdominio("  Brilho-Car ").unwrap(), "brilho-car");
        assert!(validar_subdominio("ab").is_err());
        assert!(validar_subdominio("lava_jato").is_err());
        assert!(validar_subdominio("-lava").is_err());
        assert!(validar_subdominio("admin").is_err());
        assert!(validar_subdominio(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_url_tenant() {
        assert_eq!(
            url_tenant("brilho", "agendicar.com.br", "/cliente/agenda"),
            "https://brilho.agendicar.com.br/cliente/agenda"
        );
        assert_eq!(url_tenant("brilho", "agendicar.com.br", ""), "https://brilho.agendicar.com.br/");
    }

    #[tokio::test]
    async fn test_verificar_unicidade() {
        let store = MemoryStore::new();
        empresa_exemplo(&store, "brilho").await;
        let service = service(&store);

        assert!(!service.verificar_subdominio_unico("brilho").await);
        assert!(!service.verificar_subdominio_unico("BRILHO").await);
        assert!(service.verificar_subdominio_unico("espuma").await);
        assert!(!service.verificar_email_unico("contato@brilho.com").await);
        assert!(service.verificar_email_unico("outro@brilho.com").await);
    }

    #[tokio::test]
    async fn test_erro_do_store_nao_conta_como_unico() {
        let store = MemoryStore::new();
        store.simular_falha(true);
        assert!(!service(&store).verificar_email_unico("x@y.com").await);
    }

    #[tokio::test]
    async fn test_atualizar_rejeita_subdominio_em_uso() {
        let store = MemoryStore::new();
        let brilho = empresa_exemplo(&store, "brilho").await;
        empresa_exemplo(&store, "espuma").await;

        let dados = AtualizarEmpresaPayload {
            subdominio: Some("espuma".into()),
            ..Default::default()
        };
        let err = service(&store).atualizar(brilho.id, dados).await.unwrap_err();
        assert!(matches!(err, AppError::SubdominioJaExiste));
    }

    #[tokio::test]
    async fn test_atualizar_mantem_proprio_email() {
        let store = MemoryStore::new();
        let brilho = empresa_exemplo(&store, "brilho").await;

        let dados = AtualizarEmpresaPayload {
            nome: Some("Brilho Car Premium".into()),
            email: Some(brilho.email.clone()),
            ..Default::default()
        };
        let atualizada = service(&store).atualizar(brilho.id, dados).await.unwrap();
        assert_eq!(atualizada.nome, "Brilho Car Premium");
        assert_eq!(atualizada.email, brilho.email);
    }

    #[tokio::test]
    async fn test_remover_exige_confirmacao() {
        let store = MemoryStore::new();
        let brilho = empresa_exemplo(&store, "brilho").await;
        let service = service(&store);

        let err = service.remover(brilho.id, "errado").await.unwrap_err();
        assert!(matches!(err, AppError::ConfirmacaoInvalida));
        assert!(service.buscar(brilho.id).await.is_ok());

        service.remover(brilho.id, "brilho").await.unwrap();
        assert!(matches!(
            service.buscar(brilho.id).await,
            Err(AppError::RegistroNaoEncontrado)
        ));
    }

    #[tokio::test]
    async fn test_alterar_status() {
        let store = MemoryStore::new();
        let brilho = empresa_exemplo(&store, "brilho").await;

        let suspensa = service(&store)
            .alterar_status(brilho.id, StatusEmpresa::Suspenso)
            .await
            .unwrap();
        assert_eq!(suspensa.status, StatusEmpresa::Suspenso);
    }
}

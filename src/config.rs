// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AdministradorRepository, AdministradorStore, AgendaRepository, AgendaStore, CatalogoRepository,
        CatalogoStore, EmpresaRepository, EmpresaStore, UsuarioRepository, UsuarioStore,
    },
    middleware::session::SessionResolver,
    services::{
        identity::MAX_EXPIRACAO_HORAS, AdministradorService, AgendaService, DashboardService,
        EmpresaService, IdentityProvider, OnboardingService, TelegramNotifier, UsuarioService,
    },
};

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub api_host: String,
    pub api_port: u16,
    pub database_max_connections: u32,
    pub jwt_expiracao_horas: i64,
    pub dominio_base: String,
    pub telegram: TelegramConfig,
}

fn obrigatoria<F>(lookup: &F, chave: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(chave)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{} deve ser definida", chave))
}

fn com_padrao<F, T>(lookup: &F, chave: &str, padrao: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(chave) {
        Some(valor) => valor
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ('{}'): {}", chave, valor, e)),
        None => Ok(padrao),
    }
}

fn expiracao_horas<F>(lookup: &F) -> anyhow::Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let horas = com_padrao(lookup, "JWT_EXPIRACAO_HORAS", 168)?;
    if !(1..=MAX_EXPIRACAO_HORAS).contains(&horas) {
        anyhow::bail!(
            "JWT_EXPIRACAO_HORAS deve estar entre 1 e {} (recebido {})",
            MAX_EXPIRACAO_HORAS,
            horas
        );
    }
    Ok(horas)
}

impl Config {
    /// Lê o `.env` (se existir) e as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|chave| env::var(chave).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: obrigatoria(&lookup, "DATABASE_URL")?,
            jwt_secret: obrigatoria(&lookup, "JWT_SECRET")?,
            api_host: com_padrao(&lookup, "API_HOST", "0.0.0.0".to_string())?,
            api_port: com_padrao(&lookup, "API_PORT", 3000)?,
            database_max_connections: com_padrao(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            jwt_expiracao_horas: expiracao_horas(&lookup)?,
            dominio_base: com_padrao(&lookup, "DOMINIO_BASE", "agendicar.com.br".to_string())?,
            telegram: TelegramConfig {
                bot_token: lookup("TELEGRAM_BOT_TOKEN").filter(|t| !t.trim().is_empty()),
                api_url: com_padrao(&lookup, "TELEGRAM_API_URL", "https://api.telegram.org".to_string())?,
                timeout_secs: com_padrao(&lookup, "TELEGRAM_TIMEOUT_SECS", 10)?,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

/// Conecta ao Postgres.
pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

// Os stores usados pelos serviços e pelo resolvedor de sessão
#[derive(Clone)]
pub struct Stores {
    pub empresas: Arc<dyn EmpresaStore>,
    pub usuarios: Arc<dyn UsuarioStore>,
    pub administradores: Arc<dyn AdministradorStore>,
    pub agenda: Arc<dyn AgendaStore>,
    pub catalogo: Arc<dyn CatalogoStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            empresas: Arc::new(EmpresaRepository::new(pool.clone())),
            usuarios: Arc::new(UsuarioRepository::new(pool.clone())),
            administradores: Arc::new(AdministradorRepository::new(pool.clone())),
            agenda: Arc::new(AgendaRepository::new(pool.clone())),
            catalogo: Arc::new(CatalogoRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dominio_base: String,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessoes: SessionResolver,
    pub catalogo: Arc<dyn CatalogoStore>,
    pub empresa_service: EmpresaService,
    pub usuario_service: UsuarioService,
    pub administrador_service: AdministradorService,
    pub onboarding_service: OnboardingService,
    pub agenda_service: AgendaService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(
        stores: Stores,
        identity: Arc<dyn IdentityProvider>,
        notificador: TelegramNotifier,
        dominio_base: String,
    ) -> Self {
        let sessoes = SessionResolver::new(
            identity.clone(),
            stores.usuarios.clone(),
            stores.administradores.clone(),
            stores.empresas.clone(),
        );

        Self {
            empresa_service: EmpresaService::new(stores.empresas.clone()),
            usuario_service: UsuarioService::new(
                stores.usuarios.clone(),
                stores.empresas.clone(),
                stores.catalogo.clone(),
                identity.clone(),
                notificador.clone(),
            ),
            administrador_service: AdministradorService::new(stores.administradores.clone(), identity.clone()),
            onboarding_service: OnboardingService::new(
                stores.empresas.clone(),
                stores.usuarios.clone(),
                stores.catalogo.clone(),
                identity.clone(),
                notificador,
                dominio_base.clone(),
            ),
            agenda_service: AgendaService::new(stores.agenda.clone()),
            dashboard_service: DashboardService::new(stores.empresas.clone(), stores.usuarios.clone()),
            catalogo: stores.catalogo,
            sessoes,
            identity,
            dominio_base,
        }
    }
}

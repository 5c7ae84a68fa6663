//src/main.rs

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use agendicar::{
    app::build_router,
    config::{connect, AppState, Config, Stores},
    db::IdentityRepository,
    services::{identity::spawn_auth_event_logger, PgIdentityProvider, TelegramNotifier},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Sem configuração a aplicação não sobe.
    let config = Config::from_env()?;
    let db_pool = connect(&config).await?;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let identity = Arc::new(PgIdentityProvider::new(
        IdentityRepository::new(db_pool.clone()),
        config.jwt_secret.clone(),
        config.jwt_expiracao_horas,
    ));
    spawn_auth_event_logger(identity.as_ref());

    let notificador = TelegramNotifier::new(&config.telegram, &config.dominio_base)?;
    if !notificador.is_configured() {
        tracing::warn!("TELEGRAM_BOT_TOKEN ausente: credenciais não serão enviadas pelo Telegram");
    }

    let app_state = AppState::new(
        Stores::postgres(db_pool),
        identity,
        notificador,
        config.dominio_base.clone(),
    );
    let app = build_router(app_state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao abrir {}", addr))?;
    tracing::info!("🚀 Servidor escutando em {}", addr);

    axum::serve(listener, app).await.context("Servidor encerrado com erro")?;
    Ok(())
}

// src/services/identity.rs

use async_trait::async_trait;
use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::IdentityRepository,
    models::auth::{AuthEvent, AuthResponse, Claims, Identity, IdentityMetadata},
};

const TAMANHO_SENHA_PROVISORIA: usize = 10;
const CAPACIDADE_EVENTOS: usize = 64;

/// O provedor de identidade: cadastro, login, logout e sessão.
///
/// Os serviços só enxergam este trait; a implementação de produção é
/// [`PgIdentityProvider`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: IdentityMetadata,
    ) -> Result<Identity, AppError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AppError>;

    async fn sign_out(&self, token: &str) -> Result<(), AppError>;

    /// Valida o token e devolve a identidade dona da sessão.
    async fn get_identity(&self, token: &str) -> Result<Identity, AppError>;

    async fn update_password(&self, identity_id: Uuid, new_password: &str) -> Result<Identity, AppError>;

    async fn delete_identity(&self, identity_id: Uuid) -> Result<(), AppError>;

    /// Assina as mudanças de estado de autenticação.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Gera uma senha provisória alfanumérica.
pub fn gerar_senha_provisoria() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TAMANHO_SENHA_PROVISORIA)
        .map(char::from)
        .collect()
}

// Hashing fora do runtime assíncrono
pub(crate) async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub(crate) async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct PgIdentityProvider {
    repo: IdentityRepository,
    jwt_secret: String,
    expiracao: chrono::Duration,
    events: broadcast::Sender<AuthEvent>,
}

/// Validade máxima do token: um ano.
pub const MAX_EXPIRACAO_HORAS: i64 = 24 * 365;

impl PgIdentityProvider {
    pub fn new(repo: IdentityRepository, jwt_secret: String, expiracao_horas: i64) -> Self {
        let (events, _) = broadcast::channel(CAPACIDADE_EVENTOS);
        Self {
            repo,
            jwt_secret,
            expiracao: chrono::Duration::hours(expiracao_horas.clamp(1, MAX_EXPIRACAO_HORAS)),
            events,
        }
    }

    fn create_token(&self, identity_id: Uuid, session_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.expiracao;

        let claims = Claims {
            sub: identity_id,
            sid: session_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }

    fn emit(&self, event: AuthEvent) {
        // Sem assinantes o envio falha; não é um erro para quem chamou.
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: IdentityMetadata,
    ) -> Result<Identity, AppError> {
        let hashed_password = hash_password(password).await?;
        let row = self.repo.create(email, &hashed_password, &metadata).await?;

        tracing::info!("🪪 Identidade criada para {}", row.email);
        Ok(row.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let row = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &row.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let session_id = self
            .repo
            .create_session(row.id, Utc::now() + self.expiracao)
            .await?;
        let token = self.create_token(row.id, session_id)?;

        let identity: Identity = row.into();
        self.emit(AuthEvent::SignedIn(identity.clone()));

        Ok(AuthResponse { token, identity })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        let claims = self.decode_claims(token)?;
        self.repo.revoke_session(claims.sid).await?;
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    async fn get_identity(&self, token: &str) -> Result<Identity, AppError> {
        let claims = self.decode_claims(token)?;

        if !self.repo.session_is_active(claims.sid, claims.sub).await? {
            return Err(AppError::InvalidToken);
        }

        self.repo
            .find_by_id(claims.sub)
            .await?
            .map(Identity::from)
            .ok_or(AppError::InvalidToken)
    }

    async fn update_password(&self, identity_id: Uuid, new_password: &str) -> Result<Identity, AppError> {
        let row = self
            .repo
            .find_by_id(identity_id)
            .await?
            .ok_or(AppError::RegistroNaoEncontrado)?;

        let mut metadata = row.metadata.0;
        metadata.senha_provisoria = false;

        let hashed_password = hash_password(new_password).await?;
        let identity: Identity = self
            .repo
            .update_password(identity_id, &hashed_password, &metadata)
            .await?
            .into();

        self.emit(AuthEvent::UserUpdated(identity.clone()));
        Ok(identity)
    }

    async fn delete_identity(&self, identity_id: Uuid) -> Result<(), AppError> {
        self.repo.delete(identity_id).await
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

/// Compensação de uma etapa que já criou a identidade. Falhas aqui só são
/// registradas: o erro original é o que volta para quem chamou.
pub(crate) async fn desfazer_identidade(provider: &dyn IdentityProvider, identity_id: Uuid) {
    match provider.delete_identity(identity_id).await {
        Ok(()) => tracing::info!("↩️ Identidade {} removida (compensação)", identity_id),
        Err(e) => tracing::error!(
            "🔥 Não foi possível remover a identidade {}: {:?}. Remova manualmente.",
            identity_id,
            e
        ),
    }
}

/// Registra no log todos os eventos de autenticação do provedor.
pub fn spawn_auth_event_logger(provider: &dyn IdentityProvider) -> tokio::task::JoinHandle<()> {
    let mut rx = provider.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(AuthEvent::SignedIn(identity)) => {
                    tracing::info!("🔓 Login: {} ({})", identity.email, identity.id)
                }
                Ok(AuthEvent::SignedOut) => tracing::info!("🔒 Logout de uma sessão"),
                Ok(AuthEvent::UserUpdated(identity)) => {
                    tracing::info!("🔑 Senha atualizada: {}", identity.email)
                }
                Ok(AuthEvent::InitialSession(_)) => {}
                Err(broadcast::error::RecvError::Lagged(perdidos)) => {
                    tracing::warn!("Logger de autenticação perdeu {} eventos", perdidos)
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

// src/services/notificacao.rs
//
// Envio de credenciais pelo bot do Telegram. Sempre "dispara e esquece":
// falhas viram `false` e só aparecem no log.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{common::error::AppError, config::TelegramConfig, services::empresa_service::url_tenant};

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

// O que vai na mensagem de boas-vindas
#[derive(Debug, Clone)]
pub struct Credenciais {
    pub nome: String,
    pub email: String,
    pub senha_provisoria: String,
    pub subdominio: String,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    bot_token: Option<String>,
    dominio_base: String,
}

/// Aceita ids numéricos (grupos começam com `-`) ou `@canal`.
pub fn is_chat_id_valido(chat_id: &str) -> bool {
    let chat_id = chat_id.trim();

    if let Some(nome) = chat_id.strip_prefix('@') {
        return (5..=32).contains(&nome.len())
            && nome.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    }

    let digitos = chat_id.strip_prefix('-').unwrap_or(chat_id);
    (1..=20).contains(&digitos.len()) && digitos.chars().all(|c| c.is_ascii_digit())
}

pub fn escape_html(texto: &str) -> String {
    texto
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, dominio_base: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Falha ao criar o cliente HTTP do Telegram: {}", e))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone().filter(|t| !t.trim().is_empty()),
            dominio_base: dominio_base.to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some()
    }

    pub fn formatar_credenciais(&self, credenciais: &Credenciais) -> String {
        let url_login = url_tenant(&credenciais.subdominio, &self.dominio_base, "login");
        format!(
            "🚗 <b>Bem-vindo ao AgendiCar!</b>\n\n\
             Olá, {}! Seu acesso foi criado.\n\n\
             <b>E-mail:</b> <code>{}</code>\n\
             <b>Senha provisória:</b> <code>{}</code>\n\n\
             Acesse: {}\n\n\
             No primeiro acesso você deverá definir uma nova senha.",
            escape_html(&credenciais.nome),
            escape_html(&credenciais.email),
            escape_html(&credenciais.senha_provisoria),
            url_login,
        )
    }

    /// Envia `texto` para o chat. Nunca entra em pânico: qualquer falha
    /// devolve `false`.
    pub async fn enviar_mensagem(&self, chat_id: &str, texto: &str) -> bool {
        let Some(token) = &self.bot_token else {
            tracing::warn!("Telegram não configurado (TELEGRAM_BOT_TOKEN ausente)");
            return false;
        };

        if !is_chat_id_valido(chat_id) {
            tracing::warn!("Chat id do Telegram inválido: {:?}", chat_id);
            return false;
        }

        let url = format!("{}/bot{}/sendMessage", self.api_url, token);
        let body = SendMessageBody {
            chat_id: chat_id.trim(),
            text: texto,
            parse_mode: "HTML",
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("🔥 Falha ao chamar a API do Telegram: {}", e);
                return false;
            }
        };

        match response.json::<TelegramResponse>().await {
            Ok(TelegramResponse { ok: true, .. }) => {
                tracing::info!("📨 Mensagem enviada ao Telegram (chat {})", chat_id.trim());
                true
            }
            Ok(TelegramResponse { error_code, description, .. }) => {
                tracing::warn!(
                    "Telegram recusou a mensagem: {:?} {}",
                    error_code,
                    description.unwrap_or_default()
                );
                false
            }
            Err(e) => {
                tracing::error!("🔥 Resposta inválida da API do Telegram: {}", e);
                false
            }
        }
    }

    pub async fn enviar_credenciais(&self, chat_id: &str, credenciais: &Credenciais) -> bool {
        let texto = self.formatar_credenciais(credenciais);
        self.enviar_mensagem(chat_id, &texto).await
    }

    /// Dispara o envio numa task separada; quem chama não espera.
    pub fn enviar_credenciais_em_segundo_plano(&self, chat_id: String, credenciais: Credenciais) {
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier.enviar_credenciais(&chat_id, &credenciais).await;
        });
    }
}

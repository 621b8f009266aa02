//! Notificações transaccionais
//!
//! O envio de e-mail é um colaborador externo fire-and-forget: uma transição
//! de estado já confirmada nunca é revertida nem falha por causa de um
//! e-mail — falhas de envio são apenas registadas no log.

mod email;

pub use email::EmailNotifier;

use async_trait::async_trait;
use shared::order::{Order, OrderState};
use std::sync::Arc;

use crate::core::Config;
use crate::utils::AppResult;

/// Colaborador de notificações (injectado via ServerState)
#[async_trait]
pub trait Notifier: Send + Sync {
    /// E-mail de resumo de uma mudança de estado (antes → depois)
    async fn send_state_change_email(
        &self,
        to: &str,
        order: &Order,
        de: OrderState,
        para: OrderState,
        nota: Option<&str>,
    ) -> AppResult<()>;

    /// E-mail de confirmação de nova encomenda (dados bancários incluídos)
    async fn send_order_confirmation(&self, to: &str, order: &Order) -> AppResult<()>;
}

/// Implementação nula — regista no log e mais nada.
/// Usada quando o serviço de e-mail não está configurado e nos testes.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_state_change_email(
        &self,
        to: &str,
        order: &Order,
        de: OrderState,
        para: OrderState,
        _nota: Option<&str>,
    ) -> AppResult<()> {
        tracing::info!(
            to = %to,
            numero = %order.numero,
            de = %de,
            para = %para,
            "E-mail service not configured, skipping state change e-mail"
        );
        Ok(())
    }

    async fn send_order_confirmation(&self, to: &str, order: &Order) -> AppResult<()> {
        tracing::info!(
            to = %to,
            numero = %order.numero,
            "E-mail service not configured, skipping confirmation e-mail"
        );
        Ok(())
    }
}

/// Constrói o notifier a partir da configuração
pub fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    match (&config.email_api_url, &config.email_api_key) {
        (Some(url), Some(key)) => Arc::new(EmailNotifier::new(
            url.clone(),
            key.clone(),
            config.email_from.clone(),
        )),
        _ => {
            tracing::warn!("EMAIL_API_URL/EMAIL_API_KEY not set, e-mails disabled");
            Arc::new(NoopNotifier)
        }
    }
}

/// Dispara o e-mail de mudança de estado em background (fire-and-forget)
pub fn spawn_state_change_email(
    notifier: Arc<dyn Notifier>,
    to: String,
    order: Order,
    de: OrderState,
    para: OrderState,
    nota: Option<String>,
) {
    tokio::spawn(async move {
        if let Err(e) = notifier
            .send_state_change_email(&to, &order, de, para, nota.as_deref())
            .await
        {
            // Nunca propaga: a transição já está confirmada
            tracing::warn!(
                numero = %order.numero,
                error = %e,
                "State change e-mail dispatch failed"
            );
        }
    });
}

/// Dispara o e-mail de confirmação de encomenda em background
pub fn spawn_order_confirmation(notifier: Arc<dyn Notifier>, to: String, order: Order) {
    tokio::spawn(async move {
        if let Err(e) = notifier.send_order_confirmation(&to, &order).await {
            tracing::warn!(
                numero = %order.numero,
                error = %e,
                "Confirmation e-mail dispatch failed"
            );
        }
    });
}

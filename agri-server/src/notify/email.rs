//! E-mail transaccional via API HTTP
//!
//! Envia JSON para o endpoint do provedor configurado (EMAIL_API_URL), com
//! autenticação Bearer. Os textos vão em português — é o idioma dos clientes.

use async_trait::async_trait;
use serde::Serialize;
use shared::error::ErrorCode;
use shared::order::{Order, OrderState};
use std::time::Duration;

use super::Notifier;
use crate::utils::{AppError, AppResult};

/// Timeout de cada pedido ao provedor
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: String,
    text: String,
}

/// Notifier que envia e-mails através de uma API HTTP de e-mail transaccional
pub struct EmailNotifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl EmailNotifier {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("reqwest client must build");
        Self {
            client,
            api_url,
            api_key,
            from,
        }
    }

    async fn send(&self, to: &str, subject: String, text: String) -> AppResult<()> {
        let payload = OutgoingEmail {
            from: &self.from,
            to,
            subject,
            text,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(ErrorCode::EmailDispatchFailed, e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(AppError::with_message(
                ErrorCode::EmailDispatchFailed,
                format!("E-mail provider returned {}", response.status()),
            ));
        }

        Ok(())
    }
}

/// Assunto e primeira linha por estado de destino
fn state_change_copy(order: &Order, para: OrderState) -> (String, String) {
    let numero = &order.numero;
    match para {
        OrderState::Pago => (
            format!("Pagamento confirmado — {numero}"),
            format!("O pagamento da sua encomenda {numero} foi confirmado. Obrigado!"),
        ),
        OrderState::EmPreparacao => (
            format!("Encomenda em preparação — {numero}"),
            format!("A sua encomenda {numero} está a ser preparada pelos nossos produtores."),
        ),
        OrderState::EmTransito => (
            format!("Encomenda a caminho — {numero}"),
            format!("A sua encomenda {numero} saiu para entrega."),
        ),
        OrderState::Entregue => (
            format!("Encomenda entregue — {numero}"),
            format!("A sua encomenda {numero} foi entregue. Bom proveito!"),
        ),
        OrderState::Cancelado => (
            format!("Encomenda cancelada — {numero}"),
            format!("A sua encomenda {numero} foi cancelada."),
        ),
        OrderState::Pendente => (
            format!("Encomenda actualizada — {numero}"),
            format!("A sua encomenda {numero} voltou ao estado pendente."),
        ),
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_state_change_email(
        &self,
        to: &str,
        order: &Order,
        de: OrderState,
        para: OrderState,
        nota: Option<&str>,
    ) -> AppResult<()> {
        let (subject, lead) = state_change_copy(order, para);

        let mut text = format!(
            "{lead}\n\nEstado anterior: {de}\nEstado actual: {para}\nTotal: {:.2} Kz\n",
            order.total
        );
        if let Some(nota) = nota {
            text.push_str(&format!("\nNota: {nota}\n"));
        }
        text.push_str("\nAgriConecta — do campo para a sua mesa.\n");

        self.send(to, subject, text).await?;
        tracing::info!(to = %to, numero = %order.numero, para = %para, "State change e-mail sent");
        Ok(())
    }

    async fn send_order_confirmation(&self, to: &str, order: &Order) -> AppResult<()> {
        let subject = format!("Recebemos a sua encomenda — {}", order.numero);
        let text = format!(
            "Recebemos a sua encomenda {}.\n\nTotal a pagar: {:.2} Kz\n\nPara concluir, efectue a transferência bancária e envie o comprovativo pelo WhatsApp. A encomenda segue para preparação assim que o pagamento for confirmado.\n\nAgriConecta — do campo para a sua mesa.\n",
            order.numero, order.total
        );

        self.send(to, subject, text).await?;
        tracing::info!(to = %to, numero = %order.numero, "Confirmation e-mail sent");
        Ok(())
    }
}

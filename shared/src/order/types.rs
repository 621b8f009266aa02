//! Tipos do domínio de encomendas
//!
//! O estado de uma encomenda avança sempre em frente:
//!
//! ```text
//! PENDENTE → PAGO → EM_PREPARACAO → EM_TRANSITO → ENTREGUE
//!     └────────┴──────────┴─────────────┴──→ CANCELADO
//! ```
//!
//! `ENTREGUE` e `CANCELADO` são terminais. O grafo de transições é explícito
//! ([`OrderState::allowed_next`]); saltos fora do grafo só são aceites quando
//! a política de rollback administrativo está ligada (ver agri-server).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actor usado nas entradas de histórico geradas pelo próprio servidor
pub const SYSTEM_ACTOR: &str = "sistema";

/// Estado de uma encomenda (contrato de wire: os seis literais exactos)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderState {
    Pendente,
    Pago,
    EmPreparacao,
    EmTransito,
    Entregue,
    Cancelado,
}

/// Todos os estados, na ordem do fluxo normal
pub const ALL_STATES: &[OrderState] = &[
    OrderState::Pendente,
    OrderState::Pago,
    OrderState::EmPreparacao,
    OrderState::EmTransito,
    OrderState::Entregue,
    OrderState::Cancelado,
];

impl OrderState {
    /// Literal usado na API e na base de dados
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderState::Pendente => "PENDENTE",
            OrderState::Pago => "PAGO",
            OrderState::EmPreparacao => "EM_PREPARACAO",
            OrderState::EmTransito => "EM_TRANSITO",
            OrderState::Entregue => "ENTREGUE",
            OrderState::Cancelado => "CANCELADO",
        }
    }

    /// Estados alcançáveis a partir deste no fluxo normal
    ///
    /// Cancelamento é a saída de emergência de qualquer estado não terminal.
    pub const fn allowed_next(&self) -> &'static [OrderState] {
        match self {
            OrderState::Pendente => &[OrderState::Pago, OrderState::Cancelado],
            OrderState::Pago => &[OrderState::EmPreparacao, OrderState::Cancelado],
            OrderState::EmPreparacao => &[OrderState::EmTransito, OrderState::Cancelado],
            OrderState::EmTransito => &[OrderState::Entregue, OrderState::Cancelado],
            OrderState::Entregue => &[],
            OrderState::Cancelado => &[],
        }
    }

    /// Transição permitida pelo grafo?
    pub fn can_transition_to(&self, target: OrderState) -> bool {
        self.allowed_next().contains(&target)
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Entregue | OrderState::Cancelado)
    }

    /// Coluna de timestamp de ciclo de vida correspondente a este estado
    ///
    /// `PENDENTE` não tem coluna própria — é o `criado_em` da encomenda.
    pub const fn timestamp_column(&self) -> Option<&'static str> {
        match self {
            OrderState::Pendente => None,
            OrderState::Pago => Some("pago_em"),
            OrderState::EmPreparacao => Some("em_preparacao_em"),
            OrderState::EmTransito => Some("em_transito_em"),
            OrderState::Entregue => Some("entregue_em"),
            OrderState::Cancelado => Some("cancelado_em"),
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Erro de conversão para literais fora do enum de estados
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order state: {0}")]
pub struct OrderStateError(pub String);

impl FromStr for OrderState {
    type Err = OrderStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDENTE" => Ok(OrderState::Pendente),
            "PAGO" => Ok(OrderState::Pago),
            "EM_PREPARACAO" => Ok(OrderState::EmPreparacao),
            "EM_TRANSITO" => Ok(OrderState::EmTransito),
            "ENTREGUE" => Ok(OrderState::Entregue),
            "CANCELADO" => Ok(OrderState::Cancelado),
            other => Err(OrderStateError(other.to_string())),
        }
    }
}

// =============================================================================
// Entidades
// =============================================================================

/// Encomenda (linha da tabela `encomenda`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Número sequencial legível: `AGC-<ano>-<5 dígitos>`
    pub numero: String,
    pub utilizador_id: i64,
    pub estado: OrderState,
    pub subtotal: f64,
    pub taxa_entrega: f64,
    pub desconto: f64,
    /// Invariante: `total == subtotal + taxa_entrega - desconto`
    pub total: f64,
    pub endereco_entrega: Option<String>,
    pub nota: Option<String>,
    // Timestamps de ciclo de vida — cada um é escrito no máximo uma vez
    pub pago_em: Option<i64>,
    pub em_preparacao_em: Option<i64>,
    pub em_transito_em: Option<i64>,
    pub entregue_em: Option<i64>,
    pub cancelado_em: Option<i64>,
    /// Contador de concorrência optimista — incrementado a cada transição
    pub version: i64,
    pub criado_em: i64,
    pub atualizado_em: i64,
}

/// Linha de uma encomenda (tabela `encomenda_item`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub encomenda_id: i64,
    pub produto_id: i64,
    /// Nome do produto no momento da compra (imutável)
    pub nome: String,
    pub quantidade: i64,
    pub preco_unitario: f64,
    /// `quantidade * preco_unitario`, arredondado a 2 casas
    pub subtotal: f64,
}

/// Entrada imutável do histórico (tabela `encomenda_historico`)
///
/// Criada exactamente uma vez por transição aplicada; nunca alterada nem
/// removida. O `estado` da encomenda é sempre o da entrada mais recente.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderHistoryEntry {
    pub id: i64,
    pub encomenda_id: i64,
    pub estado: OrderState,
    pub nota: Option<String>,
    /// Id do utilizador que causou a transição, ou `"sistema"`
    pub actor: String,
    pub criado_em: i64,
}

/// Encomenda completa devolvida pela API (linha + itens + histórico)
///
/// O histórico vem ordenado do mais recente para o mais antigo (ordem de
/// apresentação); a ordem canónica de armazenamento é a de inserção.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub encomenda: Order,
    pub itens: Vec<OrderItem>,
    pub historico: Vec<OrderHistoryEntry>,
}

// =============================================================================
// Payloads da API
// =============================================================================

/// Item do carrinho no checkout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub produto_id: i64,
    pub quantidade: i64,
}

/// Checkout payload (POST /api/encomendas)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub itens: Vec<OrderItemInput>,
    pub endereco_entrega: Option<String>,
    pub nota: Option<String>,
}

/// State change payload (PATCH /api/encomendas/{id}/estado)
///
/// `estado` chega como string crua: literais fora do enum devem produzir um
/// erro de validação do domínio, não uma rejeição opaca do deserializador.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStateChange {
    pub estado: String,
    pub nota: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_literals_roundtrip() {
        for state in ALL_STATES {
            assert_eq!(state.as_str().parse::<OrderState>(), Ok(*state));
            let json = serde_json::to_string(state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }

    #[test]
    fn test_unknown_literal_rejected() {
        assert!("ENVIADO".parse::<OrderState>().is_err());
        assert!("pago".parse::<OrderState>().is_err());
        assert!(serde_json::from_str::<OrderState>("\"FINALIZADO\"").is_err());
    }

    #[test]
    fn test_terminal_states_have_no_successors() {
        assert!(OrderState::Entregue.allowed_next().is_empty());
        assert!(OrderState::Cancelado.allowed_next().is_empty());
        assert!(OrderState::Entregue.is_terminal());
        assert!(OrderState::Cancelado.is_terminal());
    }

    #[test]
    fn test_cancel_reachable_from_every_non_terminal() {
        for state in ALL_STATES.iter().filter(|s| !s.is_terminal()) {
            assert!(
                state.can_transition_to(OrderState::Cancelado),
                "{state} must allow cancellation"
            );
        }
    }

    #[test]
    fn test_no_backward_or_skip_edges() {
        assert!(!OrderState::Pendente.can_transition_to(OrderState::Entregue));
        assert!(!OrderState::Pago.can_transition_to(OrderState::Pendente));
        assert!(!OrderState::Entregue.can_transition_to(OrderState::Pendente));
        assert!(!OrderState::Cancelado.can_transition_to(OrderState::Pago));
    }

    #[test]
    fn test_timestamp_columns() {
        assert_eq!(OrderState::Pendente.timestamp_column(), None);
        assert_eq!(OrderState::Pago.timestamp_column(), Some("pago_em"));
        assert_eq!(
            OrderState::Cancelado.timestamp_column(),
            Some("cancelado_em")
        );
    }
}

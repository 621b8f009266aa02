//! Ciclo de vida das encomendas
//!
//! Este módulo decide transições de estado; a aplicação do plano à base de
//! dados fica no repositório (`db::repository::order::apply_transition`).
//!
//! # Fluxo de uma transição
//!
//! ```text
//! plan_transition(encomenda, novo_estado, nota, actor)
//!     ├─ 1. Idempotência (novo == actual → no-op, sem histórico novo)
//!     ├─ 2. Legalidade (grafo explícito; rollback só com política ligada)
//!     ├─ 3. Timestamp de ciclo de vida (escrito no máximo uma vez)
//!     └─ 4. Exactamente uma entrada nova de histórico
//! ```
//!
//! Invariantes garantidos ao aplicar o plano:
//! - o `estado` da encomenda é sempre o da última entrada do histórico;
//! - o histórico só cresce (append-only);
//! - cada timestamp de ciclo de vida é escrito no máximo uma vez.

use shared::error::ErrorCode;
use shared::order::{Order, OrderState};
use shared::util::now_millis;

use crate::utils::{AppError, AppResult};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Política de transições
///
/// O fluxo normal segue o grafo explícito de [`OrderState::allowed_next`].
/// `allow_rollback` admite também saltos administrativos entre estados não
/// terminais (correcções manuais de operadores); desligado por omissão.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionPolicy {
    pub allow_rollback: bool,
}

impl TransitionPolicy {
    pub fn new(allow_rollback: bool) -> Self {
        Self { allow_rollback }
    }

    /// A transição `de → para` é admissível sob esta política?
    pub fn permits(&self, de: OrderState, para: OrderState) -> bool {
        if de.can_transition_to(para) {
            return true;
        }
        // Rollback administrativo: qualquer salto a partir de estado não
        // terminal, incluindo reabrir para trás. Estados terminais continuam
        // fechados mesmo com a política ligada.
        self.allow_rollback && !de.is_terminal()
    }
}

/// Nova entrada de histórico a inserir com a transição
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub estado: OrderState,
    pub nota: Option<String>,
    pub actor: String,
    pub criado_em: i64,
}

/// Plano de uma transição validada, pronto a aplicar numa transacção
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub de: OrderState,
    pub para: OrderState,
    /// Coluna de timestamp a estampar, se ainda não estiver preenchida
    pub stamp_column: Option<&'static str>,
    pub stamp_value: i64,
    pub historico: NewHistoryEntry,
    /// Version esperada da encomenda (controlo de concorrência optimista)
    pub expected_version: i64,
}

/// Valor actual do timestamp de ciclo de vida associado a um estado
fn lifecycle_stamp(order: &Order, state: OrderState) -> Option<i64> {
    match state {
        OrderState::Pendente => Some(order.criado_em),
        OrderState::Pago => order.pago_em,
        OrderState::EmPreparacao => order.em_preparacao_em,
        OrderState::EmTransito => order.em_transito_em,
        OrderState::Entregue => order.entregue_em,
        OrderState::Cancelado => order.cancelado_em,
    }
}

/// Decide uma transição de estado
///
/// Devolve:
/// - `Ok(None)` — no-op idempotente (`novo_estado == estado actual`); não há
///   entrada de histórico nem timestamp novos;
/// - `Ok(Some(plan))` — transição validada, por aplicar;
/// - `Err` — transição ilegal ou nota inválida; nada foi mutado.
pub fn plan_transition(
    policy: TransitionPolicy,
    order: &Order,
    novo_estado: OrderState,
    nota: Option<String>,
    actor: &str,
) -> AppResult<Option<TransitionPlan>> {
    validate_optional_text(&nota, "nota", MAX_NOTE_LEN)?;

    // Idempotência: aplicar o mesmo estado duas vezes não duplica histórico
    if novo_estado == order.estado {
        return Ok(None);
    }

    if !policy.permits(order.estado, novo_estado) {
        return Err(AppError::with_message(
            ErrorCode::IllegalTransition,
            format!(
                "Transition {} -> {} is not allowed",
                order.estado, novo_estado
            ),
        )
        .with_detail("de", order.estado.as_str())
        .with_detail("para", novo_estado.as_str()));
    }

    let agora = now_millis();

    // Timestamp só na primeira passagem pelo estado (rollbacks não reescrevem)
    let stamp_column = match novo_estado.timestamp_column() {
        Some(col) if lifecycle_stamp(order, novo_estado).is_none() => Some(col),
        _ => None,
    };

    Ok(Some(TransitionPlan {
        de: order.estado,
        para: novo_estado,
        stamp_column,
        stamp_value: agora,
        historico: NewHistoryEntry {
            estado: novo_estado,
            nota,
            actor: actor.to_string(),
            criado_em: agora,
        },
        expected_version: order.version,
    }))
}

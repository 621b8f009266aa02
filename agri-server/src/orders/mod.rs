//! Núcleo do domínio de encomendas
//!
//! - [`lifecycle`] - decisão de transições de estado (grafo + idempotência)
//! - [`number`] - numeração sequencial `AGC-<ano>-<NNNNN>`
//! - [`totals`] - aritmética monetária (`total = subtotal + taxa - desconto`)
//!
//! A persistência das decisões fica em `db::repository::order`.

pub mod lifecycle;
pub mod number;
pub mod totals;

pub use lifecycle::{NewHistoryEntry, TransitionPlan, TransitionPolicy, plan_transition};

#[cfg(test)]
mod tests;

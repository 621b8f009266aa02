//! Tipos partilhados do AgriConecta
//!
//! Tipos comuns usados pelo servidor HTTP e pelos clientes da API:
//! modelos de dados, sistema de erros unificado e utilitários.

pub mod error;
pub mod models;
pub mod order;
pub mod types;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Role, has_role, is_valid_role};
pub use order::{OrderState, OrderStateError};

//! Módulo de utilitários — funções e tipos transversais
//!
//! # Conteúdo
//!
//! - [`AppError`] / [`ApiResponse`] - sistema de erros (re-export de shared::error)
//! - [`logger`] - infraestrutura de logging
//! - [`time`] - conversões de data no fuso horário do negócio
//! - [`validation`] - limites e validações de texto

pub mod logger;
pub mod time;
pub mod validation;

// Re-export error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use axum::Json;
use serde::Serialize;

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

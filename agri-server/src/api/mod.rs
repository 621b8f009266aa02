//! Módulo de rotas da API
//!
//! # Estrutura
//!
//! - [`health`] - verificação de saúde
//! - [`auth`] - registo, login e perfil
//! - [`categories`] - gestão de categorias
//! - [`products`] - gestão de produtos
//! - [`orders`] - encomendas e ciclo de vida
//! - [`users`] - gestão de utilizadores e papéis
//! - [`reports`] - métricas do dashboard

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

//! Módulo core — configuração, estado e servidor HTTP
//!
//! # Estrutura
//!
//! - [`Config`] - configuração do servidor
//! - [`ServerState`] - estado partilhado (pool, JWT, notifier)
//! - [`Server`] - servidor HTTP
//! - [`ServerError`] - erros de arranque

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{Server, build_app};
pub use state::ServerState;

//! AgriConecta Server - backend do marketplace agrícola
//!
//! # Visão geral
//!
//! Backend HTTP que liga produtores angolanos a consumidores urbanos:
//!
//! - **Catálogo** (`api/produtos`, `api/categorias`): leitura pública,
//!   gestão reservada a STAFF+
//! - **Encomendas** (`api/encomendas`): checkout, ciclo de vida com grafo de
//!   estados explícito e histórico append-only
//! - **Autenticação** (`auth`): JWT + Argon2, hierarquia fixa de papéis
//! - **Notificações** (`notify`): e-mail transaccional fire-and-forget
//! - **Relatórios** (`api/relatorios`): métricas do dashboard
//!
//! # Estrutura de módulos
//!
//! ```text
//! agri-server/src/
//! ├── core/          # Configuração, estado, servidor HTTP
//! ├── auth/          # JWT, passwords, papéis e permissões
//! ├── api/           # Rotas e handlers HTTP
//! ├── db/            # Pool SQLite e repositórios
//! ├── orders/        # Ciclo de vida, numeração e totais
//! ├── notify/        # Colaborador de e-mail
//! └── utils/         # Logging, tempo, validação
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod utils;

// Re-export de tipos públicos
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::TransitionPolicy;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - com suporte para pares chave/valor do tracing
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Prepara o ambiente de execução: .env + logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ___            _ ______                      __
   /   | ____ _____(_) ____/___  ____  ___  _____/ /_____ _
  / /| |/ __ `/ ___/ / /   / __ \/ __ \/ _ \/ ___/ __/ __ `/
 / ___ / /_/ / /  / / /___/ /_/ / / / /  __/ /__/ /_/ /_/ /
/_/  |_\__, /_/  /_/\____/\____/_/ /_/\___/\___/\__/\__,_/
      /____/
    "#
    );
}

use thiserror::Error;

/// Erros do arranque e execução do servidor HTTP
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuração inválida: {0}")]
    Config(String),

    #[error("erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("erro interno do servidor")]
    Internal(#[from] anyhow::Error),
}

/// Result do arranque do servidor
pub type Result<T> = std::result::Result<T, ServerError>;

use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::time::DEFAULT_TZ;

/// Configuração do servidor — todos os itens configuráveis do backend
///
/// # Variáveis de ambiente
///
/// Todos os itens podem ser definidos por variável de ambiente:
///
/// | Variável | Omissão | Descrição |
/// |----------|---------|-----------|
/// | WORK_DIR | /var/lib/agriconecta | Directório de trabalho (BD, logs) |
/// | HTTP_PORT | 3000 | Porta do serviço HTTP |
/// | ENVIRONMENT | development | Ambiente de execução |
/// | REQUEST_TIMEOUT_MS | 30000 | Timeout por pedido (ms) |
/// | BUSINESS_TIMEZONE | Africa/Luanda | Fuso horário do negócio |
/// | TAXA_ENTREGA_PADRAO | 0 | Taxa de entrega por omissão (Kz) |
/// | ORDERS_ALLOW_ROLLBACK | false | Permitir rollback administrativo de estados |
/// | EMAIL_API_URL | — | Endpoint do provedor de e-mail |
/// | EMAIL_API_KEY | — | Chave do provedor de e-mail |
/// | EMAIL_FROM | AgriConecta <pedidos@agriconecta.ao> | Remetente |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | — | Bootstrap do SUPER_ADMIN inicial |
///
/// # Exemplo
///
/// ```ignore
/// WORK_DIR=/data/agriconecta HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directório de trabalho (base de dados, logs)
    pub work_dir: String,
    /// Porta do serviço HTTP
    pub http_port: u16,
    /// Configuração JWT
    pub jwt: JwtConfig,
    /// Ambiente: development | staging | production
    pub environment: String,
    /// Timeout por pedido (ms)
    pub request_timeout_ms: u64,
    /// Fuso horário do negócio (numeração anual, relatórios)
    pub business_timezone: String,
    /// Taxa de entrega aplicada a novas encomendas (Kz)
    pub taxa_entrega_padrao: f64,
    /// Permite saltos administrativos fora do grafo de transições
    /// (correcções manuais de operadores). Desligado por omissão.
    pub orders_allow_rollback: bool,

    // === E-mail transaccional ===
    pub email_api_url: Option<String>,
    pub email_api_key: Option<String>,
    pub email_from: String,

    // === Bootstrap do administrador inicial ===
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Carrega a configuração das variáveis de ambiente
    ///
    /// Variáveis não definidas usam o valor por omissão
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/agriconecta".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            business_timezone: std::env::var("BUSINESS_TIMEZONE")
                .unwrap_or_else(|_| DEFAULT_TZ.into()),
            taxa_entrega_padrao: std::env::var("TAXA_ENTREGA_PADRAO")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(0.0),
            orders_allow_rollback: std::env::var("ORDERS_ALLOW_ROLLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            email_api_url: std::env::var("EMAIL_API_URL").ok(),
            email_api_key: std::env::var("EMAIL_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "AgriConecta <pedidos@agriconecta.ao>".into()),
            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// Configuração com overrides — usada nos testes
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Garante a estrutura do directório de trabalho
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// Directório da base de dados
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Caminho do ficheiro da base de dados
    pub fn database_path(&self) -> PathBuf {
        std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| self.database_dir().join("agriconecta.db"))
    }

    /// Directório dos logs
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// É ambiente de produção?
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// É ambiente de desenvolvimento?
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

use std::sync::Arc;

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{Notifier, build_notifier};
use crate::orders::TransitionPolicy;
use crate::utils::time::parse_tz;

/// Estado do servidor — referências partilhadas de todos os serviços
///
/// Todos os colaboradores (pool, JWT, notifier) são injectados aqui em vez
/// de viverem como singletons de módulo: os handlers recebem tudo através
/// do `State` do axum, e os testes substituem o que precisarem.
///
/// | Campo | Tipo | Descrição |
/// |-------|------|-----------|
/// | config | Config | Configuração (imutável) |
/// | db | SqlitePool | Pool SQLite |
/// | jwt_service | Arc<JwtService> | Serviço de tokens |
/// | notifier | Arc<dyn Notifier> | E-mail transaccional |
#[derive(Clone)]
pub struct ServerState {
    /// Configuração do servidor
    pub config: Config,
    /// Pool da base de dados (clone barato, partilha interna)
    pub db: SqlitePool,
    /// Serviço JWT
    pub jwt_service: Arc<JwtService>,
    /// Colaborador de notificações
    pub notifier: Arc<dyn Notifier>,
}

impl ServerState {
    /// Constrói o estado manualmente (os testes usam isto para injectar mocks)
    pub fn new(
        config: Config,
        db: SqlitePool,
        jwt_service: Arc<JwtService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            notifier,
        }
    }

    /// Inicializa o estado do servidor
    ///
    /// Por ordem:
    /// 1. Estrutura do directório de trabalho
    /// 2. Base de dados (work_dir/database/agriconecta.db) + migrações
    /// 3. Bootstrap do SUPER_ADMIN inicial (primeiro arranque)
    /// 4. Serviços (JWT, notifier)
    ///
    /// # Panics
    ///
    /// Falha de inicialização da base de dados é fatal
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        db_service
            .ensure_default_admin(
                config.admin_email.as_deref(),
                config.admin_password.as_deref(),
            )
            .await
            .expect("Failed to bootstrap admin account");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let notifier = build_notifier(config);

        Self::new(config.clone(), db_service.pool, jwt_service, notifier)
    }

    /// Serviço JWT
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Fuso horário do negócio
    pub fn business_tz(&self) -> Tz {
        parse_tz(&self.config.business_timezone)
    }

    /// Política de transições do ciclo de vida das encomendas
    pub fn transition_policy(&self) -> TransitionPolicy {
        TransitionPolicy::new(self.config.orders_allow_rollback)
    }
}

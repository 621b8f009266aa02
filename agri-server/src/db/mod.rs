//! Database Module
//!
//! Handles SQLite connection pool and migrations

pub mod repository;

use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: espera até 5s em conflitos de escrita em vez de falhar logo
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        // Run migrations (ignore previously applied but now removed migrations)
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Provisiona o SUPER_ADMIN inicial se a tabela de utilizadores não tiver
    /// nenhum (primeiro arranque). Credenciais vêm de ADMIN_EMAIL/ADMIN_PASSWORD.
    pub async fn ensure_default_admin(
        &self,
        admin_email: Option<&str>,
        admin_password: Option<&str>,
    ) -> Result<(), AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM utilizador WHERE role = ?")
            .bind(shared::models::Role::SuperAdmin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if count > 0 {
            return Ok(());
        }

        let (email, password) = match (admin_email, admin_password) {
            (Some(e), Some(p)) => (e, p),
            _ => {
                tracing::warn!(
                    "No SUPER_ADMIN account exists and ADMIN_EMAIL/ADMIN_PASSWORD are not set"
                );
                return Ok(());
            }
        };

        let hash = crate::auth::password::hash_password(password)?;
        let agora = shared::util::now_millis();
        let id = shared::util::snowflake_id();

        sqlx::query(
            "INSERT INTO utilizador (id, nome, email, telefone, password_hash, role, is_active, criado_em, atualizado_em) VALUES (?, ?, ?, NULL, ?, ?, 1, ?, ?)",
        )
        .bind(id)
        .bind("Administrador")
        .bind(email)
        .bind(&hash)
        .bind(shared::models::Role::SuperAdmin)
        .bind(agora)
        .bind(agora)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to bootstrap admin: {e}")))?;

        tracing::info!(email = %email, "Bootstrapped initial SUPER_ADMIN account");
        Ok(())
    }
}

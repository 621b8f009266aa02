//! User Repository

use super::{RepoError, RepoResult, is_unique_violation};
use shared::error::ErrorCode;
use shared::models::{Role, User, UserUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, nome, email, telefone, password_hash, role, is_active, criado_em, atualizado_em FROM utilizador";

pub async fn find_all(pool: &SqlitePool, limit: u32, offset: u32) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY criado_em DESC LIMIT ? OFFSET ?");
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM utilizador")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE email = ? LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Cria um utilizador. O papel inicial é sempre CUSTOMER excepto no
/// bootstrap do administrador (ver `DbService::ensure_default_admin`).
pub async fn create(
    pool: &SqlitePool,
    nome: &str,
    email: &str,
    telefone: Option<&str>,
    password_hash: &str,
    role: Role,
) -> RepoResult<User> {
    let agora = now_millis();
    let id = snowflake_id();

    let result = sqlx::query(
        "INSERT INTO utilizador (id, nome, email, telefone, password_hash, role, is_active, criado_em, atualizado_em) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(nome)
    .bind(email)
    .bind(telefone)
    .bind(password_hash)
    .bind(role)
    .bind(agora)
    .bind(agora)
    .execute(pool)
    .await;

    if let Err(e) = result {
        if is_unique_violation(&e) {
            return Err(RepoError::Business(
                ErrorCode::UserEmailExists,
                format!("Email {email} is already registered"),
            ));
        }
        return Err(e.into());
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    let agora = now_millis();
    let rows = sqlx::query(
        "UPDATE utilizador SET nome = COALESCE(?1, nome), telefone = COALESCE(?2, telefone), is_active = COALESCE(?3, is_active), atualizado_em = ?4 WHERE id = ?5",
    )
    .bind(data.nome)
    .bind(data.telefone)
    .bind(data.is_active)
    .bind(agora)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Business(
            ErrorCode::UserNotFound,
            format!("User {id} not found"),
        ));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::UserNotFound, format!("User {id} not found")))
}

/// Reatribui o papel de um utilizador (operação exclusiva de SUPER_ADMIN,
/// verificada no handler antes de chegar aqui)
pub async fn change_role(pool: &SqlitePool, id: i64, role: Role) -> RepoResult<User> {
    let agora = now_millis();
    let rows = sqlx::query("UPDATE utilizador SET role = ?, atualizado_em = ? WHERE id = ?")
        .bind(role)
        .bind(agora)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Business(
            ErrorCode::UserNotFound,
            format!("User {id} not found"),
        ));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Business(ErrorCode::UserNotFound, format!("User {id} not found")))
}

//! Category Repository

use super::{RepoError, RepoResult, is_unique_violation};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const CATEGORY_SELECT: &str = "SELECT id, nome, descricao, sort_order, is_active, criado_em, atualizado_em FROM categoria";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE is_active = 1 ORDER BY sort_order, nome");
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(categories)
}

pub async fn find_all_with_inactive(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let sql = format!("{CATEGORY_SELECT} ORDER BY sort_order, nome");
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let category = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let agora = now_millis();
    let id = snowflake_id();

    let result = sqlx::query(
        "INSERT INTO categoria (id, nome, descricao, sort_order, is_active, criado_em, atualizado_em) VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.nome)
    .bind(&data.descricao)
    .bind(data.sort_order.unwrap_or(0))
    .bind(agora)
    .bind(agora)
    .execute(pool)
    .await;

    if let Err(e) = result {
        if is_unique_violation(&e) {
            return Err(RepoError::Business(
                ErrorCode::CategoryNameExists,
                format!("Category '{}' already exists", data.nome),
            ));
        }
        return Err(e.into());
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let agora = now_millis();
    let result = sqlx::query(
        "UPDATE categoria SET nome = COALESCE(?1, nome), descricao = COALESCE(?2, descricao), sort_order = COALESCE(?3, sort_order), is_active = COALESCE(?4, is_active), atualizado_em = ?5 WHERE id = ?6",
    )
    .bind(data.nome)
    .bind(data.descricao)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(agora)
    .bind(id)
    .execute(pool)
    .await;

    match result {
        Err(e) if is_unique_violation(&e) => {
            return Err(RepoError::Business(
                ErrorCode::CategoryNameExists,
                "Category name already exists".into(),
            ));
        }
        Err(e) => return Err(e.into()),
        Ok(rows) if rows.rows_affected() == 0 => {
            return Err(RepoError::Business(
                ErrorCode::CategoryNotFound,
                format!("Category {id} not found"),
            ));
        }
        Ok(_) => {}
    }

    find_by_id(pool, id).await?.ok_or_else(|| {
        RepoError::Business(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
    })
}

/// Desactivação (soft delete). Recusa enquanto a categoria tiver produtos activos.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let produtos: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM produto WHERE categoria_id = ? AND is_active = 1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if produtos > 0 {
        return Err(RepoError::Business(
            ErrorCode::CategoryHasProducts,
            format!("Category {id} still has {produtos} active product(s)"),
        ));
    }

    let agora = now_millis();
    let rows = sqlx::query(
        "UPDATE categoria SET is_active = 0, atualizado_em = ? WHERE id = ? AND is_active = 1",
    )
    .bind(agora)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

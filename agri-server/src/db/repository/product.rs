//! Product Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, nome, descricao, categoria_id, preco, unidade, estoque, imagem, is_active, criado_em, atualizado_em FROM produto";

pub async fn find_all(pool: &SqlitePool, categoria_id: Option<i64>) -> RepoResult<Vec<Product>> {
    let products = match categoria_id {
        Some(cat) => {
            let sql = format!(
                "{PRODUCT_SELECT} WHERE is_active = 1 AND categoria_id = ? ORDER BY nome"
            );
            sqlx::query_as::<_, Product>(&sql).bind(cat).fetch_all(pool).await?
        }
        None => {
            let sql = format!("{PRODUCT_SELECT} WHERE is_active = 1 ORDER BY nome");
            sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?
        }
    };
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    // A categoria tem de existir e estar activa
    let categoria: Option<i64> =
        sqlx::query_scalar("SELECT id FROM categoria WHERE id = ? AND is_active = 1")
            .bind(data.categoria_id)
            .fetch_optional(pool)
            .await?;
    if categoria.is_none() {
        return Err(RepoError::Business(
            ErrorCode::CategoryNotFound,
            format!("Category {} not found", data.categoria_id),
        ));
    }

    let agora = now_millis();
    let id = snowflake_id();

    sqlx::query(
        "INSERT INTO produto (id, nome, descricao, categoria_id, preco, unidade, estoque, imagem, is_active, criado_em, atualizado_em) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.nome)
    .bind(&data.descricao)
    .bind(data.categoria_id)
    .bind(data.preco)
    .bind(data.unidade.as_deref().unwrap_or("unidade"))
    .bind(data.estoque.unwrap_or(0))
    .bind(&data.imagem)
    .bind(agora)
    .bind(agora)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let agora = now_millis();
    let rows = sqlx::query(
        "UPDATE produto SET nome = COALESCE(?1, nome), descricao = COALESCE(?2, descricao), categoria_id = COALESCE(?3, categoria_id), preco = COALESCE(?4, preco), unidade = COALESCE(?5, unidade), estoque = COALESCE(?6, estoque), imagem = COALESCE(?7, imagem), is_active = COALESCE(?8, is_active), atualizado_em = ?9 WHERE id = ?10",
    )
    .bind(data.nome)
    .bind(data.descricao)
    .bind(data.categoria_id)
    .bind(data.preco)
    .bind(data.unidade)
    .bind(data.estoque)
    .bind(data.imagem)
    .bind(data.is_active)
    .bind(agora)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::Business(
            ErrorCode::ProductNotFound,
            format!("Product {id} not found"),
        ));
    }
    find_by_id(pool, id).await?.ok_or_else(|| {
        RepoError::Business(ErrorCode::ProductNotFound, format!("Product {id} not found"))
    })
}

/// Desactivação (soft delete) — encomendas antigas continuam a referenciar o produto
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let agora = now_millis();
    let rows = sqlx::query(
        "UPDATE produto SET is_active = 0, atualizado_em = ? WHERE id = ? AND is_active = 1",
    )
    .bind(agora)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

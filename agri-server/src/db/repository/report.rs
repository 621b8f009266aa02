//! Report Repository
//!
//! Agregações para o dashboard administrativo. Receita conta apenas
//! encomendas que passaram de PENDENTE (pagas ou mais adiante no fluxo).

use super::RepoResult;
use shared::order::OrderState;
use sqlx::SqlitePool;

/// Estados que contam como receita realizada
const REVENUE_STATES: &str = "('PAGO', 'EM_PREPARACAO', 'EM_TRANSITO', 'ENTREGUE')";

/// Receita total no intervalo `[de, ate)` (Unix millis)
pub async fn revenue(pool: &SqlitePool, de: i64, ate: i64) -> RepoResult<f64> {
    let sql = format!(
        "SELECT COALESCE(SUM(total), 0) FROM encomenda WHERE estado IN {REVENUE_STATES} AND criado_em >= ? AND criado_em < ?"
    );
    let value: f64 = sqlx::query_scalar(&sql).bind(de).bind(ate).fetch_one(pool).await?;
    Ok(value)
}

/// Contagem de encomendas por estado no intervalo
pub async fn orders_by_state(
    pool: &SqlitePool,
    de: i64,
    ate: i64,
) -> RepoResult<Vec<(OrderState, i64)>> {
    let rows: Vec<(OrderState, i64)> = sqlx::query_as(
        "SELECT estado, COUNT(*) FROM encomenda WHERE criado_em >= ? AND criado_em < ? GROUP BY estado",
    )
    .bind(de)
    .bind(ate)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Clientes distintos com encomendas no intervalo
pub async fn distinct_customers(pool: &SqlitePool, de: i64, ate: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT utilizador_id) FROM encomenda WHERE criado_em >= ? AND criado_em < ?",
    )
    .bind(de)
    .bind(ate)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Produtos mais vendidos no intervalo (nome, quantidade total)
pub async fn top_products(
    pool: &SqlitePool,
    de: i64,
    ate: i64,
    limit: u32,
) -> RepoResult<Vec<(String, i64)>> {
    let sql = format!(
        "SELECT i.nome, SUM(i.quantidade) AS vendidos FROM encomenda_item i JOIN encomenda e ON e.id = i.encomenda_id WHERE e.estado IN {REVENUE_STATES} AND e.criado_em >= ? AND e.criado_em < ? GROUP BY i.nome ORDER BY vendidos DESC LIMIT ?"
    );
    let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
        .bind(de)
        .bind(ate)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Receita diária no intervalo (dia "YYYY-MM-DD" em UTC, valor)
pub async fn daily_revenue(
    pool: &SqlitePool,
    de: i64,
    ate: i64,
) -> RepoResult<Vec<(String, f64)>> {
    let sql = format!(
        "SELECT strftime('%Y-%m-%d', criado_em / 1000, 'unixepoch') AS dia, COALESCE(SUM(total), 0) FROM encomenda WHERE estado IN {REVENUE_STATES} AND criado_em >= ? AND criado_em < ? GROUP BY dia ORDER BY dia"
    );
    let rows: Vec<(String, f64)> = sqlx::query_as(&sql)
        .bind(de)
        .bind(ate)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

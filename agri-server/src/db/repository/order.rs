//! Order Repository
//!
//! Criação de encomendas e aplicação de transições de estado. As operações
//! multi-tabela correm em transacções explícitas:
//!
//! - criação: alocação do número sequencial + linhas + baixa de estoque +
//!   entrada seed do histórico, tudo ou nada;
//! - transição: UPDATE com verificação de `version` (concorrência optimista)
//!   + exactamente um INSERT no histórico.

use super::{RepoError, RepoResult, is_unique_violation};
use crate::orders::lifecycle::TransitionPlan;
use crate::orders::{number, totals};
use shared::error::ErrorCode;
use shared::order::{
    Order, OrderCreate, OrderDetail, OrderHistoryEntry, OrderItem, OrderState, SYSTEM_ACTOR,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, numero, utilizador_id, estado, subtotal, taxa_entrega, desconto, total, endereco_entrega, nota, pago_em, em_preparacao_em, em_transito_em, entregue_em, cancelado_em, version, criado_em, atualizado_em FROM encomenda";

const ITEM_SELECT: &str = "SELECT id, encomenda_id, produto_id, nome, quantidade, preco_unitario, subtotal FROM encomenda_item";

const HISTORY_SELECT: &str =
    "SELECT id, encomenda_id, estado, nota, actor, criado_em FROM encomenda_historico";

/// Tentativas de alocação do número sequencial antes de desistir
const NUMBER_ALLOC_RETRIES: usize = 3;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn find_items(pool: &SqlitePool, encomenda_id: i64) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{ITEM_SELECT} WHERE encomenda_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(encomenda_id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

/// Histórico para apresentação: mais recente primeiro.
/// A ordem canónica de armazenamento é a de inserção (criado_em, id).
pub async fn find_history(
    pool: &SqlitePool,
    encomenda_id: i64,
) -> RepoResult<Vec<OrderHistoryEntry>> {
    let sql = format!("{HISTORY_SELECT} WHERE encomenda_id = ? ORDER BY criado_em DESC, id DESC");
    let entries = sqlx::query_as::<_, OrderHistoryEntry>(&sql)
        .bind(encomenda_id)
        .fetch_all(pool)
        .await?;
    Ok(entries)
}

/// Encomenda completa (linha + itens + histórico mais recente primeiro)
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let Some(order) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let itens = find_items(pool, id).await?;
    let historico = find_history(pool, id).await?;
    Ok(Some(OrderDetail {
        encomenda: order,
        itens,
        historico,
    }))
}

/// Listagem administrativa, opcionalmente filtrada por estado
pub async fn list(
    pool: &SqlitePool,
    estado: Option<OrderState>,
    limit: u32,
    offset: u32,
) -> RepoResult<(Vec<Order>, i64)> {
    let (orders, total) = match estado {
        Some(estado) => {
            let sql = format!(
                "{ORDER_SELECT} WHERE estado = ? ORDER BY criado_em DESC LIMIT ? OFFSET ?"
            );
            let orders = sqlx::query_as::<_, Order>(&sql)
                .bind(estado)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM encomenda WHERE estado = ?")
                .bind(estado)
                .fetch_one(pool)
                .await?;
            (orders, total)
        }
        None => {
            let sql = format!("{ORDER_SELECT} ORDER BY criado_em DESC LIMIT ? OFFSET ?");
            let orders = sqlx::query_as::<_, Order>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM encomenda")
                .fetch_one(pool)
                .await?;
            (orders, total)
        }
    };
    Ok((orders, total))
}

/// Encomendas de um cliente, mais recentes primeiro
pub async fn list_by_user(pool: &SqlitePool, utilizador_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE utilizador_id = ? ORDER BY criado_em DESC");
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(utilizador_id)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

/// Cria uma encomenda a partir do carrinho
///
/// Preços vêm sempre da tabela `produto` (nunca do cliente). A encomenda
/// nasce em PENDENTE com uma entrada seed no histórico.
pub async fn create(
    pool: &SqlitePool,
    utilizador_id: i64,
    payload: &OrderCreate,
    taxa_entrega: f64,
    year: i32,
) -> RepoResult<OrderDetail> {
    if payload.itens.is_empty() {
        return Err(RepoError::Business(
            ErrorCode::OrderEmpty,
            "Order must have at least one item".into(),
        ));
    }

    let agora = now_millis();
    let encomenda_id = snowflake_id();

    let mut tx = pool.begin().await?;

    // 1. Resolve cada linha contra o catálogo e calcula subtotais
    struct Line {
        produto_id: i64,
        nome: String,
        quantidade: i64,
        preco_unitario: f64,
        subtotal: f64,
    }

    let mut lines: Vec<Line> = Vec::with_capacity(payload.itens.len());
    for item in &payload.itens {
        let row: Option<(String, f64, i64)> = sqlx::query_as(
            "SELECT nome, preco, estoque FROM produto WHERE id = ? AND is_active = 1",
        )
        .bind(item.produto_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((nome, preco, estoque)) = row else {
            return Err(RepoError::Business(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", item.produto_id),
            ));
        };

        if estoque < item.quantidade {
            return Err(RepoError::Business(
                ErrorCode::ProductOutOfStock,
                format!("Product '{nome}' has only {estoque} in stock"),
            ));
        }

        let subtotal = totals::line_subtotal(item.quantidade, preco)
            .map_err(|e| RepoError::Business(e.code, e.message))?;
        lines.push(Line {
            produto_id: item.produto_id,
            nome,
            quantidade: item.quantidade,
            preco_unitario: preco,
            subtotal,
        });
    }

    let line_subtotals: Vec<f64> = lines.iter().map(|l| l.subtotal).collect();
    let subtotal = totals::order_subtotal(&line_subtotals)
        .map_err(|e| RepoError::Business(e.code, e.message))?;
    let total = totals::order_total(subtotal, taxa_entrega, 0.0)
        .map_err(|e| RepoError::Business(e.code, e.message))?;

    // 2. Aloca o número sequencial. O UNIQUE em `numero` é a salvaguarda
    //    contra corridas: em colisão relemos o maior número e repetimos.
    let mut inserted = false;
    for attempt in 0..NUMBER_ALLOC_RETRIES {
        let latest: Option<String> = sqlx::query_scalar(
            "SELECT numero FROM encomenda WHERE numero LIKE ? ORDER BY numero DESC LIMIT 1",
        )
        .bind(format!("{}%", number::year_prefix(number::ORDER_PREFIX, year)))
        .fetch_optional(&mut *tx)
        .await?;

        let numero = number::next_number(number::ORDER_PREFIX, year, latest.as_deref())
            .map_err(|e| RepoError::Business(e.code, e.message))?;

        let result = sqlx::query(
            "INSERT INTO encomenda (id, numero, utilizador_id, estado, subtotal, taxa_entrega, desconto, total, endereco_entrega, nota, version, criado_em, atualizado_em) VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?, 0, ?, ?)",
        )
        .bind(encomenda_id)
        .bind(&numero)
        .bind(utilizador_id)
        .bind(OrderState::Pendente)
        .bind(subtotal)
        .bind(taxa_entrega)
        .bind(total)
        .bind(&payload.endereco_entrega)
        .bind(&payload.nota)
        .bind(agora)
        .bind(agora)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {
                inserted = true;
                break;
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!(
                    numero = %numero,
                    attempt,
                    "Order number collision, reallocating"
                );
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    if !inserted {
        return Err(RepoError::Database(
            "Order number allocation failed after retries".into(),
        ));
    }

    // 3. Linhas + baixa de estoque
    for line in &lines {
        sqlx::query(
            "INSERT INTO encomenda_item (id, encomenda_id, produto_id, nome, quantidade, preco_unitario, subtotal) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(encomenda_id)
        .bind(line.produto_id)
        .bind(&line.nome)
        .bind(line.quantidade)
        .bind(line.preco_unitario)
        .bind(line.subtotal)
        .execute(&mut *tx)
        .await?;

        let rows = sqlx::query(
            "UPDATE produto SET estoque = estoque - ?1, atualizado_em = ?2 WHERE id = ?3 AND estoque >= ?1",
        )
        .bind(line.quantidade)
        .bind(agora)
        .bind(line.produto_id)
        .execute(&mut *tx)
        .await?;

        if rows.rows_affected() == 0 {
            return Err(RepoError::Business(
                ErrorCode::ProductOutOfStock,
                format!("Product '{}' ran out of stock", line.nome),
            ));
        }
    }

    // 4. Entrada seed do histórico: a encomenda nasce PENDENTE
    sqlx::query(
        "INSERT INTO encomenda_historico (id, encomenda_id, estado, nota, actor, criado_em) VALUES (?, ?, ?, NULL, ?, ?)",
    )
    .bind(snowflake_id())
    .bind(encomenda_id)
    .bind(OrderState::Pendente)
    .bind(SYSTEM_ACTOR)
    .bind(agora)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_detail(pool, encomenda_id)
        .await?
        .ok_or_else(|| RepoError::Database("Order vanished after create".into()))
}

/// Aplica um plano de transição validado (ver `orders::lifecycle`)
///
/// O UPDATE verifica `version`: se outro escritor tiver aplicado uma
/// transição entretanto, nada é alterado e devolve-se conflito — o estado
/// nunca dessincroniza do histórico.
pub async fn apply_transition(
    pool: &SqlitePool,
    encomenda_id: i64,
    plan: &TransitionPlan,
) -> RepoResult<Order> {
    let mut tx = pool.begin().await?;

    // stamp_column vem de OrderState::timestamp_column (identificadores
    // fixos do enum, nunca input do cliente)
    let rows = match plan.stamp_column {
        Some(col) => {
            let sql = format!(
                "UPDATE encomenda SET estado = ?, atualizado_em = ?, version = version + 1, {col} = COALESCE({col}, ?) WHERE id = ? AND version = ?"
            );
            sqlx::query(&sql)
                .bind(plan.para)
                .bind(plan.stamp_value)
                .bind(plan.stamp_value)
                .bind(encomenda_id)
                .bind(plan.expected_version)
                .execute(&mut *tx)
                .await?
        }
        None => {
            sqlx::query(
                "UPDATE encomenda SET estado = ?, atualizado_em = ?, version = version + 1 WHERE id = ? AND version = ?",
            )
            .bind(plan.para)
            .bind(plan.stamp_value)
            .bind(encomenda_id)
            .bind(plan.expected_version)
            .execute(&mut *tx)
            .await?
        }
    };

    if rows.rows_affected() == 0 {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM encomenda WHERE id = ?")
            .bind(encomenda_id)
            .fetch_optional(&mut *tx)
            .await?;
        return Err(match exists {
            None => RepoError::Business(
                ErrorCode::OrderNotFound,
                format!("Order {encomenda_id} not found"),
            ),
            Some(_) => RepoError::Business(
                ErrorCode::OrderStateConflict,
                format!("Order {encomenda_id} was modified concurrently"),
            ),
        });
    }

    sqlx::query(
        "INSERT INTO encomenda_historico (id, encomenda_id, estado, nota, actor, criado_em) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(snowflake_id())
    .bind(encomenda_id)
    .bind(plan.historico.estado)
    .bind(&plan.historico.nota)
    .bind(&plan.historico.actor)
    .bind(plan.historico.criado_em)
    .execute(&mut *tx)
    .await?;

    // Cancelamento devolve o estoque das linhas
    if plan.para == OrderState::Cancelado {
        let itens: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT produto_id, quantidade FROM encomenda_item WHERE encomenda_id = ?",
        )
        .bind(encomenda_id)
        .fetch_all(&mut *tx)
        .await?;

        for (produto_id, quantidade) in itens {
            sqlx::query(
                "UPDATE produto SET estoque = estoque + ?, atualizado_em = ? WHERE id = ?",
            )
            .bind(quantidade)
            .bind(plan.stamp_value)
            .bind(produto_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    find_by_id(pool, encomenda_id).await?.ok_or_else(|| {
        RepoError::Business(
            ErrorCode::OrderNotFound,
            format!("Order {encomenda_id} not found"),
        )
    })
}

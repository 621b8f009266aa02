//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::core::ServerState;
use crate::db::repository::product as product_repo;
use crate::orders::totals::validate_amount;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Query params para a listagem do catálogo
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub categoria_id: Option<i64>,
}

/// GET /api/produtos - catálogo, opcionalmente filtrado por categoria
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product_repo::find_all(&state.db, query.categoria_id).await?;
    Ok(Json(products))
}

/// GET /api/produtos/:id - um produto
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
        })?;
    Ok(Json(product))
}

/// POST /api/produtos - cria um produto
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.nome, "nome", MAX_NAME_LEN)?;
    validate_optional_text(&payload.descricao, "descricao", MAX_NOTE_LEN)?;
    validate_amount(payload.preco, "preco")?;
    if payload.estoque.is_some_and(|e| e < 0) {
        return Err(AppError::validation("estoque must be non-negative"));
    }

    let product = product_repo::create(&state.db, payload).await?;
    Ok(Json(product))
}

/// PUT /api/produtos/:id - actualiza um produto
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(nome) = &payload.nome {
        validate_required_text(nome, "nome", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.descricao, "descricao", MAX_NOTE_LEN)?;
    if let Some(preco) = payload.preco {
        validate_amount(preco, "preco")?;
    }
    if payload.estoque.is_some_and(|e| e < 0) {
        return Err(AppError::validation("estoque must be non-negative"));
    }

    let product = product_repo::update(&state.db, id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/produtos/:id - desactiva um produto (soft delete)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = product_repo::delete(&state.db, id).await?;
    Ok(Json(result))
}

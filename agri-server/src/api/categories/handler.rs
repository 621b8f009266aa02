//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::core::ServerState;
use crate::db::repository::category as category_repo;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/categorias - lista as categorias activas
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category_repo::find_all(&state.db).await?;
    Ok(Json(categories))
}

/// GET /api/categorias/:id - uma categoria
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
        })?;
    Ok(Json(category))
}

/// POST /api/categorias - cria uma categoria
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.nome, "nome", MAX_NAME_LEN)?;
    validate_optional_text(&payload.descricao, "descricao", MAX_NOTE_LEN)?;

    let category = category_repo::create(&state.db, payload).await?;
    Ok(Json(category))
}

/// PUT /api/categorias/:id - actualiza uma categoria
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(nome) = &payload.nome {
        validate_required_text(nome, "nome", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.descricao, "descricao", MAX_NOTE_LEN)?;

    let category = category_repo::update(&state.db, id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categorias/:id - desactiva uma categoria (soft delete)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = category_repo::delete(&state.db, id).await?;
    Ok(Json(result))
}

//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{RoleChange, UserPublic, UserUpdate};
use shared::types::{Page, PaginationParams};

use crate::auth::CurrentUser;
use crate::auth::permissions::can_change_roles;
use crate::core::ServerState;
use crate::db::repository::user as user_repo;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/utilizadores - listagem paginada
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<UserPublic>>> {
    let users = user_repo::find_all(&state.db, params.limit(), params.offset()).await?;
    let total = user_repo::count_all(&state.db).await?;

    Ok(Json(Page {
        items: users.into_iter().map(UserPublic::from).collect(),
        total,
        page: params.page,
        page_size: params.limit(),
    }))
}

/// GET /api/utilizadores/:id - um utilizador
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserPublic>> {
    let user = user_repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
        })?;
    Ok(Json(user.into()))
}

/// PATCH /api/utilizadores/:id - actualização (nome, telefone, activação)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserPublic>> {
    validate_optional_text(&payload.nome, "nome", MAX_NAME_LEN)?;
    validate_optional_text(&payload.telefone, "telefone", MAX_SHORT_TEXT_LEN)?;

    let user = user_repo::update(&state.db, id, payload).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/utilizadores/:id/role - reatribuição de papel (SUPER_ADMIN)
///
/// Um SUPER_ADMIN não pode despromover-se a si próprio — evita ficar sem
/// nenhum administrador com acesso total.
pub async fn change_role(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RoleChange>,
) -> AppResult<Json<UserPublic>> {
    if !can_change_roles(current.role) {
        return Err(AppError::new(ErrorCode::SuperAdminRequired));
    }
    if current.id == id {
        return Err(AppError::new(ErrorCode::CannotChangeOwnRole));
    }

    let user = user_repo::change_role(&state.db, id, payload.role).await?;

    crate::security_log!(
        "INFO",
        "role_changed",
        target_user = id,
        new_role = payload.role.as_str(),
        by = current.id
    );

    Ok(Json(user.into()))
}

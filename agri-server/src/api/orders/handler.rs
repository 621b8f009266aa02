//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::order::{
    Order, OrderCreate, OrderDetail, OrderHistoryEntry, OrderState, OrderStateChange,
};
use shared::types::Page;

use crate::auth::CurrentUser;
use crate::auth::permissions::{can_manage_orders, can_view_all_orders};
use crate::core::ServerState;
use crate::db::repository::{order as order_repo, user as user_repo};
use crate::notify::{spawn_order_confirmation, spawn_state_change_email};
use crate::orders::plan_transition;
use crate::utils::time::current_year;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NOTE_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Parse do literal de estado vindo do wire
///
/// Qualquer string fora do enum de seis valores é rejeitada com erro de
/// validação antes de tocar na encomenda.
fn parse_estado(raw: &str) -> AppResult<OrderState> {
    raw.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidOrderState,
            format!("'{raw}' is not a valid order state"),
        )
        .with_detail("estado", raw)
    })
}

/// Dono da encomenda ou papel com visibilidade total
fn ensure_can_view(user: &CurrentUser, order: &Order) -> AppResult<()> {
    if order.utilizador_id == user.id || can_view_all_orders(user.role) {
        Ok(())
    } else {
        Err(AppError::forbidden("Not your order"))
    }
}

/// POST /api/encomendas - checkout do carrinho
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    validate_optional_text(&payload.endereco_entrega, "enderecoEntrega", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.nota, "nota", MAX_NOTE_LEN)?;

    let year = current_year(state.business_tz());
    let detail = order_repo::create(
        &state.db,
        user.id,
        &payload,
        state.config.taxa_entrega_padrao,
        year,
    )
    .await?;

    tracing::info!(
        numero = %detail.encomenda.numero,
        utilizador_id = user.id,
        total = detail.encomenda.total,
        "Order created"
    );

    spawn_order_confirmation(
        state.notifier.clone(),
        user.email.clone(),
        detail.encomenda.clone(),
    );

    Ok(Json(detail))
}

/// Query params da listagem administrativa
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub estado: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

/// GET /api/encomendas - listagem administrativa (STAFF+), filtro por estado
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Order>>> {
    if !can_view_all_orders(user.role) {
        return Err(AppError::forbidden("Requires staff role"));
    }

    let estado = query.estado.as_deref().map(parse_estado).transpose()?;
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 100);
    let offset = (page - 1) * page_size;

    let (orders, total) = order_repo::list(&state.db, estado, page_size, offset).await?;

    Ok(Json(Page {
        items: orders,
        total,
        page,
        page_size,
    }))
}

/// GET /api/encomendas/minhas - encomendas do cliente autenticado
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_repo::list_by_user(&state.db, user.id).await?;
    Ok(Json(orders))
}

/// GET /api/encomendas/:id - detalhe (dono ou STAFF+)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order_repo::find_detail(&state.db, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;
    ensure_can_view(&user, &detail.encomenda)?;
    Ok(Json(detail))
}

/// GET /api/encomendas/:id/historico - histórico, mais recente primeiro
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderHistoryEntry>>> {
    let order = order_repo::find_by_id(&state.db, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
    })?;
    ensure_can_view(&user, &order)?;

    let entries = order_repo::find_history(&state.db, id).await?;
    Ok(Json(entries))
}

/// PATCH /api/encomendas/:id/estado - transição de estado (STAFF+)
///
/// Idempotente: aplicar o estado actual devolve a encomenda sem criar
/// entrada de histórico. O e-mail de notificação é fire-and-forget.
pub async fn change_state(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStateChange>,
) -> AppResult<Json<OrderDetail>> {
    if !can_manage_orders(user.role) {
        return Err(AppError::forbidden("Requires staff role"));
    }

    let novo_estado = parse_estado(&payload.estado)?;

    let order = order_repo::find_by_id(&state.db, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
    })?;

    let plan = plan_transition(
        state.transition_policy(),
        &order,
        novo_estado,
        payload.nota,
        &user.actor(),
    )?;

    let Some(plan) = plan else {
        // No-op idempotente: já está no estado pedido
        let detail = order_repo::find_detail(&state.db, id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;
        return Ok(Json(detail));
    };

    let de = plan.de;
    let updated = order_repo::apply_transition(&state.db, id, &plan).await?;

    tracing::info!(
        numero = %updated.numero,
        de = %de,
        para = %updated.estado,
        actor = %user.actor(),
        "Order state changed"
    );

    // Notificação ao dono da encomenda — nunca falha a transição
    match user_repo::find_by_id(&state.db, updated.utilizador_id).await {
        Ok(Some(owner)) => {
            spawn_state_change_email(
                state.notifier.clone(),
                owner.email,
                updated.clone(),
                de,
                updated.estado,
                plan.historico.nota.clone(),
            );
        }
        Ok(None) => {
            tracing::warn!(numero = %updated.numero, "Order owner not found, e-mail skipped")
        }
        Err(e) => {
            tracing::warn!(numero = %updated.numero, error = %e, "Owner lookup failed, e-mail skipped")
        }
    }

    let detail = order_repo::find_detail(&state.db, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
    })?;
    Ok(Json(detail))
}

//! Reports API — métricas do dashboard administrativo (STAFF+)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::permissions::MIN_ROLE_VIEW_REPORTS;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/relatorios", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/resumo", get(handler::overview))
        .layer(middleware::from_fn(require_role(MIN_ROLE_VIEW_REPORTS)))
}

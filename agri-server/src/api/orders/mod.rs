//! Order API
//!
//! Todas as rotas exigem autenticação. A verificação de papel é feita nos
//! handlers, através dos predicados de `auth::permissions` — o avaliador de
//! permissões corre antes de qualquer mutação.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/encomendas", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Checkout (cliente autenticado)
        .route("/", post(handler::create).get(handler::list))
        // Encomendas do próprio cliente
        .route("/minhas", get(handler::list_mine))
        // Detalhe e histórico (dono ou STAFF+)
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/historico", get(handler::history))
        // Transição de estado (STAFF+)
        .route("/{id}/estado", patch(handler::change_state))
}

//! User API
//!
//! Gestão de utilizadores (ADMIN+). A troca de papéis é exclusiva do
//! SUPER_ADMIN — verificada no handler com o predicado can_change_roles.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::permissions::MIN_ROLE_MANAGE_USERS;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/utilizadores", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
        .route("/{id}/role", patch(handler::change_role))
        .layer(middleware::from_fn(require_role(MIN_ROLE_MANAGE_USERS)))
}

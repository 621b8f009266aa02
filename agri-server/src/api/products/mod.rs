//! Product API
//!
//! Leitura é pública (catálogo do storefront); mutações exigem STAFF+.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_role;
use crate::auth::permissions::MIN_ROLE_MANAGE_PRODUCTS;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/produtos", routes())
}

fn routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_role(MIN_ROLE_MANAGE_PRODUCTS)));

    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .merge(admin)
}

//! Entity routes. Paths are parameterized; handlers resolve the entity from the registry.

use crate::handlers::entity::{create, delete, delete_where, list, read, update, update_where};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;

pub fn entity_routes(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route(
            "/:path_segment",
            get(list).post(create).patch(update_where).delete(delete_where),
        )
        .route("/:path_segment/:id", get(read).patch(update).delete(delete))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

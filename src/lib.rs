//! School administration backend: a generic, descriptor-driven query and
//! mutation engine over PostgreSQL, exposed through a uniform HTTP envelope.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod query;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use auth::{AccessLevel, Caller, Role};
pub use config::{EngineConfig, MultiValuePolicy, ServerConfig};
pub use error::{AppError, ConfigError};
pub use migration::apply_schema;
pub use model::{ColumnDescriptor, Entity, EntityRegistry};
pub use query::{ColumnValues, CriteriaBuilder, FilterPredicate, QuerySpec};
pub use response::Envelope;
pub use routes::{common_routes, entity_routes};
pub use service::{Engine, ResultPage};
pub use state::AppState;

use axum::Router;

/// Full application router: common routes at the root, entities under `/api/v1`.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/v1", entity_routes(state, body_limit))
}

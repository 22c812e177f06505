//! Shared application state for all routes. Immutable after start-up.

use crate::model::EntityRegistry;
use crate::service::Engine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub registry: Arc<EntityRegistry>,
}

impl AppState {
    pub fn new(engine: Engine, registry: EntityRegistry) -> Self {
        AppState {
            engine,
            registry: Arc::new(registry),
        }
    }
}

//! Liveness, readiness and build info. None of these need a caller.

use crate::sql::qualified_table;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Readiness {
    ready: bool,
    schema: String,
    entities: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing_tables: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Ready once every catalog table resolves in the configured schema.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let schema = state.engine.config().schema.clone();
    let mut tables: Vec<_> = state.registry.descriptors().map(|d| d.table).collect();
    tables.sort_unstable();

    let mut report = Readiness {
        ready: false,
        schema,
        entities: tables.len(),
        missing_tables: Vec::new(),
        error: None,
    };
    for table in tables {
        let exists = sqlx::query_scalar::<_, bool>("SELECT to_regclass($1) IS NOT NULL")
            .bind(qualified_table(&report.schema, table))
            .fetch_one(state.engine.pool())
            .await;
        match exists {
            Ok(true) => {}
            Ok(false) => report.missing_tables.push(table),
            Err(e) => {
                tracing::warn!(error = %e, "readiness check failed");
                report.error = Some("database unavailable".into());
                return (StatusCode::SERVICE_UNAVAILABLE, Json(report));
            }
        }
    }
    report.ready = report.missing_tables.is_empty();
    let status = if report.ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, Json(report))
}

/// GET /health, GET /ready, GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/ready", get(readiness))
        .route(
            "/version",
            get(|| async {
                Json::<Value>(json!({ "name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") }))
            }),
        )
        .with_state(state)
}

//! Entity handlers: list, read, create, update, delete. Every response is an [`Envelope`].

use crate::auth::{Caller, Operation};
use crate::error::AppError;
use crate::extractors::MutationBody;
use crate::model::ColumnDescriptor;
use crate::query::{ColumnValues, CriteriaBuilder, FilterPredicate};
use crate::response::Envelope;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

type EnvelopeResult = Result<(StatusCode, Json<Envelope>), AppError>;

/// Resolves the entity and checks the caller may perform `op` on it.
fn authorized(
    state: &AppState,
    caller: &Caller,
    path_segment: &str,
    op: Operation,
) -> Result<&'static ColumnDescriptor, AppError> {
    let descriptor = state
        .registry
        .get(path_segment)
        .ok_or_else(|| AppError::UnknownEntity(path_segment.to_string()))?;
    descriptor.access.check(caller, op)?;
    Ok(descriptor)
}

fn values_from(descriptor: &ColumnDescriptor, body: MutationBody) -> Result<ColumnValues, AppError> {
    match body {
        MutationBody::Json(value) => ColumnValues::from_json(descriptor, &value),
        MutationBody::Parts(parts) => ColumnValues::from_parts(descriptor, parts),
    }
}

fn ok(envelope: Envelope) -> EnvelopeResult {
    Ok((StatusCode::OK, Json(envelope)))
}

pub async fn list(
    caller: Caller,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> EnvelopeResult {
    let descriptor = authorized(&state, &caller, &path_segment, Operation::Read)?;
    let spec = CriteriaBuilder::from_params(descriptor, state.engine.config(), &params)?;
    let page = state.engine.query(&spec).await?;
    ok(Envelope::page(page))
}

pub async fn read(
    caller: Caller,
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> EnvelopeResult {
    let descriptor = authorized(&state, &caller, &path_segment, Operation::Read)?;
    let row = state
        .engine
        .find_by_id(descriptor, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", path_segment, id)))?;
    ok(Envelope::rows(vec![row]))
}

pub async fn create(
    caller: Caller,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    body: MutationBody,
) -> EnvelopeResult {
    let descriptor = authorized(&state, &caller, &path_segment, Operation::Create)?;
    let values = values_from(descriptor, body)?;
    let row = state.engine.insert(descriptor, &values).await?;
    Ok((StatusCode::CREATED, Json(Envelope::rows(vec![row]))))
}

pub async fn update(
    caller: Caller,
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
    body: MutationBody,
) -> EnvelopeResult {
    let descriptor = authorized(&state, &caller, &path_segment, Operation::Update)?;
    let values = values_from(descriptor, body)?;
    let filters = vec![FilterPredicate::exact(descriptor.primary_key(), &id)];
    let row = state.engine.update(descriptor, &values, &filters).await?;
    ok(Envelope::rows(vec![row]))
}

/// PATCH on the collection: the query string selects the single row to update.
pub async fn update_where(
    caller: Caller,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    body: MutationBody,
) -> EnvelopeResult {
    let descriptor = authorized(&state, &caller, &path_segment, Operation::Update)?;
    let values = values_from(descriptor, body)?;
    let filters = CriteriaBuilder::filters(descriptor, state.engine.config(), &params)?;
    let row = state.engine.update(descriptor, &values, &filters).await?;
    ok(Envelope::rows(vec![row]))
}

pub async fn delete(
    caller: Caller,
    State(state): State<AppState>,
    Path((path_segment, id)): Path<(String, String)>,
) -> EnvelopeResult {
    let descriptor = authorized(&state, &caller, &path_segment, Operation::Delete)?;
    let filters = vec![FilterPredicate::exact(descriptor.primary_key(), &id)];
    state.engine.delete(descriptor, &filters).await?;
    ok(Envelope::empty())
}

/// DELETE on the collection: the query string selects the single row to delete.
pub async fn delete_where(
    caller: Caller,
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> EnvelopeResult {
    let descriptor = authorized(&state, &caller, &path_segment, Operation::Delete)?;
    let filters = CriteriaBuilder::filters(descriptor, state.engine.config(), &params)?;
    state.engine.delete(descriptor, &filters).await?;
    ok(Envelope::empty())
}

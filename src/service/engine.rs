//! Transactional execution of compiled statements against a pooled connection.
//!
//! Every public call borrows one connection, runs inside one transaction and
//! either commits or rolls back before returning. Nothing is retried.

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::model::ColumnDescriptor;
use crate::query::{ColumnValues, FilterPredicate, QuerySpec};
use crate::service::{row_to_json, RequestValidator, ResultPage};
use crate::sql::{self, QueryBuf};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};
use std::sync::Arc;

#[derive(Clone)]
pub struct Engine {
    pool: PgPool,
    config: Arc<EngineConfig>,
}

impl Engine {
    pub fn new(pool: PgPool, config: EngineConfig) -> Self {
        Engine {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the count statement, then the data statement, in one transaction.
    /// Bounds are checked before a connection is taken.
    pub async fn query(&self, spec: &QuerySpec) -> Result<ResultPage, AppError> {
        spec.window().validate(self.config.max_page_size)?;
        self.run_query(spec).await
    }

    /// One row by primary key, read through the regular query path. The
    /// request page-size cap does not apply to this single-row window.
    pub async fn find_by_id(&self, descriptor: &'static ColumnDescriptor, id: &str) -> Result<Option<Value>, AppError> {
        let spec = QuerySpec::builder(descriptor, &self.config)
            .filter(FilterPredicate::exact(descriptor.primary_key(), id))
            .results_offset(1)
            .build()?;
        Ok(self.run_query(&spec).await?.into_iter().next())
    }

    async fn run_query(&self, spec: &QuerySpec) -> Result<ResultPage, AppError> {
        let window = spec.window();
        let count_q = sql::count(spec, &self.config.schema);
        let data_q = sql::select(spec, &self.config.schema);

        let mut tx = self.pool.begin().await?;
        match Self::read_page(&mut tx, &count_q, &data_q).await {
            Ok((generable, page_rows, rows)) => {
                tx.commit().await?;
                Ok(ResultPage {
                    rows,
                    generable_results: to_u64(generable),
                    results_from: to_u64(window.results_from),
                    results_offset: to_u64(page_rows),
                })
            }
            Err(e) => {
                rollback(tx, spec.descriptor().table).await;
                Err(e)
            }
        }
    }

    /// Inserts one row, commits, then re-reads it by its generated key.
    pub async fn insert(&self, descriptor: &'static ColumnDescriptor, values: &ColumnValues) -> Result<Value, AppError> {
        RequestValidator::validate_insert(descriptor, values)?;
        let q = sql::insert(descriptor, values, &self.config.schema);
        let row = self.write_one(descriptor, &q).await?;
        let id: String = row.try_get(descriptor.primary_key().name())?;
        tracing::info!(entity = descriptor.table, id = %id, "inserted");
        self.find_by_id(descriptor, &id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", descriptor.table, id)))
    }

    /// Updates exactly one row matching `filters` and returns it.
    pub async fn update(
        &self,
        descriptor: &'static ColumnDescriptor,
        values: &ColumnValues,
        filters: &[FilterPredicate],
    ) -> Result<Value, AppError> {
        RequestValidator::validate_update(values, filters)?;
        let q = sql::update(descriptor, values, filters, &self.config.schema);
        let row = self.write_one(descriptor, &q).await?;
        let updated = row_to_json(&row);
        tracing::info!(entity = descriptor.table, id = %updated["id"], "updated");
        Ok(updated)
    }

    /// Deletes exactly one row matching `filters`.
    pub async fn delete(&self, descriptor: &'static ColumnDescriptor, filters: &[FilterPredicate]) -> Result<(), AppError> {
        RequestValidator::validate_delete(filters)?;
        let q = sql::delete(descriptor, filters, &self.config.schema);
        let row = self.write_one(descriptor, &q).await?;
        let id: String = row.try_get(descriptor.primary_key().name())?;
        tracing::info!(entity = descriptor.table, id = %id, "deleted");
        Ok(())
    }

    async fn read_page(
        tx: &mut PgConnection,
        count_q: &QueryBuf,
        data_q: &QueryBuf,
    ) -> Result<(i64, i64, Vec<Value>), AppError> {
        tracing::debug!(sql = %count_q.sql, params = ?count_q.params, "query (count)");
        let mut count = sqlx::query_as::<_, (i64, i64)>(&count_q.sql);
        for p in &count_q.params {
            count = count.bind(p.clone());
        }
        let (page_rows, generable) = count.fetch_one(&mut *tx).await?;

        tracing::debug!(sql = %data_q.sql, params = ?data_q.params, "query (data)");
        let mut data = sqlx::query(&data_q.sql);
        for p in &data_q.params {
            data = data.bind(p.clone());
        }
        let rows = data.fetch_all(&mut *tx).await?;
        Ok((generable, page_rows, rows.iter().map(row_to_json).collect()))
    }

    /// Runs a RETURNING write and commits only if it touched exactly one row.
    async fn write_one(&self, descriptor: &ColumnDescriptor, q: &QueryBuf) -> Result<PgRow, AppError> {
        let mut tx = self.pool.begin().await?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let rows = match query.fetch_all(&mut *tx).await {
            Ok(rows) => rows,
            Err(e) => {
                rollback(tx, descriptor.table).await;
                return Err(e.into());
            }
        };
        match <[PgRow; 1]>::try_from(rows) {
            Ok([row]) => {
                tx.commit().await?;
                Ok(row)
            }
            Err(rows) => {
                rollback(tx, descriptor.table).await;
                Err(AppError::MutationConflict {
                    entity: descriptor.table,
                    affected: rows.len() as u64,
                })
            }
        }
    }
}

async fn rollback(tx: Transaction<'static, Postgres>, entity: &str) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(entity, error = %e, "rollback failed");
    } else {
        tracing::debug!(entity, "rolled back");
    }
}

fn to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

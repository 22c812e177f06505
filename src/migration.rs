//! Schema bootstrap: one TEXT table per entity, keyed by a sequence-backed decimal-string `id`.
//! Idempotent (IF NOT EXISTS throughout) and applied in one transaction.

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::model::{ColumnDescriptor, EntityRegistry};
use crate::sql::qualified_table;
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// DDL statements for one entity, in execution order.
pub fn entity_ddl(schema: &str, descriptor: &ColumnDescriptor) -> Vec<String> {
    let table = qualified_table(schema, descriptor.table);
    let sequence = qualified_table(schema, &format!("{}_id_seq", descriptor.table));
    let mut cols = vec![format!(
        "{} TEXT PRIMARY KEY DEFAULT nextval({})::text",
        quote(descriptor.primary_key().name()),
        literal(&sequence)
    )];
    cols.extend(descriptor.writable().map(|c| format!("{} TEXT", quote(c.name()))));
    vec![
        format!("CREATE SEQUENCE IF NOT EXISTS {}", sequence),
        format!("CREATE TABLE IF NOT EXISTS {} ({})", table, cols.join(", ")),
    ]
}

pub async fn apply_schema(pool: &PgPool, config: &EngineConfig, registry: &EntityRegistry) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote(&config.schema)))
        .execute(&mut *tx)
        .await?;
    let mut descriptors: Vec<_> = registry.descriptors().collect();
    descriptors.sort_by_key(|d| d.table);
    for descriptor in descriptors {
        for ddl in entity_ddl(&config.schema, descriptor) {
            tracing::debug!(sql = %ddl, "migration");
            sqlx::query(&ddl).execute(&mut *tx).await?;
        }
    }
    tx.commit().await?;
    tracing::info!(schema = %config.schema, "schema ready");
    Ok(())
}

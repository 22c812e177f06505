//! Server: loads `.env`, bootstraps the schema, mounts common and entity routes.

use school_admin::extractors::trusted_caller_headers;
use school_admin::{app, apply_schema, AppState, Engine, EntityRegistry, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("school_admin=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let registry = EntityRegistry::catalog();
    apply_schema(&pool, &config.engine, &registry).await?;
    let state = AppState::new(Engine::new(pool, config.engine.clone()), registry);

    let router = app(state, config.body_limit).layer(axum::middleware::from_fn(trusted_caller_headers));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

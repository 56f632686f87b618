//! Pets API server. Bootstraps the database, builds the router, and serves.

use axum::Router;
use pets_api::{
    common_routes_with_ready, crud_routes, ensure_database_exists, ensure_pets_table,
    JsonPatchEngine, PgPetRepository,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pets_api=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/pets".into());
    ensure_database_exists(&database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    ensure_pets_table(&pool).await?;

    let repo = Arc::new(PgPetRepository::new(pool, Arc::new(JsonPatchEngine)));
    let app = Router::new()
        .merge(common_routes_with_ready(repo.clone()))
        .nest("/api/pets", crud_routes(repo))
        .layer(RequestBodyLimitLayer::new(1024 * 1024));

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

//! Urban Soccer RPG API server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use urbansoccer_api::config::ServerConfig;
use urbansoccer_api::error::AppError;
use urbansoccer_api::state::AppState;
use urbansoccer_api::{build_router, shutdown, telemetry};
use urbansoccer_core::clock::{Clock, SystemClock};
use urbansoccer_store::pg_archetype_repository::PgArchetypeRepository;
use urbansoccer_store::pg_campaign_repository::PgCampaignRepository;
use urbansoccer_store::pg_identity_provider::PgIdentityProvider;
use urbansoccer_store::schema::MIGRATOR;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ServerConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Urban Soccer RPG API server");

    let result = serve(&config).await;
    if let Err(error) = &result {
        tracing::error!(%error, "server stopped with an error");
    }

    telemetry.shutdown();
    result
}

async fn serve(config: &ServerConfig) -> Result<(), AppError> {
    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("database schema is up to date");

    // Build application state.
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let app_state = AppState::new(
        Arc::clone(&clock),
        Arc::new(PgCampaignRepository::new(pool.clone())),
        Arc::new(PgArchetypeRepository::new(pool.clone())),
        Arc::new(PgIdentityProvider::new(pool.clone(), clock)),
    );

    let app = build_router(app_state);

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("database pool closed");

    Ok(())
}

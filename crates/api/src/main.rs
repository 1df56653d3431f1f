use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

use reservation_api::app::{create_router, AppState};
use reservation_api::config::Config;
use reservation_api::jobs::{
    JobScheduler, LoginTokenCleanupJob, PoolMetricsJob, RateLimiterCleanupJob,
};
use reservation_api::middleware;
use reservation_api::services::admin_bootstrap::bootstrap_admin;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging);

    info!(
        "Starting restaurant reservation API v{}",
        env!("CARGO_PKG_VERSION")
    );

    middleware::init_metrics().context("Failed to install Prometheus recorder")?;

    let pool = persistence::db::create_pool(&(&config.database).into()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    if let Some(admin) = bootstrap_admin(&pool, &config.admin).await? {
        info!(employee_id = %admin.id, "Initial admin ready, request a login link to sign in");
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(config, pool.clone())?;

    let mut scheduler = JobScheduler::new();
    scheduler.register(LoginTokenCleanupJob::new(pool.clone()));
    scheduler.register(PoolMetricsJob::new(pool));
    if let Some(limiter) = state.rate_limiter.clone() {
        scheduler.register(RateLimiterCleanupJob::new(limiter));
    }
    scheduler.start();

    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

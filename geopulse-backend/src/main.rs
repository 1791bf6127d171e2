// src/main.rs
use geopulse_backend::api::{create_router, AppState};
use geopulse_backend::config::AppConfig;
use geopulse_backend::db::{create_db_pool, run_migrations};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geopulse_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting GeoPulse backend...");

    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        primary_provider = %app_config.geocoding.primary_provider,
        "Configuration loaded"
    );

    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    run_migrations(&db_pool).await?;
    tracing::info!("Database migrations applied.");

    let server_addr = app_config.server_addr();
    let app_state = AppState::new(db_pool, app_config)?;
    let app_router = create_router(app_state);

    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}

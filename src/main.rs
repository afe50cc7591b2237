use std::process::ExitCode;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use ticketstore_server::config::Config;
use ticketstore_server::routes::{create_routes, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Successfully connected to database");

    if let Err(e) = sqlx::migrate!().run(&pool).await {
        tracing::error!(error = %e, "Failed to run migrations");
        return ExitCode::FAILURE;
    }
    tracing::info!("Migrations run successfully");

    let state = AppState::postgres(pool, &config.auth);

    if let Some(admin) = &config.admin {
        if let Err(e) = state.auth.provision_admin(&admin.email, &admin.password).await {
            tracing::error!(error = %e, "Failed to provision admin account");
            return ExitCode::FAILURE;
        }
    }

    let app = create_routes(state, &config);

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "Failed to bind address");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

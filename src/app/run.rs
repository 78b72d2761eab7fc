use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

use crate::{
    app::{
        config::AppConfig,
        router::{build_router, cors_layer},
        state::AppState,
    },
    error::AppError,
    repositories::comments::PgCommentStore,
    telemetry,
};

pub async fn run() -> Result<(), AppError> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing()
        .map_err(|err| AppError::Internal(format!("telemetry init failed: {}", err)))?;

    let config = AppConfig::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.database_url)
        .await
        .map_err(AppError::Database)?;

    let store = Arc::new(PgCommentStore::new(pool));
    let state = AppState::new(&config, store);
    let app = build_router(state, cors_layer(&config.cors_origin)?);

    tracing::info!(addr = %config.bind_addr, "Server listening");
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("bind failed: {}", err)))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|err| AppError::Internal(format!("server error: {}", err)))
}

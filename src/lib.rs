pub(crate) mod api;
pub mod client;
pub(crate) mod core;
pub(crate) mod db;
pub mod media;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{extract::Request, ServiceExt};

pub use crate::db::types::{ExamType, UserRole};

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::repositories::exams::PgExamStore;
use crate::services::storage::MediaStorage;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db_pool = db::init_pool(&settings).await?;
    db::run_migrations(&db_pool).await?;

    let media = MediaStorage::from_settings(&settings).await?;
    tracing::info!(backend = media.kind(), "Timetable media storage ready");

    let state = AppState::new(settings, Arc::new(PgExamStore::new(db_pool.clone())), media);
    let app = api::router::app(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        prefix = %state.settings().api().api_prefix,
        "Campus exams API listening"
    );

    let result = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(core::shutdown::shutdown_signal())
        .await;

    db_pool.close().await;
    tracing::info!("Database pool closed");

    result?;

    Ok(())
}

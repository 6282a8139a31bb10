mod auth;
mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod forms;
mod mapping;
mod models;
mod pagination;
mod routes;
mod storage;
mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::{
    auth::JwtKeys,
    catalog::Catalog,
    config::Config,
    storage::{FileStorage, LocalFileStorage},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
    pub storage: Arc<dyn FileStorage>,
    pub jwt: JwtKeys,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movies_api=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config.database_url).await?;
    let storage = LocalFileStorage::new(&config.uploads_dir, &config.public_files_url);

    let state = Arc::new(AppState {
        config: config.clone(),
        catalog: Catalog::new(db),
        storage: Arc::new(storage),
        jwt: JwtKeys::new(&config.jwt_secret),
    });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    /// Root directory of the local file store; served under `/files`.
    pub uploads_dir: PathBuf,
    /// Prefix of the URLs handed out for stored files, e.g. `http://localhost:3000/files`.
    pub public_files_url: String,
    pub frontend_url: Option<String>,
    pub max_records_per_page: u64,
    pub landing_page_size: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movies.db?mode=rwc".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let uploads_dir: PathBuf =
            std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()).into();

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let frontend_url = std::env::var("FRONTEND_URL").ok().filter(|s| !s.is_empty());

        let max_records_per_page: u64 = std::env::var("MAX_RECORDS_PER_PAGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50);

        let landing_page_size: u64 =
            std::env::var("LANDING_PAGE_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(6);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            jwt_secret,
            uploads_dir,
            public_files_url: format!("{}/files", public_base_url.trim_end_matches('/')),
            frontend_url,
            max_records_per_page,
            landing_page_size,
        })
    }
}

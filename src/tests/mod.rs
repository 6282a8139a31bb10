//! Router-level tests against a throwaway SQLite file and upload directory.


use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use sea_orm::{ActiveModelTrait, Set};
use serde::de::DeserializeOwned;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    AppState,
    auth::{self, Claims, JwtKeys},
    catalog::Catalog,
    config::Config,
    db,
    entities::user,
    models::MovieForm,
    routes,
    storage::LocalFileStorage,
};

pub(crate) const SECRET: &str = "integration-secret";
pub(crate) const FILES_BASE: &str = "http://localhost/files";
const BOUNDARY: &str = "----movies-api-test-boundary";

pub(crate) struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let database_url = format!("sqlite://{}?mode=rwc", dir.path().join("movies.db").display());
        let db = db::connect_and_migrate(&database_url).await.expect("migrate test database");

        let config = Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url,
            jwt_secret: SECRET.to_string(),
            uploads_dir: dir.path().join("uploads"),
            public_files_url: FILES_BASE.to_string(),
            frontend_url: None,
            max_records_per_page: 50,
            landing_page_size: 6,
        };
        let storage = LocalFileStorage::new(&config.uploads_dir, &config.public_files_url);

        let state = Arc::new(AppState {
            config: Arc::new(config),
            catalog: Catalog::new(db),
            storage: Arc::new(storage),
            jwt: JwtKeys::new(SECRET),
        });

        Self { router: routes::router(state.clone()), state, dir }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request("GET", uri, token).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request("DELETE", uri, token).body(Body::empty()).unwrap()).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        let request = request(method, uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send_form(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        form: MultipartBody,
    ) -> Response<Body> {
        let request = request(method, uri, token)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(form.finish()))
            .unwrap();
        self.send(request).await
    }

    /// Inserts an account and returns a bearer token for it.
    pub async fn user_token(&self, id: &str, email: &str) -> String {
        user::ActiveModel { id: Set(id.to_string()), email: Set(email.to_string()) }
            .insert(self.catalog().db())
            .await
            .expect("insert user");
        token(email, None)
    }

    pub async fn admin_token(&self) -> String {
        user::ActiveModel { id: Set("admin".to_string()), email: Set("admin@example.com".to_string()) }
            .insert(self.catalog().db())
            .await
            .expect("insert admin");
        token("admin@example.com", Some(auth::ADMIN_ROLE))
    }

    /// Maps a public file URL back to the local path it was written to.
    pub fn stored_path(&self, url: &str) -> std::path::PathBuf {
        let relative = url.strip_prefix(FILES_BASE).expect("url under files base");
        self.dir.path().join("uploads").join(relative.trim_start_matches('/'))
    }
}

fn request(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub(crate) fn token(email: &str, role: Option<&str>) -> String {
    let claims = Claims {
        email: email.to_string(),
        role: role.map(str::to_string),
        exp: jiff::Timestamp::now().as_second() + 3600,
    };
    auth::sign(SECRET, &claims)
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(crate) fn total_records(response: &Response<Body>) -> u64 {
    response.headers()[crate::pagination::TOTAL_RECORDS_HEADER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap()
}

pub(crate) fn movie_form(title: &str, release_date: &str) -> MovieForm {
    MovieForm {
        title: title.to_string(),
        summary: None,
        trailer: None,
        in_theaters: false,
        release_date: release_date.parse().expect("test date"),
        poster: None,
        genre_ids: Vec::new(),
        movie_theater_ids: Vec::new(),
        actors: Vec::new(),
    }
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub(crate) struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(content);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

mod actors;
mod genres;
mod movie_theaters;
mod movies;
mod ratings;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    AppState,
    auth::{self, Claims},
    entities::user,
    error::{AppError, AppResult},
    pagination::TOTAL_RECORDS_HEADER,
};

/// Posters and pictures travel inside multipart bodies.
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/api/movies", get(movies::landing).post(movies::create))
        .route("/api/movies/filter", get(movies::filter))
        .route("/api/movies/postget", get(movies::post_get))
        .route("/api/movies/putget/{id}", get(movies::put_get))
        .route("/api/movies/{id}", get(movies::detail).put(movies::update).delete(movies::delete))
        .route("/api/actors", get(actors::list).post(actors::create))
        .route("/api/actors/searchByName/{query}", get(actors::search_by_name))
        .route("/api/actors/{id}", get(actors::get).put(actors::update).delete(actors::delete))
        .route("/api/genres", get(genres::list).post(genres::create))
        .route("/api/genres/all", get(genres::all))
        .route("/api/genres/{id}", get(genres::get).put(genres::update).delete(genres::delete))
        .route("/api/movie-theaters", get(movie_theaters::list).post(movie_theaters::create))
        .route(
            "/api/movie-theaters/{id}",
            get(movie_theaters::get).put(movie_theaters::update).delete(movie_theaters::delete),
        )
        .route("/api/ratings", axum::routing::post(ratings::rate))
        .layer(middleware::from_fn_with_state(state.clone(), auth::authenticate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state.clone());

    Router::new()
        .merge(api)
        .nest_service("/files", ServeDir::new(&state.config.uploads_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors(state.config.frontend_url.as_deref())),
        )
}

fn cors(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(_)) => {
            warn!("FRONTEND_URL is not a valid origin, allowing any");
            AllowOrigin::any()
        },
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(TOTAL_RECORDS_HEADER)])
}

/// Resolves the account behind a verified token. A token whose email has no
/// account is treated as unauthenticated.
async fn current_user(state: &AppState, claims: &Claims) -> AppResult<user::Model> {
    state.catalog.find_user_by_email(&claims.email).await?.ok_or(AppError::Unauthorized)
}

/// Removes a stored file after its row is gone. Failures leave an orphaned file
/// behind and are only logged.
async fn discard_file(state: &AppState, path: Option<&str>, container: &str) {
    if let Err(err) = state.storage.delete(path, container).await {
        warn!(error = %err, path = ?path, container, "failed to delete stored file");
    }
}

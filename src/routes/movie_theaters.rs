use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult},
    models::{MovieTheaterCreation, MovieTheaterDto},
    pagination::{Page, PaginationQuery},
    validation::{ValidJson, ValidQuery},
};

pub async fn list(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<PaginationQuery>,
) -> AppResult<Page<MovieTheaterDto>> {
    let page = query.normalize(state.config.max_records_per_page);
    Ok(state.catalog.list_theaters(page).await?.map(MovieTheaterDto::from))
}

pub async fn get(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieTheaterDto>> {
    let theater = state.catalog.find_theater(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(theater.into()))
}

pub async fn create(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<MovieTheaterCreation>,
) -> AppResult<StatusCode> {
    let theater = state.catalog.create_theater(&input).await?;
    info!(movie_theater_id = theater.id, "movie theater created");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidJson(input): ValidJson<MovieTheaterCreation>,
) -> AppResult<StatusCode> {
    state.catalog.update_theater(id, &input).await?;
    info!(movie_theater_id = id, "movie theater updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.catalog.delete_theater(id).await?;
    info!(movie_theater_id = id, "movie theater deleted");
    Ok(StatusCode::NO_CONTENT)
}

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
    models::{GenreCreation, GenreDto},
    pagination::{Page, PaginationQuery},
    validation::{ValidJson, ValidQuery},
};

pub async fn list(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<PaginationQuery>,
) -> AppResult<Page<GenreDto>> {
    let page = query.normalize(state.config.max_records_per_page);
    Ok(state.catalog.list_genres(page).await?.map(GenreDto::from))
}

pub async fn all(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<GenreDto>>> {
    let genres = state.catalog.all_genres().await?;
    Ok(Json(genres.into_iter().map(GenreDto::from).collect()))
}

pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> AppResult<Json<GenreDto>> {
    let genre = state.catalog.find_genre(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(genre.into()))
}

pub async fn create(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<GenreCreation>,
) -> AppResult<StatusCode> {
    let genre = state.catalog.create_genre(input.name.trim()).await?;
    info!(genre_id = genre.id, "genre created");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidJson(input): ValidJson<GenreCreation>,
) -> AppResult<StatusCode> {
    state.catalog.update_genre(id, input.name.trim()).await?;
    info!(genre_id = id, "genre updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.catalog.delete_genre(id).await?;
    info!(genre_id = id, "genre deleted");
    Ok(StatusCode::NO_CONTENT)
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::info;

use super::{current_user, discard_file};
use crate::{
    AppState,
    auth::{AdminUser, MaybeUser},
    catalog::{self, MovieFilter},
    error::{AppError, AppResult},
    forms::FormData,
    models::{LandingPageDto, MovieDetailDto, MovieDto, MovieForm, MoviePostGetDto, MoviePutGetDto},
    pagination::Page,
    storage::MOVIES_CONTAINER,
    validation::ValidQuery,
};

pub async fn landing(State(state): State<Arc<AppState>>) -> AppResult<Json<LandingPageDto>> {
    let landing = state.catalog.landing_page(catalog::today(), state.config.landing_page_size).await?;
    Ok(Json(landing))
}

pub async fn filter(
    State(state): State<Arc<AppState>>,
    ValidQuery(filter): ValidQuery<MovieFilter>,
) -> AppResult<Page<MovieDto>> {
    let page = filter.pagination().normalize(state.config.max_records_per_page);
    let movies = state.catalog.filter_movies(&filter, catalog::today(), page).await?;
    Ok(movies.map(MovieDto::from))
}

pub async fn detail(
    MaybeUser(claims): MaybeUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieDetailDto>> {
    let viewer = match &claims {
        Some(claims) => Some(current_user(&state, claims).await?.id),
        None => None,
    };

    let detail = state.catalog.movie_detail(id, viewer.as_deref()).await?;
    detail.map(Json).ok_or(AppError::NotFound)
}

pub async fn post_get(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<MoviePostGetDto>> {
    Ok(Json(state.catalog.movie_form_options().await?))
}

pub async fn put_get(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MoviePutGetDto>> {
    let options = state.catalog.movie_edit_options(id).await?;
    options.map(Json).ok_or(AppError::NotFound)
}

pub async fn create(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<Json<i32>> {
    let form = MovieForm::from_form(FormData::from_multipart(multipart).await?)?;
    state.catalog.check_movie_references(&form).await?;

    let poster = match &form.poster {
        Some(file) => Some(state.storage.save(MOVIES_CONTAINER, file).await?),
        None => None,
    };

    match state.catalog.create_movie(&form, poster.clone()).await {
        Ok(id) => {
            info!(movie_id = id, cast = form.actors.len(), "movie created");
            Ok(Json(id))
        },
        Err(err) => {
            discard_file(&state, poster.as_deref(), MOVIES_CONTAINER).await;
            Err(err)
        },
    }
}

pub async fn update(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> AppResult<StatusCode> {
    let movie = state.catalog.find_movie(id).await?.ok_or(AppError::NotFound)?;
    let form = MovieForm::from_form(FormData::from_multipart(multipart).await?)?;
    state.catalog.check_movie_references(&form).await?;

    // The old poster is only removed once the row points at the new one.
    let poster = match &form.poster {
        Some(file) => Some(state.storage.save(MOVIES_CONTAINER, file).await?),
        None => None,
    };
    let old_poster = movie.poster.clone();

    if let Err(err) = state.catalog.update_movie(movie, &form, poster.clone()).await {
        discard_file(&state, poster.as_deref(), MOVIES_CONTAINER).await;
        return Err(err);
    }
    if poster.is_some() {
        discard_file(&state, old_poster.as_deref(), MOVIES_CONTAINER).await;
    }

    info!(movie_id = id, "movie updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let movie = state.catalog.delete_movie(id).await?.ok_or(AppError::NotFound)?;
    discard_file(&state, movie.poster.as_deref(), MOVIES_CONTAINER).await;
    info!(movie_id = id, "movie deleted");
    Ok(StatusCode::NO_CONTENT)
}

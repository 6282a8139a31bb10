use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::info;

use super::discard_file;
use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult},
    forms::FormData,
    models::{ActorDto, ActorEdit, ActorForm, ActorSearchResult},
    pagination::{Page, PaginationQuery},
    storage::ACTORS_CONTAINER,
    validation::ValidQuery,
};

pub async fn list(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<PaginationQuery>,
) -> AppResult<Page<ActorDto>> {
    let page = query.normalize(state.config.max_records_per_page);
    Ok(state.catalog.list_actors(page).await?.map(ActorDto::from))
}

pub async fn get(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<ActorDto>> {
    let actor = state.catalog.find_actor(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(actor.into()))
}

pub async fn search_by_name(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> AppResult<Json<Vec<ActorSearchResult>>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let actors = state.catalog.search_actors(query).await?;
    Ok(Json(actors.into_iter().map(ActorSearchResult::from).collect()))
}

pub async fn create(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<StatusCode> {
    let form = ActorForm::from_form(FormData::from_multipart(multipart).await?)?;

    let picture = match &form.picture {
        Some(file) => Some(state.storage.save(ACTORS_CONTAINER, file).await?),
        None => None,
    };

    match state.catalog.create_actor(&form.name, form.date_of_birth, picture.clone()).await {
        Ok(actor) => {
            info!(actor_id = actor.id, "actor created");
            Ok(StatusCode::NO_CONTENT)
        },
        Err(err) => {
            discard_file(&state, picture.as_deref(), ACTORS_CONTAINER).await;
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
    let actor = state.catalog.find_actor(id).await?.ok_or(AppError::NotFound)?;
    let edit = ActorEdit::from_form(FormData::from_multipart(multipart).await?)?;

    let picture = match &edit.picture {
        Some(file) => Some(state.storage.edit(ACTORS_CONTAINER, actor.picture.as_deref(), file).await?),
        None => None,
    };

    state.catalog.update_actor(actor, edit.name, edit.date_of_birth, picture).await?;
    info!(actor_id = id, "actor updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    _: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let actor = state.catalog.delete_actor(id).await?.ok_or(AppError::NotFound)?;
    discard_file(&state, actor.picture.as_deref(), ACTORS_CONTAINER).await;
    info!(actor_id = id, "actor deleted");
    Ok(StatusCode::NO_CONTENT)
}

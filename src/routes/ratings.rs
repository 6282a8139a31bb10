use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use tracing::info;

use super::current_user;
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::RatingDto,
    validation::ValidJson,
};

pub async fn rate(
    AuthUser(claims): AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(input): ValidJson<RatingDto>,
) -> AppResult<StatusCode> {
    let user = current_user(&state, &claims).await?;
    if state.catalog.find_movie(input.movie_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    state.catalog.upsert_rating(input.movie_id, &user.id, input.rating).await?;
    info!(movie_id = input.movie_id, user_id = %user.id, rating = input.rating, "movie rated");
    Ok(StatusCode::NO_CONTENT)
}

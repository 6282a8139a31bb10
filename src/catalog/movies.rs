use std::collections::HashSet;

use jiff::civil::Date;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{Catalog, MovieFilter};
use crate::{
    entities::{
        actor, genre, movie, movie_theater, movie_theaters_movies, movies_actors, movies_genres,
        rating,
    },
    error::AppResult,
    mapping::{project_cast, project_genres, project_theaters},
    models::{
        GenreDto, LandingPageDto, MovieDetailDto, MovieDto, MovieForm, MoviePostGetDto,
        MoviePutGetDto, MovieTheaterDto,
    },
    pagination::{Page, PageRequest, paginate},
    validation::Violations,
};

impl Catalog {
    pub async fn landing_page(&self, today: Date, top: u64) -> AppResult<LandingPageDto> {
        let upcoming_releases = movie::Entity::find()
            .filter(movie::Column::ReleaseDate.gt(today.to_string()))
            .order_by_asc(movie::Column::ReleaseDate)
            .limit(top)
            .all(&self.db)
            .await?;

        let in_theaters = movie::Entity::find()
            .filter(movie::Column::InTheaters.eq(true))
            .order_by_asc(movie::Column::ReleaseDate)
            .limit(top)
            .all(&self.db)
            .await?;

        Ok(LandingPageDto {
            upcoming_releases: upcoming_releases.into_iter().map(MovieDto::from).collect(),
            in_theaters: in_theaters.into_iter().map(MovieDto::from).collect(),
        })
    }

    pub async fn filter_movies(
        &self,
        filter: &MovieFilter,
        today: Date,
        page: PageRequest,
    ) -> AppResult<Page<movie::Model>> {
        paginate(filter.select(today), page, &self.db).await
    }

    pub async fn find_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Full projection of a movie. `viewer` is the caller's user id, used for `userVote`.
    pub async fn movie_detail(&self, id: i32, viewer: Option<&str>) -> AppResult<Option<MovieDetailDto>> {
        let Some(movie) = self.find_movie(id).await? else {
            return Ok(None);
        };

        let genres = movies_genres::Entity::find()
            .filter(movies_genres::Column::MovieId.eq(id))
            .find_also_related(genre::Entity)
            .all(&self.db)
            .await?;
        let theaters = movie_theaters_movies::Entity::find()
            .filter(movie_theaters_movies::Column::MovieId.eq(id))
            .find_also_related(movie_theater::Entity)
            .all(&self.db)
            .await?;
        let cast = movies_actors::Entity::find()
            .filter(movies_actors::Column::MovieId.eq(id))
            .find_also_related(actor::Entity)
            .all(&self.db)
            .await?;

        let average_vote = self.average_rating(id).await?;
        let user_vote = match viewer {
            Some(user_id) => self.user_rating(id, user_id).await?.unwrap_or(0),
            None => 0,
        };

        Ok(Some(MovieDetailDto {
            movie: movie.into(),
            genres: project_genres(genres),
            movie_theaters: project_theaters(theaters),
            actors: project_cast(cast),
            average_vote,
            user_vote,
        }))
    }

    pub async fn movie_form_options(&self) -> AppResult<MoviePostGetDto> {
        Ok(MoviePostGetDto {
            genres: self.all_genres().await?.into_iter().map(GenreDto::from).collect(),
            movie_theaters: self.all_theaters().await?.into_iter().map(MovieTheaterDto::from).collect(),
        })
    }

    /// Edit-form payload: what the movie currently has next to what it could still get.
    pub async fn movie_edit_options(&self, id: i32) -> AppResult<Option<MoviePutGetDto>> {
        let Some(detail) = self.movie_detail(id, None).await? else {
            return Ok(None);
        };
        let options = self.movie_form_options().await?;

        let selected_genres = detail.genres.clone();
        let selected_ids: HashSet<i32> = selected_genres.iter().map(|g| g.id).collect();
        let genres = options.genres.into_iter().filter(|g| !selected_ids.contains(&g.id)).collect();

        let selected_movie_theaters = detail.movie_theaters.clone();
        let selected_ids: HashSet<i32> = selected_movie_theaters.iter().map(|t| t.id).collect();
        let movie_theaters =
            options.movie_theaters.into_iter().filter(|t| !selected_ids.contains(&t.id)).collect();

        let actors = detail.actors.clone();
        Ok(Some(MoviePutGetDto {
            movie: detail,
            selected_genres,
            genres,
            selected_movie_theaters,
            movie_theaters,
            actors,
        }))
    }

    /// Inserts the movie and its associations in one transaction and returns the new id.
    pub async fn create_movie(&self, form: &MovieForm, poster: Option<String>) -> AppResult<i32> {
        let txn = self.db.begin().await?;

        let movie = movie::ActiveModel {
            id: Default::default(),
            title: Set(form.title.clone()),
            summary: Set(form.summary.clone()),
            trailer: Set(form.trailer.clone()),
            in_theaters: Set(form.in_theaters),
            release_date: Set(form.release_date.to_string()),
            poster: Set(poster),
        }
        .insert(&txn)
        .await?;
        insert_associations(&txn, movie.id, form).await?;

        txn.commit().await?;
        Ok(movie.id)
    }

    /// Overwrites the scalar fields and replaces every association set. The
    /// poster is only touched when `poster` is `Some`.
    pub async fn update_movie(
        &self,
        movie: movie::Model,
        form: &MovieForm,
        poster: Option<String>,
    ) -> AppResult<()> {
        let id = movie.id;
        let txn = self.db.begin().await?;

        let mut model = movie.into_active_model();
        model.title = Set(form.title.clone());
        model.summary = Set(form.summary.clone());
        model.trailer = Set(form.trailer.clone());
        model.in_theaters = Set(form.in_theaters);
        model.release_date = Set(form.release_date.to_string());
        if let Some(poster) = poster {
            model.poster = Set(Some(poster));
        }
        model.update(&txn).await?;

        delete_associations(&txn, id).await?;
        insert_associations(&txn, id, form).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Removes the movie with its associations and ratings, returning the deleted row.
    pub async fn delete_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        let txn = self.db.begin().await?;

        let Some(movie) = movie::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        delete_associations(&txn, id).await?;
        rating::Entity::delete_many().filter(rating::Column::MovieId.eq(id)).exec(&txn).await?;
        movie::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(movie))
    }

    /// Rejects association ids that point at nothing.
    pub async fn check_movie_references(&self, form: &MovieForm) -> AppResult<()> {
        let mut v = Violations::default();

        if !form.genre_ids.is_empty() {
            let found = genre::Entity::find()
                .filter(genre::Column::Id.is_in(form.genre_ids.clone()))
                .count(&self.db)
                .await?;
            v.check(found == form.genre_ids.len() as u64, "genresIds", "contains an unknown genre");
        }
        if !form.movie_theater_ids.is_empty() {
            let found = movie_theater::Entity::find()
                .filter(movie_theater::Column::Id.is_in(form.movie_theater_ids.clone()))
                .count(&self.db)
                .await?;
            v.check(
                found == form.movie_theater_ids.len() as u64,
                "movieTheatersIds",
                "contains an unknown movie theater",
            );
        }
        if !form.actors.is_empty() {
            let found = actor::Entity::find()
                .filter(actor::Column::Id.is_in(form.actors.iter().map(|a| a.id)))
                .count(&self.db)
                .await?;
            v.check(found == form.actors.len() as u64, "actors", "contains an unknown actor");
        }

        v.finish()
    }
}

async fn delete_associations<C: ConnectionTrait>(conn: &C, movie_id: i32) -> AppResult<()> {
    movies_genres::Entity::delete_many()
        .filter(movies_genres::Column::MovieId.eq(movie_id))
        .exec(conn)
        .await?;
    movie_theaters_movies::Entity::delete_many()
        .filter(movie_theaters_movies::Column::MovieId.eq(movie_id))
        .exec(conn)
        .await?;
    movies_actors::Entity::delete_many()
        .filter(movies_actors::Column::MovieId.eq(movie_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Cast rows take their position in the submitted list as display order.
async fn insert_associations<C: ConnectionTrait>(conn: &C, movie_id: i32, form: &MovieForm) -> AppResult<()> {
    if !form.genre_ids.is_empty() {
        let rows = form.genre_ids.iter().map(|&genre_id| movies_genres::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(genre_id),
        });
        movies_genres::Entity::insert_many(rows).exec_without_returning(conn).await?;
    }

    if !form.movie_theater_ids.is_empty() {
        let rows = form.movie_theater_ids.iter().map(|&movie_theater_id| {
            movie_theaters_movies::ActiveModel {
                movie_id: Set(movie_id),
                movie_theater_id: Set(movie_theater_id),
            }
        });
        movie_theaters_movies::Entity::insert_many(rows).exec_without_returning(conn).await?;
    }

    if !form.actors.is_empty() {
        let rows = form.actors.iter().zip(0..).map(|(cast, display_order)| movies_actors::ActiveModel {
            movie_id: Set(movie_id),
            actor_id: Set(cast.id),
            character: Set(cast.character.clone()),
            display_order: Set(display_order),
        });
        movies_actors::Entity::insert_many(rows).exec_without_returning(conn).await?;
    }

    Ok(())
}

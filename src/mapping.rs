//! Entity to DTO conversions, including the nested projections of a movie's
//! join rows.

use crate::{
    entities::{actor, genre, movie, movie_theater, movie_theaters_movies, movies_actors, movies_genres},
    models::{
        ActorDto, ActorSearchResult, GenreDto, MovieActorDto, MovieDto, MovieTheaterDto,
    },
};

impl From<genre::Model> for GenreDto {
    fn from(genre: genre::Model) -> Self {
        Self { id: genre.id, name: genre.name }
    }
}

impl From<actor::Model> for ActorDto {
    fn from(actor: actor::Model) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            date_of_birth: actor.date_of_birth,
            picture: actor.picture,
        }
    }
}

impl From<actor::Model> for ActorSearchResult {
    fn from(actor: actor::Model) -> Self {
        Self { id: actor.id, name: actor.name, picture: actor.picture }
    }
}

impl From<movie_theater::Model> for MovieTheaterDto {
    fn from(theater: movie_theater::Model) -> Self {
        Self {
            id: theater.id,
            name: theater.name,
            latitude: theater.latitude,
            longitude: theater.longitude,
        }
    }
}

impl From<movie::Model> for MovieDto {
    fn from(movie: movie::Model) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            summary: movie.summary,
            trailer: movie.trailer,
            in_theaters: movie.in_theaters,
            release_date: movie.release_date,
            poster: movie.poster,
        }
    }
}

/// Join rows whose target row vanished are skipped.
pub fn project_genres(rows: Vec<(movies_genres::Model, Option<genre::Model>)>) -> Vec<GenreDto> {
    let mut genres: Vec<GenreDto> =
        rows.into_iter().filter_map(|(_, genre)| genre.map(GenreDto::from)).collect();
    genres.sort_by(|a, b| a.name.cmp(&b.name));
    genres
}

pub fn project_theaters(
    rows: Vec<(movie_theaters_movies::Model, Option<movie_theater::Model>)>,
) -> Vec<MovieTheaterDto> {
    let mut theaters: Vec<MovieTheaterDto> =
        rows.into_iter().filter_map(|(_, theater)| theater.map(MovieTheaterDto::from)).collect();
    theaters.sort_by(|a, b| a.name.cmp(&b.name));
    theaters
}

/// Cast members ordered by their display order.
pub fn project_cast(rows: Vec<(movies_actors::Model, Option<actor::Model>)>) -> Vec<MovieActorDto> {
    let mut cast: Vec<MovieActorDto> = rows
        .into_iter()
        .filter_map(|(link, actor)| {
            let actor = actor?;
            Some(MovieActorDto {
                id: link.actor_id,
                name: actor.name,
                picture: actor.picture,
                character: link.character,
                order: link.display_order,
            })
        })
        .collect();
    cast.sort_by_key(|a| a.order);
    cast
}

use std::collections::HashSet;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    forms::{FormData, UploadedFile},
    validation::{Validate, Violations},
};

pub const GENRE_NAME_MAX_LEN: usize = 50;
pub const ACTOR_NAME_MAX_LEN: usize = 120;
pub const THEATER_NAME_MAX_LEN: usize = 75;
pub const MOVIE_TITLE_MAX_LEN: usize = 300;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// Genres

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreDto {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreCreation {
    #[serde(default)]
    pub name: String,
}

impl Validate for GenreCreation {
    fn validate(&self) -> AppResult<()> {
        let mut v = Violations::default();
        if let Some(name) = v.required("name", Some(&self.name)) {
            v.max_len("name", name, GENRE_NAME_MAX_LEN);
            v.first_letter_uppercase("name", name);
        }
        v.finish()
    }
}

// Actors

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDto {
    pub id: i32,
    pub name: String,
    pub date_of_birth: String,
    pub picture: Option<String>,
}

/// Search hit used by the cast picker.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSearchResult {
    pub id: i32,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ActorForm {
    pub name: String,
    pub date_of_birth: Date,
    pub picture: Option<UploadedFile>,
}

impl ActorForm {
    pub fn from_form(mut form: FormData) -> AppResult<Self> {
        let mut v = Violations::default();
        let name = v.required("name", form.text("name")).map(str::to_string);
        if let Some(name) = &name {
            v.max_len("name", name, ACTOR_NAME_MAX_LEN);
        }
        let date_of_birth = form.date("dateOfBirth", &mut v);
        if form.text("dateOfBirth").is_none() {
            v.push("dateOfBirth", "is required");
        }
        v.finish()?;

        let (Some(name), Some(date_of_birth)) = (name, date_of_birth) else {
            return Err(AppError::invalid("form", "incomplete actor"));
        };
        Ok(Self { name, date_of_birth, picture: form.take_file("picture") })
    }
}

/// Partial update: only the parts present in the form are applied.
#[derive(Clone, Debug, Default)]
pub struct ActorEdit {
    pub name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub picture: Option<UploadedFile>,
}

impl ActorEdit {
    pub fn from_form(mut form: FormData) -> AppResult<Self> {
        let mut v = Violations::default();
        let name = form.text("name").map(str::to_string);
        if let Some(name) = &name {
            v.max_len("name", name, ACTOR_NAME_MAX_LEN);
        }
        let date_of_birth = form.date("dateOfBirth", &mut v);
        v.finish()?;
        Ok(Self { name, date_of_birth, picture: form.take_file("picture") })
    }
}

// Movie theaters

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieTheaterDto {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieTheaterCreation {
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Validate for MovieTheaterCreation {
    fn validate(&self) -> AppResult<()> {
        let mut v = Violations::default();
        if let Some(name) = v.required("name", Some(&self.name)) {
            v.max_len("name", name, THEATER_NAME_MAX_LEN);
        }
        v.range("latitude", self.latitude, -90.0, 90.0);
        v.range("longitude", self.longitude, -180.0, 180.0);
        v.finish()
    }
}

// Movies

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub trailer: Option<String>,
    pub in_theaters: bool,
    pub release_date: String,
    pub poster: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieActorDto {
    pub id: i32,
    pub name: String,
    pub picture: Option<String>,
    pub character: Option<String>,
    pub order: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailDto {
    #[serde(flatten)]
    pub movie: MovieDto,
    pub genres: Vec<GenreDto>,
    pub movie_theaters: Vec<MovieTheaterDto>,
    /// Sorted by cast order.
    pub actors: Vec<MovieActorDto>,
    pub average_vote: f64,
    pub user_vote: i32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageDto {
    pub upcoming_releases: Vec<MovieDto>,
    pub in_theaters: Vec<MovieDto>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePostGetDto {
    pub genres: Vec<GenreDto>,
    pub movie_theaters: Vec<MovieTheaterDto>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePutGetDto {
    pub movie: MovieDetailDto,
    pub selected_genres: Vec<GenreDto>,
    pub genres: Vec<GenreDto>,
    pub selected_movie_theaters: Vec<MovieTheaterDto>,
    pub movie_theaters: Vec<MovieTheaterDto>,
    pub actors: Vec<MovieActorDto>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CastEntry {
    pub id: i32,
    #[serde(default)]
    pub character: Option<String>,
}

/// Create/edit payload for a movie, decoded from a multipart form.
#[derive(Clone, Debug)]
pub struct MovieForm {
    pub title: String,
    pub summary: Option<String>,
    pub trailer: Option<String>,
    pub in_theaters: bool,
    pub release_date: Date,
    pub poster: Option<UploadedFile>,
    pub genre_ids: Vec<i32>,
    pub movie_theater_ids: Vec<i32>,
    /// Cast in submission order; the position becomes the display order.
    pub actors: Vec<CastEntry>,
}

impl MovieForm {
    pub fn from_form(mut form: FormData) -> AppResult<Self> {
        let mut v = Violations::default();

        let title = v.required("title", form.text("title")).map(str::to_string);
        if let Some(title) = &title {
            v.max_len("title", title, MOVIE_TITLE_MAX_LEN);
        }
        let release_date = form.date("releaseDate", &mut v);
        if form.text("releaseDate").is_none() {
            v.push("releaseDate", "is required");
        }
        let in_theaters = form.flag("inTheaters", &mut v);

        let genre_ids: Vec<i32> = dedup(form.json("genresIds", &mut v));
        let movie_theater_ids: Vec<i32> = dedup(form.json("movieTheatersIds", &mut v));
        let actors: Vec<CastEntry> = form.json("actors", &mut v);

        let mut seen = HashSet::new();
        if actors.iter().any(|a| !seen.insert(a.id)) {
            v.push("actors", "an actor can only appear once in the cast");
        }

        v.finish()?;

        let (Some(title), Some(release_date)) = (title, release_date) else {
            return Err(AppError::invalid("form", "incomplete movie"));
        };

        Ok(Self {
            title,
            summary: form.text("summary").map(str::to_string),
            trailer: form.text("trailer").map(str::to_string),
            in_theaters,
            release_date,
            poster: form.take_file("poster"),
            genre_ids,
            movie_theater_ids,
            actors: actors
                .into_iter()
                .map(|a| CastEntry { character: a.character.filter(|c| !c.trim().is_empty()), ..a })
                .collect(),
        })
    }
}

/// Keeps the first occurrence of every id.
fn dedup(ids: Vec<i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

// Ratings

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDto {
    pub movie_id: i32,
    pub rating: i32,
}

impl Validate for RatingDto {
    fn validate(&self) -> AppResult<()> {
        let mut v = Violations::default();
        v.range("rating", self.rating, MIN_RATING, MAX_RATING);
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violations<T: std::fmt::Debug>(result: AppResult<T>) -> Vec<String> {
        match result {
            Err(AppError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn genre_name_rules() {
        assert!(GenreCreation { name: "Drama".into() }.validate().is_ok());
        assert_eq!(
            violations(GenreCreation { name: "drama".into() }.validate()),
            vec!["name: first letter should be uppercase"]
        );
        assert_eq!(violations(GenreCreation { name: " ".into() }.validate()), vec!["name: is required"]);
        assert_eq!(
            violations(GenreCreation { name: format!("D{}", "a".repeat(50)) }.validate()),
            vec!["name: must be at most 50 characters"]
        );
    }

    #[test]
    fn theater_coordinates_are_bounded() {
        let theater = MovieTheaterCreation { name: "Rex".into(), latitude: 91.0, longitude: -181.0 };
        assert_eq!(
            violations(theater.validate()),
            vec!["latitude: must be between -90 and 90", "longitude: must be between -180 and 180"]
        );
    }

    #[test]
    fn movie_form_collects_every_problem() {
        let mut form = FormData::default();
        form.insert_text("releaseDate", "yesterday");
        form.insert_text("genresIds", "nope");
        let messages = violations(MovieForm::from_form(form));
        assert_eq!(messages.len(), 3);
        assert!(messages.contains(&"title: is required".to_string()));
        assert!(messages.iter().any(|m| m.starts_with("releaseDate:")));
        assert!(messages.iter().any(|m| m.starts_with("genresIds:")));
    }

    #[test]
    fn movie_form_keeps_cast_order_and_dedups_ids() {
        let mut form = FormData::default();
        form.insert_text("title", "Heat");
        form.insert_text("releaseDate", "1995-12-15");
        form.insert_text("genresIds", "[3,1,3]");
        form.insert_text("actors", r#"[{"id":9,"character":"McCauley"},{"id":2,"character":" "}]"#);
        let movie = MovieForm::from_form(form).unwrap();
        assert_eq!(movie.genre_ids, vec![3, 1]);
        assert!(movie.movie_theater_ids.is_empty());
        assert_eq!(movie.actors[0], CastEntry { id: 9, character: Some("McCauley".into()) });
        assert_eq!(movie.actors[1], CastEntry { id: 2, character: None });
        assert!(!movie.in_theaters);
    }

    #[test]
    fn repeated_cast_member_is_rejected() {
        let mut form = FormData::default();
        form.insert_text("title", "Heat");
        form.insert_text("releaseDate", "1995-12-15");
        form.insert_text("actors", r#"[{"id":9},{"id":9}]"#);
        assert_eq!(
            violations(MovieForm::from_form(form)),
            vec!["actors: an actor can only appear once in the cast"]
        );
    }

    #[test]
    fn rating_must_be_in_range() {
        assert!(RatingDto { movie_id: 1, rating: 3 }.validate().is_ok());
        assert_eq!(
            violations(RatingDto { movie_id: 1, rating: 0 }.validate()),
            vec!["rating: must be between 1 and 5"]
        );
    }
}

pub mod actor;
pub mod genre;
pub mod movie;
pub mod movie_theater;
pub mod movie_theaters_movies;
pub mod movies_actors;
pub mod movies_genres;
pub mod rating;
pub mod user;

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub trailer: Option<String>,
    pub in_theaters: bool,
    /// ISO `YYYY-MM-DD`, compared lexically against today's date.
    pub release_date: String,
    pub poster: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movies_actors::Entity")]
    MoviesActors,
    #[sea_orm(has_many = "super::movies_genres::Entity")]
    MoviesGenres,
    #[sea_orm(has_many = "super::movie_theaters_movies::Entity")]
    MovieTheatersMovies,
    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
}

impl Related<super::movies_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoviesActors.def()
    }
}

impl Related<super::movies_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoviesGenres.def()
    }
}

impl Related<super::movie_theaters_movies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieTheatersMovies.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

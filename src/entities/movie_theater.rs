use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie_theaters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_theaters_movies::Entity")]
    MovieTheatersMovies,
}

impl Related<super::movie_theaters_movies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieTheatersMovies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

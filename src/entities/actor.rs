use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// ISO `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub picture: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movies_actors::Entity")]
    MoviesActors,
}

impl Related<super::movies_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MoviesActors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

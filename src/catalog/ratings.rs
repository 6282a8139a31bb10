use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set,
    sea_query::{Expr, Func, OnConflict, SimpleExpr},
};

use super::Catalog;
use crate::{
    entities::{rating, user},
    error::AppResult,
};

impl Catalog {
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find().filter(user::Column::Email.eq(email)).one(&self.db).await?)
    }

    /// A single `INSERT .. ON CONFLICT DO UPDATE`, so repeated votes converge on one row.
    pub async fn upsert_rating(&self, movie_id: i32, user_id: &str, rate: i32) -> AppResult<()> {
        let model = rating::ActiveModel {
            movie_id: Set(movie_id),
            user_id: Set(user_id.to_string()),
            rate: Set(rate),
        };

        rating::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([rating::Column::MovieId, rating::Column::UserId])
                    .update_column(rating::Column::Rate)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    /// Mean of all votes for the movie, `0.0` when nobody has voted.
    pub async fn average_rating(&self, movie_id: i32) -> AppResult<f64> {
        let average = SimpleExpr::from(Func::avg(Expr::col((rating::Entity, rating::Column::Rate))));

        let value: Option<Option<f64>> = rating::Entity::find()
            .select_only()
            .column_as(average, "average")
            .filter(rating::Column::MovieId.eq(movie_id))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(value.flatten().unwrap_or(0.0))
    }

    pub async fn user_rating(&self, movie_id: i32, user_id: &str) -> AppResult<Option<i32>> {
        let rating = rating::Entity::find_by_id((movie_id, user_id.to_string())).one(&self.db).await?;
        Ok(rating.map(|r| r.rate))
    }
}

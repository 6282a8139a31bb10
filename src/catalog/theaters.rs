use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::Catalog;
use crate::{
    entities::{movie_theater, movie_theaters_movies},
    error::{AppError, AppResult},
    models::MovieTheaterCreation,
    pagination::{Page, PageRequest, paginate},
};

impl Catalog {
    pub async fn list_theaters(&self, page: PageRequest) -> AppResult<Page<movie_theater::Model>> {
        let select = movie_theater::Entity::find().order_by_asc(movie_theater::Column::Name);
        paginate(select, page, &self.db).await
    }

    pub async fn all_theaters(&self) -> AppResult<Vec<movie_theater::Model>> {
        Ok(movie_theater::Entity::find()
            .order_by_asc(movie_theater::Column::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn find_theater(&self, id: i32) -> AppResult<Option<movie_theater::Model>> {
        Ok(movie_theater::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create_theater(&self, input: &MovieTheaterCreation) -> AppResult<movie_theater::Model> {
        let model = movie_theater::ActiveModel {
            id: Default::default(),
            name: Set(input.name.trim().to_string()),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
        };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn update_theater(
        &self,
        id: i32,
        input: &MovieTheaterCreation,
    ) -> AppResult<movie_theater::Model> {
        let theater = self.find_theater(id).await?.ok_or(AppError::NotFound)?;
        let mut model = theater.into_active_model();
        model.name = Set(input.name.trim().to_string());
        model.latitude = Set(input.latitude);
        model.longitude = Set(input.longitude);
        Ok(model.update(&self.db).await?)
    }

    pub async fn delete_theater(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        movie_theaters_movies::Entity::delete_many()
            .filter(movie_theaters_movies::Column::MovieTheaterId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = movie_theater::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}

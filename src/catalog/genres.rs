use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::Catalog;
use crate::{
    entities::{genre, movies_genres},
    error::{AppError, AppResult},
    pagination::{Page, PageRequest, paginate},
};

impl Catalog {
    pub async fn list_genres(&self, page: PageRequest) -> AppResult<Page<genre::Model>> {
        paginate(genre::Entity::find().order_by_asc(genre::Column::Name), page, &self.db).await
    }

    pub async fn all_genres(&self) -> AppResult<Vec<genre::Model>> {
        Ok(genre::Entity::find().order_by_asc(genre::Column::Name).all(&self.db).await?)
    }

    pub async fn find_genre(&self, id: i32) -> AppResult<Option<genre::Model>> {
        Ok(genre::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create_genre(&self, name: &str) -> AppResult<genre::Model> {
        let model = genre::ActiveModel { id: Default::default(), name: Set(name.to_string()) };
        Ok(model.insert(&self.db).await?)
    }

    pub async fn update_genre(&self, id: i32, name: &str) -> AppResult<genre::Model> {
        let genre = self.find_genre(id).await?.ok_or(AppError::NotFound)?;
        let mut model = genre.into_active_model();
        model.name = Set(name.to_string());
        Ok(model.update(&self.db).await?)
    }

    /// Drops the genre together with its movie links.
    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;

        movies_genres::Entity::delete_many()
            .filter(movies_genres::Column::GenreId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = genre::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}

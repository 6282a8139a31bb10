use jiff::civil::Date;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
    sea_query::{Alias, Expr, Func},
};

use super::Catalog;
use crate::{
    entities::{actor, movies_actors},
    error::AppResult,
    pagination::{Page, PageRequest, paginate},
};

pub const ACTOR_SEARCH_LIMIT: u64 = 5;

impl Catalog {
    pub async fn list_actors(&self, page: PageRequest) -> AppResult<Page<actor::Model>> {
        paginate(actor::Entity::find().order_by_asc(actor::Column::Name), page, &self.db).await
    }

    pub async fn find_actor(&self, id: i32) -> AppResult<Option<actor::Model>> {
        Ok(actor::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Case-insensitive name match, best alphabetical hits first.
    pub async fn search_actors(&self, query: &str) -> AppResult<Vec<actor::Model>> {
        let matches = Expr::expr(
            Func::cust(Alias::new("instr"))
                .arg(Func::lower(Expr::col((actor::Entity, actor::Column::Name))))
                .arg(Func::lower(Expr::val(query))),
        )
        .gt(0);

        Ok(actor::Entity::find()
            .filter(matches)
            .order_by_asc(actor::Column::Name)
            .limit(ACTOR_SEARCH_LIMIT)
            .all(&self.db)
            .await?)
    }

    pub async fn create_actor(
        &self,
        name: &str,
        date_of_birth: Date,
        picture: Option<String>,
    ) -> AppResult<actor::Model> {
        let model = actor::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
            date_of_birth: Set(date_of_birth.to_string()),
            picture: Set(picture),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Applies only the fields that are `Some`.
    pub async fn update_actor(
        &self,
        actor: actor::Model,
        name: Option<String>,
        date_of_birth: Option<Date>,
        picture: Option<String>,
    ) -> AppResult<actor::Model> {
        let mut model = actor.into_active_model();
        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(date_of_birth) = date_of_birth {
            model.date_of_birth = Set(date_of_birth.to_string());
        }
        if let Some(picture) = picture {
            model.picture = Set(Some(picture));
        }
        Ok(model.update(&self.db).await?)
    }

    /// Removes the actor and their cast entries, returning the deleted row.
    pub async fn delete_actor(&self, id: i32) -> AppResult<Option<actor::Model>> {
        let txn = self.db.begin().await?;

        let Some(actor) = actor::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        movies_actors::Entity::delete_many()
            .filter(movies_actors::Column::ActorId.eq(id))
            .exec(&txn)
            .await?;
        actor::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(actor))
    }
}

use jiff::civil::Date;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select,
    sea_query::{Alias, Expr, Func, Query, SimpleExpr},
};
use serde::Deserialize;

use crate::{
    entities::{movie, movies_genres},
    pagination::PaginationQuery,
};

/// Query string of `GET /api/movies/filter`. Pagination fields are inlined
/// because url-encoded numbers do not survive `#[serde(flatten)]`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieFilter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub in_theaters: bool,
    #[serde(default)]
    pub upcoming_releases: bool,
    /// `0` means no genre constraint.
    #[serde(default)]
    pub genre_id: i32,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub records_per_page: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MoviePredicate {
    /// Case-sensitive substring of the title.
    TitleContains(String),
    InTheaters,
    ReleasedAfter(Date),
    InGenre(i32),
}

impl MovieFilter {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery { page: self.page, records_per_page: self.records_per_page }
    }

    /// One predicate per supplied criterion; absent criteria add nothing.
    pub fn predicates(&self, today: Date) -> Vec<MoviePredicate> {
        let mut predicates = Vec::new();

        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            predicates.push(MoviePredicate::TitleContains(title.to_string()));
        }
        if self.in_theaters {
            predicates.push(MoviePredicate::InTheaters);
        }
        if self.upcoming_releases {
            predicates.push(MoviePredicate::ReleasedAfter(today));
        }
        if self.genre_id != 0 {
            predicates.push(MoviePredicate::InGenre(self.genre_id));
        }

        predicates
    }

    /// The filtered selection, sorted by title with id as tie-breaker.
    pub fn select(&self, today: Date) -> Select<movie::Entity> {
        let condition = self
            .predicates(today)
            .into_iter()
            .fold(Condition::all(), |cond, predicate| cond.add(predicate.into_expr()));

        movie::Entity::find()
            .filter(condition)
            .order_by_asc(movie::Column::Title)
            .order_by_asc(movie::Column::Id)
    }
}

impl MoviePredicate {
    pub fn into_expr(self) -> SimpleExpr {
        match self {
            // instr() keeps the match case-sensitive, unlike SQLite's LIKE.
            MoviePredicate::TitleContains(title) => Expr::expr(
                Func::cust(Alias::new("instr"))
                    .arg(Expr::col((movie::Entity, movie::Column::Title)))
                    .arg(title),
            )
            .gt(0),
            MoviePredicate::InTheaters => movie::Column::InTheaters.eq(true),
            MoviePredicate::ReleasedAfter(today) => movie::Column::ReleaseDate.gt(today.to_string()),
            MoviePredicate::InGenre(genre_id) => movie::Column::Id.in_subquery(
                Query::select()
                    .column(movies_genres::Column::MovieId)
                    .from(movies_genres::Entity)
                    .and_where(movies_genres::Column::GenreId.eq(genre_id))
                    .to_owned(),
            ),
        }
    }
}

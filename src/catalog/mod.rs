//! Database access for the catalog. Each submodule adds the queries for one
//! resource to [`Catalog`].

mod actors;
mod filter;
mod genres;
mod movies;
mod ratings;
mod theaters;

use jiff::{civil::Date, tz::TimeZone};
use sea_orm::DatabaseConnection;

pub use filter::MovieFilter;

#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Calendar date used for "upcoming" comparisons, evaluated in UTC.
pub fn today() -> Date {
    jiff::Timestamp::now().to_zoned(TimeZone::UTC).date()
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(pk_auto(Genres::Id))
                    .col(string_len(Genres::Name, 50))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(pk_auto(Actors::Id))
                    .col(string_len(Actors::Name, 120))
                    .col(string(Actors::DateOfBirth))
                    .col(string_null(Actors::Picture))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_actors_name")
                    .table(Actors::Table)
                    .col(Actors::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieTheaters::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieTheaters::Id))
                    .col(string_len(MovieTheaters::Name, 75))
                    .col(double(MovieTheaters::Latitude))
                    .col(double(MovieTheaters::Longitude))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 300))
                    .col(text_null(Movies::Summary))
                    .col(string_null(Movies::Trailer))
                    .col(boolean(Movies::InTheaters).default(false))
                    .col(string(Movies::ReleaseDate))
                    .col(string_null(Movies::Poster))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_title")
                    .table(Movies::Table)
                    .col(Movies::Title)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_release_date")
                    .table(Movies::Table)
                    .col(Movies::ReleaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoviesGenres::Table)
                    .if_not_exists()
                    .col(integer(MoviesGenres::MovieId))
                    .col(integer(MoviesGenres::GenreId))
                    .primary_key(Index::create().col(MoviesGenres::MovieId).col(MoviesGenres::GenreId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_genres_movie")
                            .from(MoviesGenres::Table, MoviesGenres::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_genres_genre")
                            .from(MoviesGenres::Table, MoviesGenres::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_genres_genre")
                    .table(MoviesGenres::Table)
                    .col(MoviesGenres::GenreId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieTheatersMovies::Table)
                    .if_not_exists()
                    .col(integer(MovieTheatersMovies::MovieId))
                    .col(integer(MovieTheatersMovies::MovieTheaterId))
                    .primary_key(
                        Index::create()
                            .col(MovieTheatersMovies::MovieId)
                            .col(MovieTheatersMovies::MovieTheaterId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_theaters_movies_movie")
                            .from(MovieTheatersMovies::Table, MovieTheatersMovies::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_theaters_movies_theater")
                            .from(MovieTheatersMovies::Table, MovieTheatersMovies::MovieTheaterId)
                            .to(MovieTheaters::Table, MovieTheaters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoviesActors::Table)
                    .if_not_exists()
                    .col(integer(MoviesActors::MovieId))
                    .col(integer(MoviesActors::ActorId))
                    .col(string_null(MoviesActors::Character))
                    .col(integer(MoviesActors::DisplayOrder))
                    .primary_key(Index::create().col(MoviesActors::MovieId).col(MoviesActors::ActorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_actors_movie")
                            .from(MoviesActors::Table, MoviesActors::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_actors_actor")
                            .from(MoviesActors::Table, MoviesActors::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MoviesActors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieTheatersMovies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MoviesGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieTheaters::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genres::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    Id,
    Name,
    DateOfBirth,
    Picture,
}

#[derive(DeriveIden)]
enum MovieTheaters {
    Table,
    Id,
    Name,
    Latitude,
    Longitude,
}

#[derive(DeriveIden)]
pub(crate) enum Movies {
    Table,
    Id,
    Title,
    Summary,
    Trailer,
    InTheaters,
    ReleaseDate,
    Poster,
}

#[derive(DeriveIden)]
enum MoviesGenres {
    Table,
    MovieId,
    GenreId,
}

#[derive(DeriveIden)]
enum MovieTheatersMovies {
    Table,
    MovieId,
    MovieTheaterId,
}

#[derive(DeriveIden)]
enum MoviesActors {
    Table,
    MovieId,
    ActorId,
    Character,
    DisplayOrder,
}

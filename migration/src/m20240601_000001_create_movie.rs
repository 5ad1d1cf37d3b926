use sea_orm_migration::{prelude::*, schema::*};

use crate::{bounded_string, bounded_string_null};

const SHORT: u32 = 128;
const URL: u32 = 512;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(bounded_string(Movie::Title, SHORT).unique_key().take())
                    .col(bounded_string_null(Movie::Year, SHORT))
                    .col(bounded_string_null(Movie::Rated, SHORT))
                    .col(bounded_string_null(Movie::Released, SHORT))
                    .col(bounded_string_null(Movie::Runtime, SHORT))
                    .col(bounded_string_null(Movie::Genre, SHORT))
                    .col(bounded_string_null(Movie::Director, SHORT))
                    .col(bounded_string_null(Movie::Writer, SHORT))
                    .col(bounded_string_null(Movie::Actors, SHORT))
                    .col(text_null(Movie::Plot))
                    .col(bounded_string_null(Movie::Language, SHORT))
                    .col(bounded_string_null(Movie::Country, SHORT))
                    .col(bounded_string_null(Movie::Awards, SHORT))
                    .col(bounded_string_null(Movie::Poster, URL))
                    .col(bounded_string_null(Movie::Metascore, SHORT))
                    .col(bounded_string_null(Movie::ImdbRating, SHORT))
                    .col(bounded_string_null(Movie::ImdbVotes, SHORT))
                    .col(bounded_string_null(Movie::ImdbId, SHORT))
                    .col(bounded_string_null(Movie::Kind, SHORT))
                    .col(bounded_string_null(Movie::Dvd, SHORT))
                    .col(bounded_string_null(Movie::BoxOffice, SHORT))
                    .col(bounded_string_null(Movie::Production, SHORT))
                    .col(bounded_string_null(Movie::Website, URL))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Movie {
    Table,
    Id,
    Title,
    Year,
    Rated,
    Released,
    Runtime,
    Genre,
    Director,
    Writer,
    Actors,
    Plot,
    Language,
    Country,
    Awards,
    Poster,
    Metascore,
    ImdbRating,
    ImdbVotes,
    ImdbId,
    Kind,
    Dvd,
    BoxOffice,
    Production,
    Website,
}

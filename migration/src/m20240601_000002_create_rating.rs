use sea_orm_migration::{prelude::*, schema::*};

use crate::{bounded_string, m20240601_000001_create_movie::Movie};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(pk_auto(Rating::Id))
                    .col(integer(Rating::MovieId))
                    .col(bounded_string(Rating::Source, 64))
                    .col(bounded_string(Rating::Value, 16))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_movie")
                            .from(Rating::Table, Rating::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rating_movie_source")
                    .table(Rating::Table)
                    .col(Rating::MovieId)
                    .col(Rating::Source)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rating::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    Id,
    MovieId,
    Source,
    Value,
}

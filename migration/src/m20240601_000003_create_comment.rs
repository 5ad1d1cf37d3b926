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
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(pk_auto(Comment::Id))
                    .col(integer(Comment::MovieId))
                    .col(bounded_string(Comment::Author, 64).default("Anonymous").take())
                    .col(text(Comment::Text))
                    .col(big_integer(Comment::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_movie")
                            .from(Comment::Table, Comment::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_movie_created_at")
                    .table(Comment::Table)
                    .col(Comment::MovieId)
                    .col(Comment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Comment::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    Id,
    MovieId,
    Author,
    Text,
    CreatedAt,
}

//! Migration: species and breeds.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Species::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Species::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Species::Name).string().not_null())
                    .col(
                        ColumnDef::new(Species::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Species::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Breeds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Breeds::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Breeds::Name).string().not_null())
                    .col(ColumnDef::new(Breeds::SpecieId).uuid().not_null())
                    .col(
                        ColumnDef::new(Breeds::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Breeds::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_breeds_specie_id")
                            .from(Breeds::Table, Breeds::SpecieId)
                            .to(Species::Table, Species::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_breeds_specie_id")
                    .table(Breeds::Table)
                    .col(Breeds::SpecieId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Breeds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Species::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Species {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Breeds {
    Table,
    Id,
    Name,
    SpecieId,
    CreatedAt,
    UpdatedAt,
}

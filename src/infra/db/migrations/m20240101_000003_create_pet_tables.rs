//! Migration: pets and their images.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_catalog_tables::{Breeds, Species};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pets::Name).string().not_null())
                    .col(ColumnDef::new(Pets::SpecieId).uuid().not_null())
                    .col(ColumnDef::new(Pets::BreedId).uuid().null())
                    .col(ColumnDef::new(Pets::Color).string_len(16).not_null())
                    .col(ColumnDef::new(Pets::Size).string_len(16).not_null())
                    .col(ColumnDef::new(Pets::Age).integer().not_null())
                    .col(ColumnDef::new(Pets::Gender).string_len(1).not_null())
                    .col(
                        ColumnDef::new(Pets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Pets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_specie_id")
                            .from(Pets::Table, Pets::SpecieId)
                            .to(Species::Table, Species::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_breed_id")
                            .from(Pets::Table, Pets::BreedId)
                            .to(Breeds::Table, Breeds::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PetImages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PetImages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PetImages::PetId).uuid().not_null())
                    .col(ColumnDef::new(PetImages::FileName).string().not_null())
                    .col(
                        ColumnDef::new(PetImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pet_images_pet_id")
                            .from(PetImages::Table, PetImages::PetId)
                            .to(Pets::Table, Pets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Filter columns
        for (name, column) in [
            ("idx_pets_specie_id", Pets::SpecieId),
            ("idx_pets_breed_id", Pets::BreedId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Pets::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_pet_images_pet_id")
                    .table(PetImages::Table)
                    .col(PetImages::PetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PetImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Pets {
    Table,
    Id,
    Name,
    SpecieId,
    BreedId,
    Color,
    Size,
    Age,
    Gender,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PetImages {
    Table,
    Id,
    PetId,
    FileName,
    CreatedAt,
}

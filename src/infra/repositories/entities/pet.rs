//! Pet database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Gender, Pet, PetColor, PetSize};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub specie_id: Uuid,
    pub breed_id: Option<Uuid>,
    pub color: String,
    pub size: String,
    pub age: i32,
    pub gender: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::specie::Entity",
        from = "Column::SpecieId",
        to = "super::specie::Column::Id",
        on_delete = "Cascade"
    )]
    Specie,
    #[sea_orm(
        belongs_to = "super::breed::Entity",
        from = "Column::BreedId",
        to = "super::breed::Column::Id",
        on_delete = "SetNull"
    )]
    Breed,
    #[sea_orm(has_many = "super::pet_image::Entity")]
    PetImage,
}

impl Related<super::specie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Specie.def()
    }
}

impl Related<super::breed::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Breed.def()
    }
}

impl Related<super::pet_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PetImage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Scalar columns only; specie, breed and images are attached by the
/// repository.
impl TryFrom<Model> for Pet {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Pet {
            id: model.id,
            name: model.name,
            specie_id: model.specie_id,
            specie: None,
            breed_id: model.breed_id,
            breed: None,
            color: model.color.parse::<PetColor>().map_err(AppError::internal)?,
            size: model.size.parse::<PetSize>().map_err(AppError::internal)?,
            age: model.age,
            gender: model.gender.parse::<Gender>().map_err(AppError::internal)?,
            images: Vec::new(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

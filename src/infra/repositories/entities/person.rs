//! Person database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Gender, Person};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "persons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birthdate: Date,
    #[sea_orm(unique)]
    pub cpf: String,
    pub profile_picture: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub about: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user::Entity")]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Person {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Person {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            gender: model.gender.parse::<Gender>().map_err(AppError::internal)?,
            birthdate: model.birthdate,
            cpf: model.cpf,
            profile_picture: model.profile_picture,
            about: model.about,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

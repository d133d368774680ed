//! Breed repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::entities::breed::{self, ActiveModel, Entity as BreedEntity};
use super::entities::specie::{self, Entity as SpecieEntity};
use super::executor::Executor;
use crate::domain::{Breed, Specie};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Breed repository. Reads attach the owning specie.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BreedRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Breed>>;

    async fn list(&self) -> AppResult<Vec<Breed>>;

    async fn list_by_specie(&self, specie_id: Uuid) -> AppResult<Vec<Breed>>;

    async fn create(&self, name: String, specie_id: Uuid) -> AppResult<Breed>;

    async fn update(&self, id: Uuid, name: String, specie_id: Uuid) -> AppResult<Breed>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Whether the breed's stored specie is `specie_id`. False when the
    /// breed does not exist.
    async fn belongs_to_species(&self, breed_id: Uuid, specie_id: Uuid) -> AppResult<bool>;
}

/// SeaORM implementation of BreedRepository
pub struct BreedStore<E: Executor> {
    db: E,
}

impl<E: Executor> BreedStore<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

fn to_domain((model, specie): (breed::Model, Option<specie::Model>)) -> Breed {
    Breed {
        specie: specie.map(Specie::from),
        ..Breed::from(model)
    }
}

#[async_trait]
impl<E: Executor> BreedRepository for BreedStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Breed>> {
        let result = BreedEntity::find_by_id(id)
            .find_also_related(SpecieEntity)
            .one(self.db.conn())
            .await?;
        Ok(result.map(to_domain))
    }

    async fn list(&self) -> AppResult<Vec<Breed>> {
        let rows = BreedEntity::find()
            .find_also_related(SpecieEntity)
            .order_by_asc(breed::Column::Name)
            .all(self.db.conn())
            .await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn list_by_specie(&self, specie_id: Uuid) -> AppResult<Vec<Breed>> {
        let rows = BreedEntity::find()
            .filter(breed::Column::SpecieId.eq(specie_id))
            .find_also_related(SpecieEntity)
            .order_by_asc(breed::Column::Name)
            .all(self.db.conn())
            .await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn create(&self, name: String, specie_id: Uuid) -> AppResult<Breed> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            specie_id: Set(specie_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.conn())
        .await
        .map_err(AppError::from)?;

        Ok(Breed::from(model))
    }

    async fn update(&self, id: Uuid, name: String, specie_id: Uuid) -> AppResult<Breed> {
        let breed = BreedEntity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .ok_or_not_found("Breed", id)?;

        let mut active: ActiveModel = breed.into();
        active.name = Set(name);
        active.specie_id = Set(specie_id);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.conn()).await.map_err(AppError::from)?;
        Ok(Breed::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = BreedEntity::delete_by_id(id)
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Breed", id));
        }

        Ok(())
    }

    async fn belongs_to_species(&self, breed_id: Uuid, specie_id: Uuid) -> AppResult<bool> {
        let breed = BreedEntity::find_by_id(breed_id).one(self.db.conn()).await?;
        Ok(breed.map_or(false, |b| b.specie_id == specie_id))
    }
}

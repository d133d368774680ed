//! Specie repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::specie::{self, ActiveModel, Entity as SpecieEntity};
use super::executor::Executor;
use crate::domain::Specie;
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SpecieRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Specie>>;

    async fn list(&self) -> AppResult<Vec<Specie>>;

    async fn create(&self, name: String) -> AppResult<Specie>;

    async fn update(&self, id: Uuid, name: String) -> AppResult<Specie>;

    /// Delete a specie; its breeds and pets go with it
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM implementation of SpecieRepository
pub struct SpecieStore<E: Executor> {
    db: E,
}

impl<E: Executor> SpecieStore<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> SpecieRepository for SpecieStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Specie>> {
        let result = SpecieEntity::find_by_id(id).one(self.db.conn()).await?;
        Ok(result.map(Specie::from))
    }

    async fn list(&self) -> AppResult<Vec<Specie>> {
        let models = SpecieEntity::find()
            .order_by_asc(specie::Column::Name)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(Specie::from).collect())
    }

    async fn create(&self, name: String) -> AppResult<Specie> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.conn())
        .await
        .map_err(AppError::from)?;

        Ok(Specie::from(model))
    }

    async fn update(&self, id: Uuid, name: String) -> AppResult<Specie> {
        let specie = SpecieEntity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .ok_or_not_found("Species", id)?;

        let mut active: ActiveModel = specie.into();
        active.name = Set(name);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.conn()).await.map_err(AppError::from)?;
        Ok(Specie::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = SpecieEntity::delete_by_id(id)
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Species", id));
        }

        Ok(())
    }
}

//! Breed service - breeds always hang off an existing specie.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::parallel;
use crate::domain::Breed;
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::schemas::{BreedRequest, InputSchema};

#[async_trait]
pub trait BreedService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Breed>>;

    async fn get(&self, id: Uuid) -> AppResult<Breed>;

    /// Breeds of one specie; the specie must exist
    async fn list_by_specie(&self, specie_id: Uuid) -> AppResult<Vec<Breed>>;

    async fn create(&self, request: BreedRequest) -> AppResult<Breed>;

    async fn update(&self, id: Uuid, request: BreedRequest) -> AppResult<Breed>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct BreedManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BreedManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_specie(&self, specie_id: Uuid) -> AppResult<()> {
        self.uow
            .species()
            .find_by_id(specie_id)
            .await?
            .ok_or_not_found("Species", specie_id)
            .map(|_| ())
    }
}

#[async_trait]
impl<U: UnitOfWork> BreedService for BreedManager<U> {
    async fn list(&self) -> AppResult<Vec<Breed>> {
        self.uow.breeds().list().await
    }

    async fn get(&self, id: Uuid) -> AppResult<Breed> {
        self.uow
            .breeds()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Breed", id)
    }

    async fn list_by_specie(&self, specie_id: Uuid) -> AppResult<Vec<Breed>> {
        self.ensure_specie(specie_id).await?;
        self.uow.breeds().list_by_specie(specie_id).await
    }

    async fn create(&self, request: BreedRequest) -> AppResult<Breed> {
        request.check()?;
        self.ensure_specie(request.specie_id).await?;

        let breed = self
            .uow
            .breeds()
            .create(request.name, request.specie_id)
            .await?;
        tracing::info!(breed_id = %breed.id, specie_id = %breed.specie_id, "Breed created");
        Ok(breed)
    }

    async fn update(&self, id: Uuid, request: BreedRequest) -> AppResult<Breed> {
        request.check()?;
        parallel::join2(self.get(id), self.ensure_specie(request.specie_id)).await?;

        self.uow
            .breeds()
            .update(id, request.name, request.specie_id)
            .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.get(id).await?;
        self.uow.breeds().delete(id).await
    }
}

//! Specie service - plain CRUD over the species catalog.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Specie;
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::schemas::{InputSchema, SpecieRequest};

#[async_trait]
pub trait SpecieService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Specie>>;

    async fn get(&self, id: Uuid) -> AppResult<Specie>;

    async fn create(&self, request: SpecieRequest) -> AppResult<Specie>;

    async fn update(&self, id: Uuid, request: SpecieRequest) -> AppResult<Specie>;

    /// Deleting a specie cascades to its breeds and pets
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct SpecieManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SpecieManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SpecieService for SpecieManager<U> {
    async fn list(&self) -> AppResult<Vec<Specie>> {
        self.uow.species().list().await
    }

    async fn get(&self, id: Uuid) -> AppResult<Specie> {
        self.uow
            .species()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Species", id)
    }

    async fn create(&self, request: SpecieRequest) -> AppResult<Specie> {
        request.check()?;
        let specie = self.uow.species().create(request.name).await?;
        tracing::info!(specie_id = %specie.id, "Species created");
        Ok(specie)
    }

    async fn update(&self, id: Uuid, request: SpecieRequest) -> AppResult<Specie> {
        request.check()?;
        self.get(id).await?;
        self.uow.species().update(id, request.name).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.get(id).await?;
        self.uow.species().delete(id).await
    }
}

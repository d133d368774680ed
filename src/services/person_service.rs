//! Person service - profile reads and updates.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Person;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::schemas::{InputSchema, UpdatePersonRequest};

#[async_trait]
pub trait PersonService: Send + Sync {
    async fn get_person(&self, id: Uuid) -> AppResult<Person>;

    /// Apply a partial update; a new cpf must not belong to another person
    async fn update_person(&self, id: Uuid, request: UpdatePersonRequest) -> AppResult<Person>;

    async fn delete_person(&self, id: Uuid) -> AppResult<()>;
}

pub struct PersonManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PersonManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PersonService for PersonManager<U> {
    async fn get_person(&self, id: Uuid) -> AppResult<Person> {
        self.uow
            .persons()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Person", id)
    }

    async fn update_person(&self, id: Uuid, request: UpdatePersonRequest) -> AppResult<Person> {
        request.check()?;
        let raw_cpf = request.cpf.clone();
        let changes = request.into_changes()?;
        let current = self.get_person(id).await?;

        if let Some(cpf) = changes.cpf.as_deref().filter(|cpf| *cpf != current.cpf) {
            let owner = self.uow.persons().find_by_cpf(cpf).await?;
            if owner.is_some_and(|other| other.id != id) {
                return Err(AppError::conflict(format!(
                    "CPF {} already exists.",
                    raw_cpf.unwrap_or_default()
                )));
            }
        }

        self.uow.persons().update(id, changes).await
    }

    async fn delete_person(&self, id: Uuid) -> AppResult<()> {
        self.get_person(id).await?;
        self.uow.persons().delete(id).await?;
        tracing::info!(person_id = %id, "Person deleted");
        Ok(())
    }
}

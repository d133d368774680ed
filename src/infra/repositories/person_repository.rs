//! Person repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::person::{self, ActiveModel, Entity as PersonEntity};
use super::executor::Executor;
use crate::domain::{NewPerson, Person, PersonChanges};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Person>>;

    /// Find by normalized national id
    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<Person>>;

    async fn create(&self, person: NewPerson) -> AppResult<Person>;

    /// Apply a partial update
    async fn update(&self, id: Uuid, changes: PersonChanges) -> AppResult<Person>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

fn cpf_taken(cpf: &str) -> String {
    format!("CPF {} already exists.", cpf)
}

/// SeaORM implementation of PersonRepository
pub struct PersonStore<E: Executor> {
    db: E,
}

impl<E: Executor> PersonStore<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> PersonRepository for PersonStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Person>> {
        PersonEntity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .map(Person::try_from)
            .transpose()
    }

    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<Person>> {
        PersonEntity::find()
            .filter(person::Column::Cpf.eq(cpf))
            .one(self.db.conn())
            .await?
            .map(Person::try_from)
            .transpose()
    }

    async fn create(&self, person: NewPerson) -> AppResult<Person> {
        let now = chrono::Utc::now();
        let cpf = person.cpf.clone();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(person.first_name),
            last_name: Set(person.last_name),
            gender: Set(person.gender.as_str().to_string()),
            birthdate: Set(person.birthdate),
            cpf: Set(person.cpf),
            profile_picture: Set(person.profile_picture),
            about: Set(person.about),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.conn())
            .await
            .map_err(|e| AppError::conflict_on_unique(e, || cpf_taken(&cpf)))?;
        Person::try_from(model)
    }

    async fn update(&self, id: Uuid, changes: PersonChanges) -> AppResult<Person> {
        let person = PersonEntity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .ok_or_not_found("Person", id)?;

        let mut active: ActiveModel = person.into();

        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(gender.as_str().to_string());
        }
        if let Some(birthdate) = changes.birthdate {
            active.birthdate = Set(birthdate);
        }
        let new_cpf = changes.cpf.clone();
        if let Some(cpf) = changes.cpf {
            active.cpf = Set(cpf);
        }
        if let Some(picture) = changes.profile_picture {
            active.profile_picture = Set(Some(picture));
        }
        if let Some(about) = changes.about {
            active.about = Set(Some(about));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.conn()).await.map_err(|e| {
            AppError::conflict_on_unique(e, || cpf_taken(new_cpf.as_deref().unwrap_or_default()))
        })?;
        Person::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PersonEntity::delete_by_id(id)
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Person", id));
        }

        Ok(())
    }
}

//! User repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::person::{self, Entity as PersonEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::executor::Executor;
use crate::domain::{NewUser, Person, User};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Users are returned with their person attached when one exists.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM implementation of UserRepository
pub struct UserStore<E: Executor> {
    db: E,
}

impl<E: Executor> UserStore<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

fn to_domain((model, person): (user::Model, Option<person::Model>)) -> AppResult<User> {
    let user = User::try_from(model)?;
    match person {
        Some(person) => Ok(user.with_person(Person::try_from(person)?)),
        None => Ok(user),
    }
}

#[async_trait]
impl<E: Executor> UserRepository for UserStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .find_also_related(PersonEntity)
            .one(self.db.conn())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .find_also_related(PersonEntity)
            .one(self.db.conn())
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let email = user.email.clone();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            status: Set(user.status.as_str().to_string()),
            person_id: Set(user.person_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.conn()).await.map_err(|e| {
            AppError::conflict_on_unique(e, || format!("Email {} already exists.", email))
        })?;
        User::try_from(model)
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(self.db.conn())
            .await?
            .ok_or_not_found("User", id)?;

        let mut active: ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.conn()).await.map_err(AppError::from)?;
        User::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(self.db.conn())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User", id));
        }

        Ok(())
    }
}

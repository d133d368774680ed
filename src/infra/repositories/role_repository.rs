//! Role repository and user-role assignment.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use super::executor::Executor;
use crate::domain::Role;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Roles assigned to a user, by name
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Role>>;

    async fn create(&self, name: &str) -> AppResult<Role>;

    /// Insert the (user, role) join row
    async fn assign_to_user(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()>;
}

/// SeaORM implementation of RoleRepository
pub struct RoleStore<E: Executor> {
    db: E,
}

impl<E: Executor> RoleStore<E> {
    pub fn new(db: E) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<E: Executor> RoleRepository for RoleStore<E> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let result = RoleEntity::find_by_id(id).one(self.db.conn()).await?;
        Ok(result.map(Role::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let result = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(self.db.conn())
            .await?;
        Ok(result.map(Role::from))
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .inner_join(UserRoleEntity)
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Name)
            .all(self.db.conn())
            .await?;
        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn create(&self, name: &str) -> AppResult<Role> {
        let model = role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
        }
        .insert(self.db.conn())
        .await
        .map_err(AppError::from)?;

        Ok(Role::from(model))
    }

    async fn assign_to_user(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(self.db.conn())
        .await
        .map_err(AppError::from)?;

        Ok(())
    }
}

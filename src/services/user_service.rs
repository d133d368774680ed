//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::schemas::{ChangePasswordRequest, InputSchema};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID, with its person
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Names of the roles assigned to a user
    async fn role_names(&self, id: Uuid) -> AppResult<Vec<String>>;

    /// Delete user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Replace the password after checking the current one
    async fn change_password(&self, id: Uuid, request: ChangePasswordRequest) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User", id)
    }

    async fn role_names(&self, id: Uuid) -> AppResult<Vec<String>> {
        let roles = self.uow.roles().find_by_user(id).await?;
        Ok(roles.into_iter().map(|role| role.name).collect())
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.get_user(id).await?;
        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn change_password(&self, id: Uuid, request: ChangePasswordRequest) -> AppResult<()> {
        request.check()?;
        let user = self.get_user(id).await?;

        if !Password::from_hash(user.password_hash).verify(&request.current_password) {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = Password::new(&request.new_password)?.into_string();
        self.uow.users().update_password(id, new_hash).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;
    use crate::infra::repositories::{
        BreedRepository, MockRoleRepository, MockUserRepository, PersonRepository,
        PetRepository, RoleRepository, SpecieRepository, UserRepository,
    };
    use crate::infra::{TransactionScope, TxFuture};
    use chrono::Utc;
    use mockall::predicate::eq;

    /// Unit of work exposing only mocked user and role repositories
    struct TestUnitOfWork {
        users: Arc<MockUserRepository>,
        roles: Arc<MockRoleRepository>,
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }
        fn persons(&self) -> Arc<dyn PersonRepository> {
            unimplemented!("not used by UserManager")
        }
        fn roles(&self) -> Arc<dyn RoleRepository> {
            self.roles.clone()
        }
        fn species(&self) -> Arc<dyn SpecieRepository> {
            unimplemented!("not used by UserManager")
        }
        fn breeds(&self) -> Arc<dyn BreedRepository> {
            unimplemented!("not used by UserManager")
        }
        fn pets(&self) -> Arc<dyn PetRepository> {
            unimplemented!("not used by UserManager")
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(&'a dyn TransactionScope) -> TxFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("Transactions not supported in test mock"))
        }
    }

    fn manager(users: MockUserRepository) -> UserManager<TestUnitOfWork> {
        UserManager::new(Arc::new(TestUnitOfWork {
            users: Arc::new(users),
            roles: Arc::new(MockRoleRepository::new()),
        }))
    }

    fn user_with_password(id: Uuid, plain: &str) -> User {
        User {
            id,
            email: "test@example.com".to_string(),
            password_hash: Password::new(plain).unwrap().into_string(),
            status: UserStatus::Active,
            person_id: None,
            person: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = manager(repo).get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_user_never_deletes() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let err = manager(repo).delete_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_change_password_rejects_wrong_current_password() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |id| Ok(Some(user_with_password(id, "Current1!"))));
        repo.expect_update_password().never();

        let err = manager(repo)
            .change_password(
                id,
                ChangePasswordRequest {
                    current_password: "Wrong-pass1".to_string(),
                    new_password: "Another1!".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(user_with_password(id, "Current1!"))));
        repo.expect_update_password()
            .withf(|_, hash| Password::from_hash(hash.clone()).verify("Another1!"))
            .times(1)
            .returning(move |id, _| Ok(user_with_password(id, "Another1!")));

        manager(repo)
            .change_password(
                id,
                ChangePasswordRequest {
                    current_password: "Current1!".to_string(),
                    new_password: "Another1!".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_weak_new_password_is_validation_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();

        let err = manager(repo)
            .change_password(
                Uuid::new_v4(),
                ChangePasswordRequest {
                    current_password: "Current1!".to_string(),
                    new_password: "short".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}

//! Service Container - Centralized service access with parallel execution support.
//!
//! Features:
//! - Centralized access to all application services
//! - Thread-safe concurrent access via Arc
//! - Parallel execution utilities for independent operations

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, BreedManager, BreedService, PersonManager, PersonService,
    PetManager, PetService, SpecieManager, SpecieService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{FileStorage, LocalStorage, Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn persons(&self) -> Arc<dyn PersonService>;

    fn species(&self) -> Arc<dyn SpecieService>;

    fn breeds(&self) -> Arc<dyn BreedService>;

    fn pets(&self) -> Arc<dyn PetService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    person_service: Arc<dyn PersonService>,
    specie_service: Arc<dyn SpecieService>,
    breed_service: Arc<dyn BreedService>,
    pet_service: Arc<dyn PetService>,
}

impl Services {
    /// Wire every service over one unit of work and file storage
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        storage: Arc<dyn FileStorage>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            person_service: Arc::new(PersonManager::new(uow.clone())),
            specie_service: Arc::new(SpecieManager::new(uow.clone())),
            breed_service: Arc::new(BreedManager::new(uow.clone())),
            pet_service: Arc::new(PetManager::new(uow, storage)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let storage: Arc<dyn FileStorage> = Arc::new(LocalStorage::from_config(&config));
        Self::new(uow, storage, config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn persons(&self) -> Arc<dyn PersonService> {
        self.person_service.clone()
    }

    fn species(&self) -> Arc<dyn SpecieService> {
        self.specie_service.clone()
    }

    fn breeds(&self) -> Arc<dyn BreedService> {
        self.breed_service.clone()
    }

    fn pets(&self) -> Arc<dyn PetService> {
        self.pet_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
///
/// Every operation is awaited before the combined result is returned; the
/// first error wins.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// # Example
    /// ```ignore
    /// let (specie, breed) = parallel::join2(
    ///     uow.species().find_by_id(specie_id),
    ///     uow.breeds().find_by_id(breed_id),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute three independent async operations in parallel.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Execute operations in parallel with a concurrency limit.
    ///
    /// Results come back in completion order.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        stream::iter(futures)
            .map(Ok)
            .try_buffer_unordered(limit.max(1))
            .try_collect()
            .await
    }
}

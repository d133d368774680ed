//! Unit of Work pattern implementation.
//!
//! The unit of work hands out repositories bound to the pooled connection and
//! runs multi-step writes atomically: the closure passed to `transaction`
//! receives a `TransactionScope` whose repositories all share one database
//! transaction, committed when the closure succeeds and rolled back otherwise.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::{
    BreedRepository, BreedStore, PersonRepository, PersonStore, PetRepository, PetStore,
    RoleRepository, RoleStore, SpecieRepository, SpecieStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Future returned by a transaction body
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Repositories bound to a single open transaction.
pub trait TransactionScope: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn persons(&self) -> &dyn PersonRepository;

    fn roles(&self) -> &dyn RoleRepository;

    fn pets(&self) -> &dyn PetRepository;
}

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to the generic method.
/// Tests use an in-memory implementation instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn persons(&self) -> Arc<dyn PersonRepository>;

    fn roles(&self) -> Arc<dyn RoleRepository>;

    fn species(&self) -> Arc<dyn SpecieRepository>;

    fn breeds(&self) -> Arc<dyn BreedRepository>;

    fn pets(&self) -> Arc<dyn PetRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a dyn TransactionScope) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction-scoped repositories borrowing one `DatabaseTransaction`.
pub struct TransactionContext<'a> {
    users: UserStore<&'a DatabaseTransaction>,
    persons: PersonStore<&'a DatabaseTransaction>,
    roles: RoleStore<&'a DatabaseTransaction>,
    pets: PetStore<&'a DatabaseTransaction>,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self {
            users: UserStore::new(txn),
            persons: PersonStore::new(txn),
            roles: RoleStore::new(txn),
            pets: PetStore::new(txn),
        }
    }
}

impl<'a> TransactionScope for TransactionContext<'a> {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn persons(&self) -> &dyn PersonRepository {
        &self.persons
    }

    fn roles(&self) -> &dyn RoleRepository {
        &self.roles
    }

    fn pets(&self) -> &dyn PetRepository {
        &self.pets
    }
}

/// SeaORM implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore<DatabaseConnection>>,
    persons: Arc<PersonStore<DatabaseConnection>>,
    roles: Arc<RoleStore<DatabaseConnection>>,
    species: Arc<SpecieStore<DatabaseConnection>>,
    breeds: Arc<BreedStore<DatabaseConnection>>,
    pets: Arc<PetStore<DatabaseConnection>>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            persons: Arc::new(PersonStore::new(db.clone())),
            roles: Arc::new(RoleStore::new(db.clone())),
            species: Arc::new(SpecieStore::new(db.clone())),
            breeds: Arc::new(BreedStore::new(db.clone())),
            pets: Arc::new(PetStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn persons(&self) -> Arc<dyn PersonRepository> {
        self.persons.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn species(&self) -> Arc<dyn SpecieRepository> {
        self.species.clone()
    }

    fn breeds(&self) -> Arc<dyn BreedRepository> {
        self.breeds.clone()
    }

    fn pets(&self) -> Arc<dyn PetRepository> {
        self.pets.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(&'a dyn TransactionScope) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        // The context borrows `txn`; it must be gone before commit takes it
        let result = {
            let ctx = TransactionContext::new(&txn);
            f(&ctx).await
        };

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Run a block inside `UnitOfWork::transaction`.
///
/// ```ignore
/// let person = with_transaction!(uow, |tx| tx.persons().create(new_person).await)?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}

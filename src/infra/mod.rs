//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories and their SeaORM entities
//! - Unit of Work for transaction management
//! - Local file storage for uploads

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    BreedRepository, PersonRepository, PetRepository, RoleRepository, SpecieRepository,
    UserRepository,
};
pub use storage::{FileStorage, LocalStorage};
pub use unit_of_work::{Persistence, TransactionContext, TransactionScope, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBreedRepository, MockPersonRepository, MockPetRepository, MockRoleRepository,
    MockSpecieRepository, MockUserRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockFileStorage;

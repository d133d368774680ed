//! Repository layer - Data access abstraction
//!
//! One trait per aggregate, each with a SeaORM store that runs either on the
//! pooled connection or inside a unit-of-work transaction.

mod breed_repository;
pub(crate) mod entities;
mod executor;
mod person_repository;
mod pet_repository;
mod role_repository;
mod specie_repository;
mod user_repository;

pub use breed_repository::{BreedRepository, BreedStore};
pub use executor::Executor;
pub use person_repository::{PersonRepository, PersonStore};
pub use pet_repository::{PetRepository, PetStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use specie_repository::{SpecieRepository, SpecieStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use breed_repository::MockBreedRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use person_repository::MockPersonRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use pet_repository::MockPetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use specie_repository::MockSpecieRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

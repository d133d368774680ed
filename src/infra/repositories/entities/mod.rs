//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enumerations are stored as their upper-case string form.

pub mod breed;
pub mod person;
pub mod pet;
pub mod pet_image;
pub mod role;
pub mod specie;
pub mod user;
pub mod user_role;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use breed::{ActiveModel as BreedActiveModel, Entity as BreedEntity, Model as BreedModel};
#[allow(unused_imports)]
pub use person::{ActiveModel as PersonActiveModel, Entity as PersonEntity, Model as PersonModel};
#[allow(unused_imports)]
pub use pet::{ActiveModel as PetActiveModel, Entity as PetEntity, Model as PetModel};
#[allow(unused_imports)]
pub use pet_image::{Entity as PetImageEntity, Model as PetImageModel};
#[allow(unused_imports)]
pub use role::{Entity as RoleEntity, Model as RoleModel};
#[allow(unused_imports)]
pub use specie::{Entity as SpecieEntity, Model as SpecieModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
#[allow(unused_imports)]
pub use user_role::Entity as UserRoleEntity;

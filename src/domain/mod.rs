//! Domain layer - Core business entities and value objects
//!
//! These types know nothing about the database or HTTP. Repositories map
//! their rows into them and services return them.

pub mod national_id;
pub mod password;
pub mod person;
pub mod pet;
pub mod role;
pub mod specie;
pub mod upload;
pub mod user;

pub use national_id::{NationalId, NationalIdError};
pub use password::Password;
pub use person::{Gender, NewPerson, Person, PersonChanges};
pub use pet::{
    NewPet, Pet, PetChanges, PetColor, PetFilter, PetImage, PetImageResponse, PetResponse,
    PetSize,
};
pub use role::Role;
pub use specie::{Breed, Specie};
pub use upload::ImageUpload;
pub use user::{NewUser, User, UserResponse, UserStatus};

//! HTTP request handlers.

pub mod auth_handler;
pub mod breed_handler;
pub mod person_handler;
pub mod pet_handler;
pub mod specie_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use breed_handler::breed_routes;
pub use person_handler::person_routes;
pub use pet_handler::pet_routes;
pub use specie_handler::specie_routes;
pub use user_handler::user_routes;

//! Pet Adoption API - accounts, people, species, breeds and pets.
//!
//! REST backend built with Axum and SeaORM, organised in layers:
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations (serve, migrate, seed)
//! - **config**: Application configuration and constants
//! - **domain**: Core entities, password hashing, national-id checksum, uploads
//! - **schemas**: Declarative input validation with aggregated reports
//! - **services**: Use cases (registration, login, pets, breeds, species...)
//! - **infra**: Database, repositories, unit of work, file storage
//! - **api**: HTTP handlers, middleware, extractors and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Ensure the ADMIN, USER and MODERATOR roles exist
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod schemas;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{NationalId, Password, Pet, User};
pub use errors::{AppError, AppResult};

//! Application configuration module
//!
//! Environment-driven settings (database, JWT, public URLs, upload directory)
//! and the constants shared by validation, hashing and upload handling.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;

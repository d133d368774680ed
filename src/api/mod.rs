//! HTTP surface: routes, handlers, JWT middleware, extractors for JSON and
//! multipart bodies, and the OpenAPI document.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;

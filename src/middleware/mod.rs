//! Middleware del backend de referencia
//!
//! Autenticación JWT (con resolución de escuela) y CORS.

pub mod auth;
pub mod cors;

pub use auth::{auth_middleware, AuthenticatedSchool, TenantQuery};
pub use cors::cors_layer;

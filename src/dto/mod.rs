//! DTOs de la API
//!
//! Envelope común y payloads que no son entidades.

pub mod auth_dto;
pub mod envelope;
pub mod trip_dto;

pub use envelope::ApiResponse;

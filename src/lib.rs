//! School ERP
//!
//! Cliente tipado para la API REST de gestión escolar (transporte,
//! profesores y matrículas) y un backend de referencia en memoria con el
//! mismo contrato.
//!
//! Capas del cliente, de abajo arriba:
//!
//! * `session` y `client`: token, escuela actual y transporte HTTP con el
//!   envelope `{success, data, error?, message?}`.
//! * `services`: CRUD por entidad sobre `ApiClient`.
//! * `store`: caché por colección con estado de carga y error propio.
//! * `forms`, `table` y `export`: validación de borradores, tablas en
//!   cliente y exportación CSV/documento.

pub mod api;
pub mod client;
pub mod config;
pub mod dto;
pub mod export;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod table;
pub mod utils;

pub use client::{ApiClient, ApiFailure, ApiResult, FailureKind};
pub use session::{Session, SessionEvent};

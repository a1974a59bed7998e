//! Shared application state
//!
//! Este módulo define el estado compartido del backend de referencia que se
//! pasa a través del router de Axum: configuración y un repositorio en
//! memoria por recurso.

use crate::config::environment::EnvironmentConfig;
use crate::models::{
    Bus, Driver, MaintenanceRecord, Route, StudentRegistration, StudentTransport, Teacher,
    TripLog,
};
use crate::repositories::MemoryRepository;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
    pub drivers: MemoryRepository<Driver>,
    pub buses: MemoryRepository<Bus>,
    pub routes: MemoryRepository<Route>,
    pub trips: MemoryRepository<TripLog>,
    pub maintenance: MemoryRepository<MaintenanceRecord>,
    pub student_transport: MemoryRepository<StudentTransport>,
    pub teachers: MemoryRepository<Teacher>,
    pub students: MemoryRepository<StudentRegistration>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            jwt: JwtConfig::from(&config),
            config,
            drivers: MemoryRepository::new(),
            buses: MemoryRepository::new(),
            routes: MemoryRepository::new(),
            trips: MemoryRepository::new(),
            maintenance: MemoryRepository::new(),
            student_transport: MemoryRepository::new(),
            teachers: MemoryRepository::new(),
            students: MemoryRepository::new(),
        }
    }
}

/// Acceso genérico al repositorio de un recurso
pub trait HasRepository<T> {
    fn repository(&self) -> &MemoryRepository<T>;
}

impl HasRepository<Driver> for AppState {
    fn repository(&self) -> &MemoryRepository<Driver> {
        &self.drivers
    }
}

impl HasRepository<Bus> for AppState {
    fn repository(&self) -> &MemoryRepository<Bus> {
        &self.buses
    }
}

impl HasRepository<Route> for AppState {
    fn repository(&self) -> &MemoryRepository<Route> {
        &self.routes
    }
}

impl HasRepository<TripLog> for AppState {
    fn repository(&self) -> &MemoryRepository<TripLog> {
        &self.trips
    }
}

impl HasRepository<MaintenanceRecord> for AppState {
    fn repository(&self) -> &MemoryRepository<MaintenanceRecord> {
        &self.maintenance
    }
}

impl HasRepository<StudentTransport> for AppState {
    fn repository(&self) -> &MemoryRepository<StudentTransport> {
        &self.student_transport
    }
}

impl HasRepository<Teacher> for AppState {
    fn repository(&self) -> &MemoryRepository<Teacher> {
        &self.teachers
    }
}

impl HasRepository<StudentRegistration> for AppState {
    fn repository(&self) -> &MemoryRepository<StudentRegistration> {
        &self.students
    }
}

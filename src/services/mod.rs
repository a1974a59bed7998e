//! Servicios de recursos
//!
//! Un servicio por entidad, todos con el mismo contrato CRUD sobre
//! `ApiClient`. Cada método normaliza sus errores a `ApiFailure`; no hay
//! reintentos, backoff ni claves de idempotencia.

pub mod student_service;
pub mod teacher_service;
pub mod transport;
pub mod vehicle_service;

use async_trait::async_trait;
use std::marker::PhantomData;

use crate::client::{ApiClient, ApiResult, FailureKind};
use crate::models::{
    Bus, Driver, MaintenanceRecord, Resource, Route, StudentRegistration, StudentTransport,
    Teacher, TripLog,
};

pub use vehicle_service::VehicleService;

/// Contrato CRUD de un recurso
///
/// El store depende de este trait y no de `CrudService`, así puede probarse
/// con implementaciones en memoria.
#[async_trait]
pub trait ResourceApi<T: Resource>: Send + Sync {
    async fn get_all(&self) -> ApiResult<Vec<T>>;

    async fn get_by_id(&self, id: &str) -> ApiResult<Option<T>>;

    async fn create(&self, data: &T) -> ApiResult<T>;

    async fn update(&self, id: &str, data: &T) -> ApiResult<T>;

    async fn delete(&self, id: &str) -> ApiResult<()>;
}

/// Implementación REST genérica sobre `T::PATH`
pub struct CrudService<T> {
    client: ApiClient,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for CrudService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> CrudService<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Path de la colección, filtrado por escuela si la sesión la conoce
    pub(crate) fn collection_path(&self) -> String {
        match self.client.session().current_tenant_id() {
            Some(tenant) => format!("{}?schoolId={}", T::PATH, urlencoding::encode(&tenant)),
            None => T::PATH.to_string(),
        }
    }

    pub(crate) fn item_path(&self, id: &str) -> String {
        format!("{}/{}", T::PATH, urlencoding::encode(id))
    }
}

#[async_trait]
impl<T: Resource> ResourceApi<T> for CrudService<T> {
    async fn get_all(&self) -> ApiResult<Vec<T>> {
        let items: Option<Vec<T>> = self.client.get(&self.collection_path()).await.map_err(|e| {
            tracing::error!("❌ Error cargando {}: {}", T::NAME, e);
            e
        })?;
        let items = items.unwrap_or_default();
        tracing::debug!("📋 {} {} cargados", items.len(), T::NAME);
        Ok(items)
    }

    async fn get_by_id(&self, id: &str) -> ApiResult<Option<T>> {
        match self.client.get::<Option<T>>(&self.item_path(id)).await {
            Ok(item) => Ok(item),
            Err(e) if e.kind == FailureKind::Http(404) => Ok(None),
            Err(e) => {
                tracing::error!("❌ Error obteniendo {} '{}': {}", T::NAME, id, e);
                Err(e)
            }
        }
    }

    async fn create(&self, data: &T) -> ApiResult<T> {
        let created: T = self.client.post(T::PATH, data).await.map_err(|e| {
            tracing::error!("❌ Error creando {}: {}", T::NAME, e);
            e
        })?;
        tracing::info!("✅ {} creado: {}", T::NAME, created.id());
        Ok(created)
    }

    async fn update(&self, id: &str, data: &T) -> ApiResult<T> {
        let updated: T = self.client.put(&self.item_path(id), data).await.map_err(|e| {
            tracing::error!("❌ Error actualizando {} '{}': {}", T::NAME, id, e);
            e
        })?;
        tracing::info!("✅ {} actualizado: {}", T::NAME, id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&self.item_path(id)).await.map_err(|e| {
            tracing::error!("❌ Error eliminando {} '{}': {}", T::NAME, id, e);
            e
        })?;
        tracing::info!("🗑️ {} eliminado: {}", T::NAME, id);
        Ok(())
    }
}

pub type DriverService = CrudService<Driver>;
pub type BusService = CrudService<Bus>;
pub type RouteService = CrudService<Route>;
pub type TripService = CrudService<TripLog>;
pub type MaintenanceService = CrudService<MaintenanceRecord>;
pub type StudentTransportService = CrudService<StudentTransport>;
pub type TeacherService = CrudService<Teacher>;
pub type StudentRegistrationService = CrudService<StudentRegistration>;

//! Store del módulo de transporte
//!
//! Agrupa las colecciones de conductores, autobuses, rutas, viajes,
//! mantenimiento y transporte de alumnos. Cada una tiene su propio estado;
//! `load_all` las carga en paralelo y solo se sincroniza al final.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::client::{ApiClient, ApiFailure, ApiResult, FailureKind};
use crate::models::{
    Bus, Driver, MaintenanceRecord, Route, StudentTransport, TripLog, TripStatus,
};
use crate::services::{
    BusService, DriverService, MaintenanceService, ResourceApi, RouteService,
    StudentTransportService, TripService,
};

use super::ResourceStore;

/// Resultado de una carga completa: qué colecciones fallaron y por qué
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    pub failures: Vec<(&'static str, ApiFailure)>,
}

impl LoadSummary {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T>(&mut self, name: &'static str, result: ApiResult<T>) {
        if let Err(e) = result {
            self.failures.push((name, e));
        }
    }
}

#[derive(Clone)]
pub struct TransportStore {
    pub drivers: ResourceStore<Driver>,
    pub buses: ResourceStore<Bus>,
    pub routes: ResourceStore<Route>,
    pub trips: ResourceStore<TripLog>,
    pub maintenance: ResourceStore<MaintenanceRecord>,
    pub student_transport: ResourceStore<StudentTransport>,
    trip_service: Option<TripService>,
    student_transport_service: Option<StudentTransportService>,
}

impl TransportStore {
    /// Store conectado a la API real
    pub fn new(client: ApiClient) -> Self {
        let trip_service = TripService::new(client.clone());
        let student_transport_service = StudentTransportService::new(client.clone());

        Self {
            drivers: ResourceStore::new(Arc::new(DriverService::new(client.clone()))),
            buses: ResourceStore::new(Arc::new(BusService::new(client.clone()))),
            routes: ResourceStore::new(Arc::new(RouteService::new(client.clone()))),
            trips: ResourceStore::new(Arc::new(trip_service.clone())),
            maintenance: ResourceStore::new(Arc::new(MaintenanceService::new(client))),
            student_transport: ResourceStore::new(Arc::new(student_transport_service.clone())),
            trip_service: Some(trip_service),
            student_transport_service: Some(student_transport_service),
        }
    }

    /// Store sobre implementaciones arbitrarias de `ResourceApi`
    ///
    /// Sin servicios concretos, `update_trip_status` y `fetch_student_transport_by_route`
    /// no están disponibles.
    pub fn with_apis(
        drivers: Arc<dyn ResourceApi<Driver>>,
        buses: Arc<dyn ResourceApi<Bus>>,
        routes: Arc<dyn ResourceApi<Route>>,
        trips: Arc<dyn ResourceApi<TripLog>>,
        maintenance: Arc<dyn ResourceApi<MaintenanceRecord>>,
        student_transport: Arc<dyn ResourceApi<StudentTransport>>,
    ) -> Self {
        Self {
            drivers: ResourceStore::new(drivers),
            buses: ResourceStore::new(buses),
            routes: ResourceStore::new(routes),
            trips: ResourceStore::new(trips),
            maintenance: ResourceStore::new(maintenance),
            student_transport: ResourceStore::new(student_transport),
            trip_service: None,
            student_transport_service: None,
        }
    }

    /// Carga todas las colecciones en paralelo
    pub async fn load_all(&self) -> LoadSummary {
        tracing::info!("🚚 Cargando datos de transporte...");

        let (drivers, buses, routes, trips, maintenance, student_transport) = tokio::join!(
            self.drivers.fetch(),
            self.buses.fetch(),
            self.routes.fetch(),
            self.trips.fetch(),
            self.maintenance.fetch(),
            self.student_transport.fetch(),
        );

        let mut summary = LoadSummary::default();
        summary.record("drivers", drivers);
        summary.record("buses", buses);
        summary.record("routes", routes);
        summary.record("trips", trips);
        summary.record("maintenance", maintenance);
        summary.record("studentTransport", student_transport);

        if summary.is_complete() {
            tracing::info!("✅ Datos de transporte cargados");
        } else {
            tracing::warn!("⚠️ {} colecciones fallaron al cargar", summary.failures.len());
        }
        summary
    }

    /// Cambia el estado de un viaje y refresca la caché con la respuesta
    pub async fn update_trip_status(&self, id: &str, status: TripStatus) -> ApiResult<TripLog> {
        let service = self
            .trip_service
            .as_ref()
            .ok_or_else(|| ApiFailure::new(FailureKind::Rejected, "Trip service is not configured"))?;

        match service.update_status(id, status).await {
            Ok(trip) => {
                self.trips.apply_server_update(trip.clone()).await;
                Ok(trip)
            }
            Err(e) => {
                self.trips.record_failure(&e.message).await;
                Err(e)
            }
        }
    }

    /// Sustituye la colección de transporte de alumnos por los de una ruta
    pub async fn fetch_student_transport_by_route(
        &self,
        route_id: &str,
    ) -> ApiResult<Vec<StudentTransport>> {
        let service = self
            .student_transport_service
            .as_ref()
            .ok_or_else(|| ApiFailure::new(
                FailureKind::Rejected,
                "Student transport service is not configured",
            ))?;

        self.student_transport
            .replace_with(service.get_by_route(route_id))
            .await
    }

    /// Mantenimientos vencidos a fecha `today`
    pub async fn overdue_maintenance(&self, today: NaiveDate) -> Vec<MaintenanceRecord> {
        self.maintenance
            .items()
            .await
            .into_iter()
            .filter(|record| record.is_overdue(today))
            .collect()
    }

    /// Autobuses sin conductor asignado
    pub async fn unassigned_buses(&self) -> Vec<Bus> {
        self.buses
            .items()
            .await
            .into_iter()
            .filter(|bus| bus.driver_id.as_deref().map_or(true, str::is_empty))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaintenanceStatus, Resource};
    use crate::store::testing::FakeApi;
    use crate::store::SliceStatus;

    fn empty<T: Resource>() -> Arc<FakeApi<T>> {
        Arc::new(FakeApi::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_missing_services_are_not_network_failures() {
        let store = TransportStore::with_apis(
            empty::<Driver>(),
            empty::<Bus>(),
            empty::<Route>(),
            empty::<TripLog>(),
            empty::<MaintenanceRecord>(),
            empty::<StudentTransport>(),
        );

        let err = store
            .update_trip_status("t1", TripStatus::Completed)
            .await
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Rejected);

        let err = store.fetch_student_transport_by_route("r1").await.unwrap_err();
        assert_eq!(err.kind, FailureKind::Rejected);
    }

    #[tokio::test]
    async fn test_slices_do_not_share_error_state() {
        let buses = empty::<Bus>();
        buses.fail("Buses unavailable");

        let store = TransportStore::with_apis(
            empty::<Driver>(),
            buses,
            empty::<Route>(),
            empty::<TripLog>(),
            empty::<MaintenanceRecord>(),
            empty::<StudentTransport>(),
        );

        let summary = store.load_all().await;
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].0, "buses");

        assert_eq!(
            store.buses.status().await,
            SliceStatus::Failed("Buses unavailable".to_string())
        );
        assert_eq!(store.drivers.status().await, SliceStatus::Ready);
        assert_eq!(store.routes.status().await, SliceStatus::Ready);
    }

    #[tokio::test]
    async fn test_overdue_maintenance() {
        let overdue = MaintenanceRecord {
            id: "m1".into(),
            bus_id: "b1".into(),
            status: MaintenanceStatus::Scheduled,
            next_due_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            ..Default::default()
        };
        let done = MaintenanceRecord {
            id: "m2".into(),
            status: MaintenanceStatus::Completed,
            ..overdue.clone()
        };

        let store = TransportStore::with_apis(
            empty::<Driver>(),
            empty::<Bus>(),
            empty::<Route>(),
            empty::<TripLog>(),
            Arc::new(FakeApi::new(vec![overdue, done])),
            empty::<StudentTransport>(),
        );
        store.load_all().await;

        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let result = store.overdue_maintenance(today).await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "m1");
    }

    #[tokio::test]
    async fn test_trip_status_needs_concrete_service() {
        let store = TransportStore::with_apis(
            empty::<Driver>(),
            empty::<Bus>(),
            empty::<Route>(),
            empty::<TripLog>(),
            empty::<MaintenanceRecord>(),
            empty::<StudentTransport>(),
        );
        assert!(store
            .update_trip_status("t1", TripStatus::Completed)
            .await
            .is_err());
    }
}

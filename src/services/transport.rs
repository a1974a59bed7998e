//! Operaciones de transporte que no son CRUD plano

use crate::client::ApiResult;
use crate::dto::trip_dto::UpdateTripStatusRequest;
use crate::models::{Resource, StudentTransport, TripLog, TripStatus};

use super::CrudService;

impl CrudService<TripLog> {
    /// `PATCH /transport/trips/:id/status`
    pub async fn update_status(&self, id: &str, status: TripStatus) -> ApiResult<TripLog> {
        let path = format!("{}/status", self.item_path(id));
        let trip: TripLog = self
            .client()
            .patch(&path, &UpdateTripStatusRequest { status })
            .await?;
        tracing::info!("🚌 Viaje {} ahora está {}", id, trip.status);
        Ok(trip)
    }
}

impl CrudService<StudentTransport> {
    /// Alumnos asignados a una ruta
    pub async fn get_by_route(&self, route_id: &str) -> ApiResult<Vec<StudentTransport>> {
        let path = format!(
            "{}/route/{}",
            StudentTransport::PATH,
            urlencoding::encode(route_id)
        );
        let items: Option<Vec<StudentTransport>> = self.client().get(&path).await?;
        Ok(items.unwrap_or_default())
    }
}

//! Endpoints de transporte (`/api/transport/*`)

use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use validator::Validate;

use crate::dto::trip_dto::UpdateTripStatusRequest;
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedSchool;
use crate::models::{Bus, Driver, MaintenanceRecord, Resource, Route, StudentTransport, TripLog};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

use super::resources::resource_router;

pub fn create_transport_router() -> Router<AppState> {
    Router::new()
        .nest("/drivers", resource_router::<Driver>())
        .nest("/buses", resource_router::<Bus>())
        .nest("/routes", resource_router::<Route>())
        .nest(
            "/trips",
            resource_router::<TripLog>().route("/:id/status", patch(update_trip_status)),
        )
        .nest("/maintenance", resource_router::<MaintenanceRecord>())
        .nest(
            "/student-transport",
            resource_router::<StudentTransport>()
                .route("/route/:route_id", get(student_transport_by_route)),
        )
}

/// Cambia solo el estado de un viaje
async fn update_trip_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTripStatusRequest>,
) -> AppResult<Json<ApiResponse<TripLog>>> {
    let mut trip = state
        .trips
        .find_by_id(&auth.school_id, &id)
        .await
        .ok_or_else(|| not_found_error(TripLog::NAME, &id))?;

    trip.status = request.status;
    trip.validate()?;

    let updated = state.trips.update(&auth.school_id, &id, trip).await?;
    tracing::info!("🚌 Viaje {} → {}", id, updated.status.as_backend());

    Ok(Json(ApiResponse::success_with_message(
        updated,
        "Trip status updated successfully".to_string(),
    )))
}

async fn student_transport_by_route(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Path(route_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<StudentTransport>>>> {
    let rows = state
        .student_transport
        .find_where(&auth.school_id, |st| st.route_id == route_id)
        .await;
    Ok(Json(ApiResponse::success(rows)))
}

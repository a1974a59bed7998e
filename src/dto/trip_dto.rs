use serde::{Deserialize, Serialize};

use crate::models::TripStatus;

// Request para `PATCH /transport/trips/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTripStatusRequest {
    pub status: TripStatus,
}

//! Modelo de StudentTransport: asignación de un alumno a ruta/parada

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{default_true, Resource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentTransport {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Student is required"))]
    pub student_id: String,

    #[serde(default)]
    pub student_name: Option<String>,

    #[validate(length(min = 1, message = "Route is required"))]
    pub route_id: String,

    #[serde(default)]
    pub stop_id: Option<String>,

    #[serde(default)]
    pub pickup_time: Option<String>,

    #[serde(default)]
    pub drop_time: Option<String>,

    #[serde(default)]
    pub fee_amount: Option<Decimal>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for StudentTransport {
    const PATH: &'static str = "transport/student-transport";
    const NAME: &'static str = "student transport";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

//! Modelo de Driver

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{default_true, Resource};

/// Conductor de autobús. Bus y Trip lo referencian por id (sin cascada).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "License number is required"))]
    pub license_number: String,

    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for Driver {
    const PATH: &'static str = "transport/drivers";
    const NAME: &'static str = "driver";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

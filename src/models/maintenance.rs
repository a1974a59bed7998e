//! Modelo de MaintenanceRecord

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::{date_format, Resource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceType {
    #[default]
    Regular,
    Repair,
    Inspection,
}

impl MaintenanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::Regular => "regular",
            MaintenanceType::Repair => "repair",
            MaintenanceType::Inspection => "inspection",
        }
    }
}

impl fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(MaintenanceType::Regular),
            "repair" => Ok(MaintenanceType::Repair),
            "inspection" => Ok(MaintenanceType::Inspection),
            other => Err(format!("Unknown maintenance type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "SCHEDULED",
            MaintenanceStatus::InProgress => "IN_PROGRESS",
            MaintenanceStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "SCHEDULED" => Ok(MaintenanceStatus::Scheduled),
            "IN_PROGRESS" => Ok(MaintenanceStatus::InProgress),
            "COMPLETED" => Ok(MaintenanceStatus::Completed),
            other => Err(format!("Unknown maintenance status '{}'", other)),
        }
    }
}

/// Registro de mantenimiento de un autobús
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Bus is required"))]
    pub bus_id: String,

    #[serde(with = "date_format")]
    pub date: NaiveDate,

    #[serde(rename = "type", alias = "maintenanceType", default)]
    pub maintenance_type: MaintenanceType,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(custom = "validate_cost")]
    #[serde(default)]
    pub cost: Decimal,

    #[serde(default)]
    pub odometer_reading: u64,

    #[serde(default, with = "date_format::option")]
    pub next_due_date: Option<NaiveDate>,

    #[serde(default)]
    pub completed_by: String,

    #[serde(default)]
    pub status: MaintenanceStatus,
}

fn validate_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Cost cannot be negative".into());
        return Err(error);
    }
    Ok(())
}

impl MaintenanceRecord {
    /// Vencido = no completado y con próxima fecha anterior a `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != MaintenanceStatus::Completed
            && self.next_due_date.map_or(false, |due| due < today)
    }
}

impl Resource for MaintenanceRecord {
    const PATH: &'static str = "transport/maintenance";
    const NAME: &'static str = "maintenance record";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

//! Modelo de Bus (y su variante legacy Vehicle)
//!
//! `Bus` es la representación canónica del recurso `/transport/buses`.
//! `Vehicle` es el modelo del subsistema VehicleManagement, idéntico salvo
//! porque llama `vehicleName` a lo que el backend llama `make`; la conversión
//! vive aquí y solo se usa en el borde de la API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::{date_format, Resource};

/// Tipo de combustible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    #[default]
    Diesel,
    Petrol,
    #[serde(rename = "CNG")]
    Cng,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::Diesel,
        FuelType::Petrol,
        FuelType::Cng,
        FuelType::Electric,
        FuelType::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Diesel => "Diesel",
            FuelType::Petrol => "Petrol",
            FuelType::Cng => "CNG",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelType::ALL
            .into_iter()
            .find(|fuel| fuel.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown fuel type '{}'", s))
    }
}

/// Estado operativo del autobús
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl BusStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusStatus::Active => "ACTIVE",
            BusStatus::Maintenance => "MAINTENANCE",
            BusStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(BusStatus::Active),
            "MAINTENANCE" => Ok(BusStatus::Maintenance),
            "INACTIVE" => Ok(BusStatus::Inactive),
            other => Err(format!("Unknown bus status '{}'", other)),
        }
    }
}

/// Autobús escolar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_bus_dates", skip_on_field_errors = false))]
pub struct Bus {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Registration number is required"))]
    pub registration_number: String,

    #[validate(length(min = 1, message = "Make is required"))]
    pub make: String,

    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,

    #[validate(range(min = 1, message = "Capacity must be greater than 0"))]
    pub capacity: u32,

    #[serde(default)]
    pub fuel_type: FuelType,

    #[serde(default, with = "date_format::option")]
    pub purchase_date: Option<NaiveDate>,

    #[serde(default, with = "date_format::option")]
    pub insurance_expiry_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: BusStatus,

    #[serde(default)]
    pub driver_id: Option<String>,

    #[serde(default)]
    pub route_id: Option<String>,
}

/// El seguro no puede vencer antes de la compra
pub fn insurance_precedes_purchase(
    purchase: Option<NaiveDate>,
    insurance_expiry: Option<NaiveDate>,
) -> bool {
    matches!((purchase, insurance_expiry), (Some(p), Some(i)) if i < p)
}

fn validate_bus_dates(bus: &Bus) -> Result<(), ValidationError> {
    if insurance_precedes_purchase(bus.purchase_date, bus.insurance_expiry_date) {
        let mut error = ValidationError::new("insurance_expiry_date");
        error.message = Some("Insurance expiry date cannot be before purchase date".into());
        return Err(error);
    }
    Ok(())
}

impl Resource for Bus {
    const PATH: &'static str = "transport/buses";
    const NAME: &'static str = "bus";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Modelo legacy de VehicleManagement (`vehicleName` ↔ `make`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub id: String,
    pub registration_number: String,
    pub vehicle_name: String,
    pub model: String,
    pub capacity: u32,
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default, with = "date_format::option")]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default, with = "date_format::option")]
    pub insurance_expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: BusStatus,
    #[serde(default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub route_id: Option<String>,
}

impl Resource for Vehicle {
    const PATH: &'static str = "transport/buses";
    const NAME: &'static str = "vehicle";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

impl From<Bus> for Vehicle {
    fn from(bus: Bus) -> Self {
        Self {
            id: bus.id,
            registration_number: bus.registration_number,
            vehicle_name: bus.make,
            model: bus.model,
            capacity: bus.capacity,
            fuel_type: bus.fuel_type,
            purchase_date: bus.purchase_date,
            insurance_expiry_date: bus.insurance_expiry_date,
            status: bus.status,
            driver_id: bus.driver_id,
            route_id: bus.route_id,
        }
    }
}

impl From<Vehicle> for Bus {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            registration_number: vehicle.registration_number,
            make: vehicle.vehicle_name,
            model: vehicle.model,
            capacity: vehicle.capacity,
            fuel_type: vehicle.fuel_type,
            purchase_date: vehicle.purchase_date,
            insurance_expiry_date: vehicle.insurance_expiry_date,
            status: vehicle.status,
            driver_id: vehicle.driver_id,
            route_id: vehicle.route_id,
        }
    }
}

//! Modelo de TripLog
//!
//! El frontend y el backend escriben el estado del viaje de forma distinta
//! (`in-progress` frente a `IN_PROGRESS`). Ninguna de las dos se asume
//! canónica: `TripStatus` conoce ambas y el mapeo es explícito.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::{date_format, Resource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TripStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub const ALL: [TripStatus; 4] = [
        TripStatus::Scheduled,
        TripStatus::InProgress,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    /// Forma usada por formularios y tablas
    pub fn as_frontend(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::InProgress => "in-progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    /// Forma que espera el backend
    pub fn as_backend(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "SCHEDULED",
            TripStatus::InProgress => "IN_PROGRESS",
            TripStatus::Completed => "COMPLETED",
            TripStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_frontend(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_frontend() == value)
    }

    pub fn from_backend(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_backend() == value)
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_frontend())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_frontend(s)
            .or_else(|| Self::from_backend(s))
            .ok_or_else(|| format!("Unknown trip status '{}'", s))
    }
}

impl Serialize for TripStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_backend())
    }
}

impl<'de> Deserialize<'de> for TripStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Registro de un viaje
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_odometers"))]
pub struct TripLog {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Bus is required"))]
    pub bus_id: String,

    #[validate(length(min = 1, message = "Route is required"))]
    pub route_id: String,

    #[validate(length(min = 1, message = "Driver is required"))]
    pub driver_id: String,

    #[serde(with = "date_format")]
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "Start time is required"))]
    pub start_time: String,

    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default)]
    pub status: TripStatus,

    #[serde(default)]
    pub start_odometer: Option<u64>,

    #[serde(default)]
    pub end_odometer: Option<u64>,

    #[serde(default)]
    pub deviation_notes: Option<String>,

    #[serde(default)]
    pub delay_minutes: Option<u32>,
}

/// Un viaje completado no puede terminar con menos kilómetros de los que empezó
pub fn odometer_regressed(
    status: TripStatus,
    start: Option<u64>,
    end: Option<u64>,
) -> bool {
    status == TripStatus::Completed && matches!((start, end), (Some(s), Some(e)) if e < s)
}

fn validate_odometers(trip: &TripLog) -> Result<(), ValidationError> {
    if odometer_regressed(trip.status, trip.start_odometer, trip.end_odometer) {
        let mut error = ValidationError::new("end_odometer");
        error.message =
            Some("End odometer reading cannot be less than start odometer reading".into());
        return Err(error);
    }
    Ok(())
}

impl TripLog {
    pub fn distance(&self) -> Option<u64> {
        match (self.start_odometer, self.end_odometer) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}

impl Resource for TripLog {
    const PATH: &'static str = "transport/trips";
    const NAME: &'static str = "trip";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

//! Modelos del sistema
//!
//! Este módulo contiene las entidades canónicas de la escuela (transporte,
//! profesores, matrículas). Todas viajan en camelCase por la API y son
//! propiedad del backend: el cliente solo mantiene copias en caché.

pub mod bus;
pub mod driver;
pub mod maintenance;
pub mod route;
pub mod student;
pub mod student_transport;
pub mod teacher;
pub mod trip;

pub use bus::{insurance_precedes_purchase, Bus, BusStatus, FuelType, Vehicle};
pub use driver::Driver;
pub use maintenance::{MaintenanceRecord, MaintenanceStatus, MaintenanceType};
pub use route::{Route, RouteStop, Schedule};
pub use student::{ParentInfo, StudentRegistration};
pub use student_transport::StudentTransport;
pub use teacher::{ClassSections, Teacher, TeacherStatus};
pub use trip::{odometer_regressed, TripLog, TripStatus};

use serde::{de::DeserializeOwned, Serialize};

/// Recurso REST gestionado por el backend
///
/// `PATH` es relativo a la base de la API (sin barra inicial) y `NAME`
/// se usa en logs y mensajes de error.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const PATH: &'static str;
    const NAME: &'static str;

    fn id(&self) -> &str;

    fn assign_id(&mut self, id: String);
}

/// Serialización de fechas `YYYY-MM-DD`
///
/// El backend (Prisma) devuelve fechas como timestamps ISO completos, así
/// que al leer solo nos quedamos con la parte de la fecha.
pub mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        let head = value.get(..10).unwrap_or(value);
        NaiveDate::parse_from_str(head, FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
    }

    pub mod option {
        use super::{parse, FORMAT};
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => parse(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
            }
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::date_format;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_accepts_iso_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1);
        assert_eq!(date_format::parse("2023-01-01"), expected);
        assert_eq!(date_format::parse("2023-01-01T00:00:00.000Z"), expected);
        assert_eq!(date_format::parse("01/01/2023"), None);
    }
}

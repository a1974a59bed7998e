//! Modelo de Route
//!
//! Una ruta tiene paradas ordenadas por `sequence` y horarios. El orden en
//! el que llegan del backend no está garantizado.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Resource;

/// Parada de una ruta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Stop name is required"))]
    pub name: String,

    #[serde(default)]
    pub location: String,

    pub sequence: u32,

    /// Hora estimada de llegada (`HH:MM`)
    #[serde(default)]
    pub estimated_time: Option<String>,

    #[serde(default)]
    pub student_count: u32,
}

/// Horario de salida/llegada de una ruta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub id: String,
    pub day_of_week: String,
    pub departure_time: String,
    pub arrival_time: String,
}

/// Ruta escolar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_stop_sequences"))]
pub struct Route {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Route name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1, message = "Start location is required"))]
    pub start_location: String,

    #[validate(length(min = 1, message = "End location is required"))]
    pub end_location: String,

    /// Kilómetros
    #[validate(range(min = 0.0, message = "Distance cannot be negative"))]
    #[serde(default)]
    pub distance: f64,

    /// Minutos
    #[serde(default)]
    pub estimated_time: u32,

    #[serde(default)]
    pub bus_id: Option<String>,

    #[validate]
    #[serde(default)]
    pub stops: Vec<RouteStop>,

    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

impl Route {
    /// Paradas en orden de recorrido
    pub fn ordered_stops(&self) -> Vec<&RouteStop> {
        let mut stops: Vec<&RouteStop> = self.stops.iter().collect();
        stops.sort_by_key(|stop| stop.sequence);
        stops
    }

    pub fn total_students(&self) -> u32 {
        self.stops.iter().map(|s| s.student_count).sum()
    }

    /// Primera secuencia repetida, si la hay
    pub fn duplicate_sequence(&self) -> Option<u32> {
        let mut seen = std::collections::HashSet::new();
        self.stops
            .iter()
            .map(|s| s.sequence)
            .find(|seq| !seen.insert(*seq))
    }
}

fn validate_stop_sequences(route: &Route) -> Result<(), ValidationError> {
    if let Some(seq) = route.duplicate_sequence() {
        let mut error = ValidationError::new("stops");
        error.message = Some(format!("Duplicate stop sequence {}", seq).into());
        return Err(error);
    }
    Ok(())
}

impl Resource for Route {
    const PATH: &'static str = "transport/routes";
    const NAME: &'static str = "route";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(name: &str, sequence: u32) -> RouteStop {
        RouteStop {
            name: name.into(),
            sequence,
            student_count: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_ordered_stops() {
        let route = Route {
            stops: vec![stop("C", 3), stop("A", 1), stop("B", 2)],
            ..Default::default()
        };
        let names: Vec<&str> = route.ordered_stops().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(route.total_students(), 9);
    }

    #[test]
    fn test_duplicate_sequence_fails_validation() {
        let route = Route {
            name: "North".into(),
            start_location: "Depot".into(),
            end_location: "School".into(),
            stops: vec![stop("A", 1), stop("B", 1)],
            ..Default::default()
        };
        assert_eq!(route.duplicate_sequence(), Some(1));
        assert!(route.validate().is_err());
    }
}

//! Borradores de los formularios de transporte
//!
//! Los números se guardan como `Option` con signo: un input vacío es `None`
//! y un valor negativo llega hasta la validación para poder señalarlo.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::{
    insurance_precedes_purchase, odometer_regressed, Bus, BusStatus, Driver, FuelType,
    MaintenanceRecord, MaintenanceStatus, MaintenanceType, Route, RouteStop, Schedule, TripLog,
    TripStatus, Vehicle,
};
use crate::utils::validation::validate_time;

use super::{
    date_input, non_blank, non_negative_input, positive_input, require, Draft, FieldValue,
    FormError, FormErrors, FormState,
};

fn unknown(field: &str) -> FormError {
    FormError::UnknownField(field.to_string())
}

fn invalid(field: &str, message: String) -> FormError {
    FormError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn to_u32(value: Option<i64>) -> u32 {
    value.and_then(|n| u32::try_from(n).ok()).unwrap_or(0)
}

fn to_u64(value: Option<i64>) -> Option<u64> {
    value.and_then(|n| u64::try_from(n).ok())
}

// ==================== Driver ====================

#[derive(Debug, Clone, PartialEq)]
pub struct DriverDraft {
    pub id: String,
    pub name: String,
    pub license_number: String,
    pub contact_number: String,
    pub is_active: bool,
}

impl Default for DriverDraft {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            license_number: String::new(),
            contact_number: String::new(),
            is_active: true,
        }
    }
}

impl From<&Driver> for DriverDraft {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id.clone(),
            name: driver.name.clone(),
            license_number: driver.license_number.clone(),
            contact_number: driver.contact_number.clone(),
            is_active: driver.is_active,
        }
    }
}

impl Draft for DriverDraft {
    type Output = Driver;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "licenseNumber" => self.license_number = value.into_text(field)?,
            "contactNumber" => self.contact_number = value.into_text(field)?,
            "isActive" => self.is_active = value.into_bool(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn toggle(&mut self, field: &str) -> Result<(), FormError> {
        match field {
            "isActive" => self.is_active = !self.is_active,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        require(&mut errors, "name", &self.name, "Name");
        require(&mut errors, "licenseNumber", &self.license_number, "License number");
        require(&mut errors, "contactNumber", &self.contact_number, "Contact number");
        errors
    }

    fn build(&self) -> Result<Driver, FormErrors> {
        Ok(Driver {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            license_number: self.license_number.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            is_active: self.is_active,
        })
    }
}

// ==================== Bus ====================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusDraft {
    pub id: String,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub capacity: Option<i64>,
    pub fuel_type: FuelType,
    pub purchase_date: String,
    pub insurance_expiry_date: String,
    pub status: BusStatus,
    pub driver_id: String,
    pub route_id: String,
}

impl From<&Bus> for BusDraft {
    fn from(bus: &Bus) -> Self {
        Self {
            id: bus.id.clone(),
            registration_number: bus.registration_number.clone(),
            make: bus.make.clone(),
            model: bus.model.clone(),
            capacity: Some(i64::from(bus.capacity)),
            fuel_type: bus.fuel_type,
            purchase_date: date_text(bus.purchase_date),
            insurance_expiry_date: date_text(bus.insurance_expiry_date),
            status: bus.status,
            driver_id: bus.driver_id.clone().unwrap_or_default(),
            route_id: bus.route_id.clone().unwrap_or_default(),
        }
    }
}

impl BusDraft {
    /// Valida y devuelve las fechas ya convertidas
    fn check(&self, errors: &mut FormErrors) -> (Option<NaiveDate>, Option<NaiveDate>) {
        require(errors, "registrationNumber", &self.registration_number, "Registration number");
        require(errors, "make", &self.make, "Make");
        require(errors, "model", &self.model, "Model");
        positive_input(errors, "capacity", self.capacity, "Capacity");

        let purchase = date_input(errors, "purchaseDate", &self.purchase_date, "Purchase date", false);
        let insurance = date_input(
            errors,
            "insuranceExpiryDate",
            &self.insurance_expiry_date,
            "Insurance expiry date",
            false,
        );
        if insurance_precedes_purchase(purchase, insurance) {
            errors.insert(
                "insuranceExpiryDate",
                "Insurance expiry date cannot be before purchase date",
            );
        }
        (purchase, insurance)
    }
}

impl Draft for BusDraft {
    type Output = Bus;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match field {
            "registrationNumber" => self.registration_number = value.into_text(field)?,
            "make" => self.make = value.into_text(field)?,
            "model" => self.model = value.into_text(field)?,
            "capacity" => self.capacity = value.into_number(field, "Capacity")?,
            "fuelType" => {
                self.fuel_type = value.into_text(field)?.parse().map_err(|e| invalid(field, e))?
            }
            "purchaseDate" => self.purchase_date = value.into_text(field)?,
            "insuranceExpiryDate" => self.insurance_expiry_date = value.into_text(field)?,
            "status" => {
                self.status = value.into_text(field)?.parse().map_err(|e| invalid(field, e))?
            }
            "driverId" => self.driver_id = value.into_text(field)?,
            "routeId" => self.route_id = value.into_text(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        self.check(&mut errors);
        errors
    }

    fn build(&self) -> Result<Bus, FormErrors> {
        let mut errors = FormErrors::new();
        let (purchase_date, insurance_expiry_date) = self.check(&mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Bus {
            id: self.id.clone(),
            registration_number: self.registration_number.trim().to_string(),
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            capacity: to_u32(self.capacity),
            fuel_type: self.fuel_type,
            purchase_date,
            insurance_expiry_date,
            status: self.status,
            driver_id: non_blank(&self.driver_id),
            route_id: non_blank(&self.route_id),
        })
    }
}

// ==================== Vehicle ====================

/// Formulario de VehicleManagement: el de Bus con `vehicleName` en lugar de `make`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleDraft(pub BusDraft);

impl From<&Vehicle> for VehicleDraft {
    fn from(vehicle: &Vehicle) -> Self {
        VehicleDraft(BusDraft::from(&Bus::from(vehicle.clone())))
    }
}

impl Draft for VehicleDraft {
    type Output = Vehicle;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match field {
            "vehicleName" => self.0.set_field("make", value),
            "make" => Err(unknown(field)),
            _ => self.0.set_field(field, value),
        }
    }

    fn validate(&self) -> FormErrors {
        let mut errors = self.0.validate();
        if errors.remove("make").is_some() {
            errors.insert("vehicleName", "Vehicle name is required");
        }
        errors
    }

    fn build(&self) -> Result<Vehicle, FormErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        self.0.build().map(Vehicle::from)
    }
}

// ==================== Route ====================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopDraft {
    pub id: String,
    pub name: String,
    pub location: String,
    pub sequence: Option<i64>,
    pub estimated_time: String,
    pub student_count: Option<i64>,
}

impl From<&RouteStop> for StopDraft {
    fn from(stop: &RouteStop) -> Self {
        Self {
            id: stop.id.clone(),
            name: stop.name.clone(),
            location: stop.location.clone(),
            sequence: Some(i64::from(stop.sequence)),
            estimated_time: stop.estimated_time.clone().unwrap_or_default(),
            student_count: Some(i64::from(stop.student_count)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteDraft {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_location: String,
    pub end_location: String,
    pub distance: Option<f64>,
    pub estimated_time: Option<i64>,
    pub bus_id: String,
    pub stops: Vec<StopDraft>,
    pub schedules: Vec<Schedule>,
}

impl From<&Route> for RouteDraft {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.clone(),
            name: route.name.clone(),
            description: route.description.clone(),
            start_location: route.start_location.clone(),
            end_location: route.end_location.clone(),
            distance: Some(route.distance),
            estimated_time: Some(i64::from(route.estimated_time)),
            bus_id: route.bus_id.clone().unwrap_or_default(),
            stops: route.ordered_stops().into_iter().map(StopDraft::from).collect(),
            schedules: route.schedules.clone(),
        }
    }
}

impl FormState<RouteDraft> {
    /// Cambia un campo de una parada con el mismo registro de errores que `change`
    pub fn change_stop(
        &mut self,
        index: usize,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        let key = format!("stops[{}].{}", index, field);
        let result = self.draft.set_stop_field(index, field, value.into());
        self.record_input(&key, result)
    }

    /// Quita una parada; los índices cambian, así que se olvidan sus errores
    pub fn remove_stop(&mut self, index: usize) -> Option<StopDraft> {
        let removed = self.draft.remove_stop(index)?;
        self.errors.retain_fields(|field| !field.starts_with("stops["));
        self.input_errors.retain_fields(|field| !field.starts_with("stops["));
        Some(removed)
    }
}

impl RouteDraft {
    /// Añade una parada vacía al final del recorrido
    pub fn add_stop(&mut self) -> usize {
        let next = self.stops.iter().filter_map(|s| s.sequence).max().unwrap_or(0) + 1;
        self.stops.push(StopDraft {
            sequence: Some(next),
            ..Default::default()
        });
        self.stops.len() - 1
    }

    pub fn remove_stop(&mut self, index: usize) -> Option<StopDraft> {
        (index < self.stops.len()).then(|| self.stops.remove(index))
    }

    pub fn set_stop_field(
        &mut self,
        index: usize,
        field: &str,
        value: FieldValue,
    ) -> Result<(), FormError> {
        let key = format!("stops[{}].{}", index, field);
        let stop = self
            .stops
            .get_mut(index)
            .ok_or_else(|| FormError::UnknownField(key.clone()))?;

        match field {
            "name" => stop.name = value.into_text(&key)?,
            "location" => stop.location = value.into_text(&key)?,
            "sequence" => stop.sequence = value.into_number(&key, "Sequence")?,
            "estimatedTime" => stop.estimated_time = value.into_text(&key)?,
            "studentCount" => stop.student_count = value.into_number(&key, "Student count")?,
            _ => return Err(FormError::UnknownField(key)),
        }
        Ok(())
    }

    fn check_stops(&self, errors: &mut FormErrors) {
        let mut seen: HashMap<i64, usize> = HashMap::new();

        for (index, stop) in self.stops.iter().enumerate() {
            let key = |field: &str| format!("stops[{}].{}", index, field);

            require(errors, &key("name"), &stop.name, "Stop name");
            if let Some(seq) = positive_input(errors, &key("sequence"), stop.sequence, "Sequence") {
                if seen.insert(seq, index).is_some() {
                    errors.insert(&key("sequence"), format!("Duplicate stop sequence {}", seq));
                }
            }
            if !stop.estimated_time.trim().is_empty() {
                errors.check(&key("estimatedTime"), validate_time(&stop.estimated_time, "Estimated time"));
            }
            non_negative_input(errors, &key("studentCount"), stop.student_count, "Student count");
        }
    }
}

impl Draft for RouteDraft {
    type Output = Route;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match field {
            "name" => self.name = value.into_text(field)?,
            "description" => self.description = value.into_text(field)?,
            "startLocation" => self.start_location = value.into_text(field)?,
            "endLocation" => self.end_location = value.into_text(field)?,
            "distance" => self.distance = value.into_number(field, "Distance")?,
            "estimatedTime" => self.estimated_time = value.into_number(field, "Estimated time")?,
            "busId" => self.bus_id = value.into_text(field)?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        require(&mut errors, "name", &self.name, "Route name");
        require(&mut errors, "startLocation", &self.start_location, "Start location");
        require(&mut errors, "endLocation", &self.end_location, "End location");
        non_negative_input(&mut errors, "distance", self.distance, "Distance");
        non_negative_input(&mut errors, "estimatedTime", self.estimated_time, "Estimated time");
        self.check_stops(&mut errors);
        errors
    }

    fn build(&self) -> Result<Route, FormErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let stops = self
            .stops
            .iter()
            .map(|stop| RouteStop {
                id: stop.id.clone(),
                name: stop.name.trim().to_string(),
                location: stop.location.trim().to_string(),
                sequence: to_u32(stop.sequence),
                estimated_time: non_blank(&stop.estimated_time),
                student_count: to_u32(stop.student_count),
            })
            .collect();

        Ok(Route {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            start_location: self.start_location.trim().to_string(),
            end_location: self.end_location.trim().to_string(),
            distance: self.distance.unwrap_or(0.0),
            estimated_time: to_u32(self.estimated_time),
            bus_id: non_blank(&self.bus_id),
            stops,
            schedules: self.schedules.clone(),
        })
    }
}

// ==================== Maintenance ====================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceDraft {
    pub id: String,
    pub bus_id: String,
    pub date: String,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub cost: Option<Decimal>,
    pub odometer_reading: Option<i64>,
    pub next_due_date: String,
    pub completed_by: String,
    pub status: MaintenanceStatus,
}

impl From<&MaintenanceRecord> for MaintenanceDraft {
    fn from(record: &MaintenanceRecord) -> Self {
        Self {
            id: record.id.clone(),
            bus_id: record.bus_id.clone(),
            date: date_text(Some(record.date)),
            maintenance_type: record.maintenance_type,
            description: record.description.clone(),
            cost: Some(record.cost),
            odometer_reading: i64::try_from(record.odometer_reading).ok(),
            next_due_date: date_text(record.next_due_date),
            completed_by: record.completed_by.clone(),
            status: record.status,
        }
    }
}

impl MaintenanceDraft {
    fn check(&self, errors: &mut FormErrors) -> (Option<NaiveDate>, Option<NaiveDate>) {
        require(errors, "busId", &self.bus_id, "Bus");
        require(errors, "description", &self.description, "Description");
        let date = date_input(errors, "date", &self.date, "Date", true);
        non_negative_input(errors, "cost", self.cost, "Cost");
        non_negative_input(errors, "odometerReading", self.odometer_reading, "Odometer reading");

        let next_due = date_input(errors, "nextDueDate", &self.next_due_date, "Next due date", false);
        if matches!((date, next_due), (Some(d), Some(n)) if n < d) {
            errors.insert("nextDueDate", "Next due date cannot be before the maintenance date");
        }
        (date, next_due)
    }
}

impl Draft for MaintenanceDraft {
    type Output = MaintenanceRecord;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match field {
            "busId" => self.bus_id = value.into_text(field)?,
            "date" => self.date = value.into_text(field)?,
            "type" | "maintenanceType" => {
                self.maintenance_type =
                    value.into_text(field)?.parse().map_err(|e| invalid(field, e))?
            }
            "description" => self.description = value.into_text(field)?,
            "cost" => self.cost = value.into_number(field, "Cost")?,
            "odometerReading" => {
                self.odometer_reading = value.into_number(field, "Odometer reading")?
            }
            "nextDueDate" => self.next_due_date = value.into_text(field)?,
            "completedBy" => self.completed_by = value.into_text(field)?,
            "status" => {
                self.status = value.into_text(field)?.parse().map_err(|e| invalid(field, e))?
            }
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        self.check(&mut errors);
        errors
    }

    fn build(&self) -> Result<MaintenanceRecord, FormErrors> {
        let mut errors = FormErrors::new();
        let (date, next_due_date) = self.check(&mut errors);
        let date = match date {
            Some(date) if errors.is_empty() => date,
            _ => return Err(errors),
        };

        Ok(MaintenanceRecord {
            id: self.id.clone(),
            bus_id: self.bus_id.trim().to_string(),
            date,
            maintenance_type: self.maintenance_type,
            description: self.description.trim().to_string(),
            cost: self.cost.unwrap_or(Decimal::ZERO),
            odometer_reading: to_u64(self.odometer_reading).unwrap_or(0),
            next_due_date,
            completed_by: self.completed_by.trim().to_string(),
            status: self.status,
        })
    }
}

// ==================== Trip ====================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripDraft {
    pub id: String,
    pub bus_id: String,
    pub route_id: String,
    pub driver_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: TripStatus,
    pub start_odometer: Option<i64>,
    pub end_odometer: Option<i64>,
    pub deviation_notes: String,
    pub delay_minutes: Option<i64>,
}

impl From<&TripLog> for TripDraft {
    fn from(trip: &TripLog) -> Self {
        Self {
            id: trip.id.clone(),
            bus_id: trip.bus_id.clone(),
            route_id: trip.route_id.clone(),
            driver_id: trip.driver_id.clone(),
            date: date_text(Some(trip.date)),
            start_time: trip.start_time.clone(),
            end_time: trip.end_time.clone().unwrap_or_default(),
            status: trip.status,
            start_odometer: trip.start_odometer.and_then(|n| i64::try_from(n).ok()),
            end_odometer: trip.end_odometer.and_then(|n| i64::try_from(n).ok()),
            deviation_notes: trip.deviation_notes.clone().unwrap_or_default(),
            delay_minutes: trip.delay_minutes.map(i64::from),
        }
    }
}

impl TripDraft {
    fn check(&self, errors: &mut FormErrors) -> Option<NaiveDate> {
        require(errors, "busId", &self.bus_id, "Bus");
        require(errors, "routeId", &self.route_id, "Route");
        require(errors, "driverId", &self.driver_id, "Driver");
        let date = date_input(errors, "date", &self.date, "Date", true);

        require(errors, "startTime", &self.start_time, "Start time");
        if !errors.contains("startTime") {
            errors.check("startTime", validate_time(&self.start_time, "Start time"));
        }
        if !self.end_time.trim().is_empty() {
            errors.check("endTime", validate_time(&self.end_time, "End time"));
        }

        let start = non_negative_input(errors, "startOdometer", self.start_odometer, "Start odometer");
        let end = non_negative_input(errors, "endOdometer", self.end_odometer, "End odometer");
        if odometer_regressed(self.status, to_u64(start), to_u64(end)) {
            errors.insert(
                "endOdometer",
                "End odometer reading cannot be less than start odometer reading",
            );
        }
        non_negative_input(errors, "delayMinutes", self.delay_minutes, "Delay");
        date
    }
}

impl Draft for TripDraft {
    type Output = TripLog;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match field {
            "busId" => self.bus_id = value.into_text(field)?,
            "routeId" => self.route_id = value.into_text(field)?,
            "driverId" => self.driver_id = value.into_text(field)?,
            "date" => self.date = value.into_text(field)?,
            "startTime" => self.start_time = value.into_text(field)?,
            "endTime" => self.end_time = value.into_text(field)?,
            "status" => {
                self.status = value.into_text(field)?.parse().map_err(|e| invalid(field, e))?
            }
            "startOdometer" => self.start_odometer = value.into_number(field, "Start odometer")?,
            "endOdometer" => self.end_odometer = value.into_number(field, "End odometer")?,
            "deviationNotes" => self.deviation_notes = value.into_text(field)?,
            "delayMinutes" => self.delay_minutes = value.into_number(field, "Delay")?,
            _ => return Err(unknown(field)),
        }
        Ok(())
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        self.check(&mut errors);
        errors
    }

    fn build(&self) -> Result<TripLog, FormErrors> {
        let mut errors = FormErrors::new();
        let date = match self.check(&mut errors) {
            Some(date) if errors.is_empty() => date,
            _ => return Err(errors),
        };

        Ok(TripLog {
            id: self.id.clone(),
            bus_id: self.bus_id.trim().to_string(),
            route_id: self.route_id.trim().to_string(),
            driver_id: self.driver_id.trim().to_string(),
            date,
            start_time: self.start_time.trim().to_string(),
            end_time: non_blank(&self.end_time),
            status: self.status,
            start_odometer: to_u64(self.start_odometer),
            end_odometer: to_u64(self.end_odometer),
            deviation_notes: non_blank(&self.deviation_notes),
            delay_minutes: self.delay_minutes.and_then(|n| u32::try_from(n).ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormState, SubmitError};

    fn filled_bus() -> FormState<BusDraft> {
        let mut form = FormState::<BusDraft>::create();
        form.change("registrationNumber", "KA-01-1234").unwrap();
        form.change("make", "Tata").unwrap();
        form.change("model", "Starbus").unwrap();
        form.change("capacity", "40").unwrap();
        form
    }

    #[test]
    fn test_bus_capacity_rules() {
        let mut form = filled_bus();
        form.change("capacity", "0").unwrap();
        assert!(matches!(form.submit(), Err(SubmitError::Invalid(_))));
        assert_eq!(
            form.errors().get("capacity"),
            Some("Capacity must be greater than 0")
        );
        assert_eq!(
            form.take_toast().as_deref(),
            Some("Please fix the errors in the form")
        );

        form.change("capacity", "").unwrap();
        assert!(form.errors().get("capacity").is_none());
        assert_eq!(form.draft().capacity, None);
        assert_eq!(form.draft().validate().get("capacity"), Some("Capacity is required"));

        form.change("capacity", "abc").unwrap();
        assert_eq!(form.errors().get("capacity"), Some("Capacity must be a number"));
    }

    #[test]
    fn test_bus_insurance_before_purchase() {
        let mut form = filled_bus();
        form.change("purchaseDate", "2023-01-01").unwrap();
        form.change("insuranceExpiryDate", "2022-01-01").unwrap();

        assert!(form.submit().is_err());
        assert_eq!(
            form.errors().get("insuranceExpiryDate"),
            Some("Insurance expiry date cannot be before purchase date")
        );

        form.change("insuranceExpiryDate", "2023-01-01").unwrap();
        let bus = form.submit().unwrap();
        assert_eq!(bus.capacity, 40);
        assert_eq!(bus.insurance_expiry_date, bus.purchase_date);
        assert!(form.is_submitting());
    }

    #[test]
    fn test_vehicle_form_uses_vehicle_name() {
        let mut form = FormState::<VehicleDraft>::create();
        form.change("registrationNumber", "KA-01-1234").unwrap();
        form.change("model", "Starbus").unwrap();
        form.change("capacity", "40").unwrap();

        assert!(form.submit().is_err());
        assert_eq!(form.errors().get("vehicleName"), Some("Vehicle name is required"));
        assert!(form.errors().get("make").is_none());

        form.change("vehicleName", "Tata").unwrap();
        let vehicle = form.submit().unwrap();
        assert_eq!(vehicle.vehicle_name, "Tata");
    }

    #[test]
    fn test_trip_completed_odometer() {
        let mut draft = TripDraft {
            bus_id: "b1".into(),
            route_id: "r1".into(),
            driver_id: "d1".into(),
            date: "2024-03-01".into(),
            start_time: "07:30".into(),
            start_odometer: Some(1200),
            end_odometer: Some(1100),
            ..Default::default()
        };
        assert!(draft.validate().is_empty());

        draft.set_field("status", "completed".into()).unwrap();
        assert_eq!(
            draft.validate().get("endOdometer"),
            Some("End odometer reading cannot be less than start odometer reading")
        );

        draft.set_field("endOdometer", "1250".into()).unwrap();
        let trip = draft.build().unwrap();
        assert_eq!(trip.status, TripStatus::Completed);
        assert_eq!(trip.distance(), Some(50));
    }

    #[test]
    fn test_negative_numbers_are_rejected() {
        let mut draft = MaintenanceDraft {
            bus_id: "b1".into(),
            date: "2024-03-01".into(),
            description: "Brake pads".into(),
            ..Default::default()
        };
        draft.set_field("cost", "-10".into()).unwrap();
        draft.set_field("odometerReading", "-1".into()).unwrap();

        let errors = draft.validate();
        assert_eq!(errors.get("cost"), Some("Cost cannot be negative"));
        assert_eq!(
            errors.get("odometerReading"),
            Some("Odometer reading cannot be negative")
        );

        draft.set_field("cost", "".into()).unwrap();
        draft.set_field("odometerReading", "52000".into()).unwrap();
        let record = draft.build().unwrap();
        assert_eq!(record.cost, Decimal::ZERO);
        assert_eq!(record.odometer_reading, 52000);
    }

    #[test]
    fn test_route_stops() {
        let mut draft = RouteDraft {
            name: "North".into(),
            start_location: "Depot".into(),
            end_location: "School".into(),
            ..Default::default()
        };
        let first = draft.add_stop();
        let second = draft.add_stop();
        draft.set_stop_field(first, "name", "Gate 1".into()).unwrap();
        draft.set_stop_field(second, "name", "Market".into()).unwrap();
        assert_eq!(draft.stops[second].sequence, Some(2));
        assert!(draft.validate().is_empty());

        draft.set_stop_field(second, "sequence", "1".into()).unwrap();
        assert_eq!(
            draft.validate().get("stops[1].sequence"),
            Some("Duplicate stop sequence 1")
        );

        draft.set_stop_field(second, "sequence", "2".into()).unwrap();
        draft.set_field("distance", "-3".into()).unwrap();
        assert_eq!(draft.validate().get("distance"), Some("Distance cannot be negative"));
    }

    #[test]
    fn test_unparsed_number_blocks_submit() {
        let mut form = filled_bus();
        form.change("capacity", "abc").unwrap();
        assert_eq!(form.errors().get("capacity"), Some("Capacity must be a number"));
        assert_eq!(form.draft().capacity, Some(40));

        match form.submit() {
            Err(SubmitError::Invalid(errors)) => {
                assert_eq!(errors.get("capacity"), Some("Capacity must be a number"))
            }
            other => panic!("unexpected submit result: {:?}", other),
        }
        assert!(!form.is_submitting());

        form.change("capacity", "45").unwrap();
        assert_eq!(form.submit().unwrap().capacity, 45);
    }

    #[test]
    fn test_unknown_enum_value_blocks_submit() {
        let mut form = filled_bus();
        form.change("fuelType", "Steam").unwrap();
        assert!(form.errors().contains("fuelType"));
        assert!(matches!(form.submit(), Err(SubmitError::Invalid(_))));

        form.change("fuelType", "CNG").unwrap();
        assert_eq!(form.submit().unwrap().fuel_type, FuelType::Cng);
    }

    #[test]
    fn test_unparsed_stop_field_blocks_submit() {
        let mut form = FormState::<RouteDraft>::create();
        form.change("name", "North loop").unwrap();
        form.change("startLocation", "Depot").unwrap();
        form.change("endLocation", "School").unwrap();
        let index = form.draft_mut().add_stop();
        form.change_stop(index, "name", "Gate 1").unwrap();
        form.change_stop(index, "studentCount", "many").unwrap();

        assert!(form.errors().contains("stops[0].studentCount"));
        assert!(matches!(form.submit(), Err(SubmitError::Invalid(_))));

        form.remove_stop(index).unwrap();
        assert!(form.errors().is_empty());
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_driver_toggle_and_unknown_field() {
        let mut form = FormState::<DriverDraft>::create();
        assert!(form.draft().is_active);
        form.toggle("isActive").unwrap();
        assert!(!form.draft().is_active);
        assert!(form.change("salary", "100").is_err());
    }
}

//! Columnas de tabla de cada entidad
//!
//! Las claves son los nombres de campo del JSON (camelCase). Los estados de
//! viaje se muestran y filtran en su forma de frontend (`in-progress`).

use chrono::NaiveDate;

use crate::models::{
    Bus, Driver, MaintenanceRecord, Route, StudentRegistration, StudentTransport, Teacher,
    TripLog, Vehicle,
};

use super::Tabular;

fn date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format("%Y-%m-%d").to_string())
}

fn flag(value: bool) -> Option<String> {
    Some(if value { "Yes" } else { "No" }.to_string())
}

impl Tabular for Driver {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "licenseNumber" => Some(self.license_number.clone()),
            "contactNumber" => Some(self.contact_number.clone()),
            "isActive" => flag(self.is_active),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["name", "licenseNumber", "contactNumber"]
    }
}

impl Tabular for Bus {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "registrationNumber" => Some(self.registration_number.clone()),
            "make" => Some(self.make.clone()),
            "model" => Some(self.model.clone()),
            "capacity" => Some(self.capacity.to_string()),
            "fuelType" => Some(self.fuel_type.to_string()),
            "purchaseDate" => date(self.purchase_date),
            "insuranceExpiryDate" => date(self.insurance_expiry_date),
            "status" => Some(self.status.to_string()),
            "driverId" => self.driver_id.clone(),
            "routeId" => self.route_id.clone(),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["registrationNumber", "make", "model"]
    }
}

impl Tabular for Vehicle {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "vehicleName" => Some(self.vehicle_name.clone()),
            "make" => None,
            _ => Bus::from(self.clone()).cell(key),
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["registrationNumber", "vehicleName", "model"]
    }
}

impl Tabular for Route {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()),
            "description" => Some(self.description.clone()),
            "startLocation" => Some(self.start_location.clone()),
            "endLocation" => Some(self.end_location.clone()),
            "distance" => Some(self.distance.to_string()),
            "estimatedTime" => Some(self.estimated_time.to_string()),
            "busId" => self.bus_id.clone(),
            "stops" => Some(self.stops.len().to_string()),
            "totalStudents" => Some(self.total_students().to_string()),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["name", "startLocation", "endLocation"]
    }
}

impl Tabular for TripLog {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "busId" => Some(self.bus_id.clone()),
            "routeId" => Some(self.route_id.clone()),
            "driverId" => Some(self.driver_id.clone()),
            "date" => date(Some(self.date)),
            "startTime" => Some(self.start_time.clone()),
            "endTime" => self.end_time.clone(),
            "status" => Some(self.status.as_frontend().to_string()),
            "startOdometer" => self.start_odometer.map(|n| n.to_string()),
            "endOdometer" => self.end_odometer.map(|n| n.to_string()),
            "distance" => self.distance().map(|n| n.to_string()),
            "delayMinutes" => self.delay_minutes.map(|n| n.to_string()),
            "deviationNotes" => self.deviation_notes.clone(),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["busId", "routeId", "driverId", "deviationNotes"]
    }
}

impl Tabular for MaintenanceRecord {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "busId" => Some(self.bus_id.clone()),
            "date" => date(Some(self.date)),
            "type" => Some(self.maintenance_type.to_string()),
            "description" => Some(self.description.clone()),
            "cost" => Some(self.cost.to_string()),
            "odometerReading" => Some(self.odometer_reading.to_string()),
            "nextDueDate" => date(self.next_due_date),
            "completedBy" => Some(self.completed_by.clone()),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["busId", "description", "completedBy"]
    }
}

impl Tabular for Teacher {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "fullName" => Some(self.full_name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => Some(self.phone.clone()),
            "gender" => Some(self.gender.clone()),
            "designation" => Some(self.designation.clone()),
            "qualification" => Some(self.qualification.clone()),
            "subjects" => Some(self.subjects.join(", ")),
            "isClassIncharge" => flag(self.is_class_incharge),
            "inchargeClass" => self.incharge_class.clone(),
            "inchargeSection" => self.incharge_section.clone(),
            "joiningDate" => date(self.joining_date),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["fullName", "email", "phone", "designation", "subjects"]
    }
}

impl Tabular for StudentRegistration {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "formNo" => Some(self.form_no.clone()),
            "fullName" => Some(self.full_name.clone()),
            "registerForClass" => Some(self.register_for_class.clone()),
            "regnDate" => date(Some(self.regn_date)),
            "gender" => self.gender.clone(),
            "dateOfBirth" => date(self.date_of_birth),
            "mobile" => self.mobile.clone(),
            "email" => self.email.clone(),
            "city" => self.city.clone(),
            "fatherName" => self.father.as_ref().map(|p| p.name.clone()),
            "motherName" => self.mother.as_ref().map(|p| p.name.clone()),
            "transportRequired" => flag(self.transport_required),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["formNo", "fullName", "registerForClass", "fatherName", "mobile"]
    }
}

impl Tabular for StudentTransport {
    fn cell(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.clone()),
            "studentId" => Some(self.student_id.clone()),
            "studentName" => self.student_name.clone(),
            "routeId" => Some(self.route_id.clone()),
            "stopId" => self.stop_id.clone(),
            "pickupTime" => self.pickup_time.clone(),
            "dropTime" => self.drop_time.clone(),
            "feeAmount" => self.fee_amount.map(|fee| fee.to_string()),
            "isActive" => flag(self.is_active),
            _ => None,
        }
    }

    fn search_keys() -> &'static [&'static str] {
        &["studentId", "studentName", "routeId"]
    }
}

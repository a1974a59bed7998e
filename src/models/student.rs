//! Modelo de StudentRegistration
//!
//! `formNo` es la clave de la matrícula: se usa para actualizar y borrar y
//! nunca cambia después de creada.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{date_format, Resource};

/// Datos de padre/madre
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentRegistration {
    #[serde(default)]
    pub form_no: String,

    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Class is required"))]
    pub register_for_class: String,

    #[serde(with = "date_format")]
    pub regn_date: NaiveDate,

    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, with = "date_format::option")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub aadhaar_no: Option<String>,
    #[serde(default)]
    pub previous_school: Option<String>,

    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub father: Option<ParentInfo>,
    #[serde(default)]
    pub mother: Option<ParentInfo>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_mobile: Option<String>,

    #[serde(default)]
    pub transport_required: bool,
}

impl Resource for StudentRegistration {
    const PATH: &'static str = "register/student";
    const NAME: &'static str = "student registration";

    fn id(&self) -> &str {
        &self.form_no
    }

    fn assign_id(&mut self, id: String) {
        self.form_no = id;
    }
}

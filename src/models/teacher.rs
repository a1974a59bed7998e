//! Modelo de Teacher
//!
//! Un profesor puede dar clase en varias secciones de una misma clase y,
//! opcionalmente, ser tutor (class incharge) de exactamente una
//! combinación clase+sección. Esa combinación es única entre todos los
//! profesores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

use super::{date_format, Resource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeacherStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for TeacherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeacherStatus::Active => f.write_str("active"),
            TeacherStatus::Inactive => f.write_str("inactive"),
        }
    }
}

/// Secciones que imparte en una clase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSections {
    pub class: String,
    #[serde(default)]
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_incharge_pair"))]
pub struct Teacher {
    #[serde(default)]
    pub id: String,

    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,

    #[serde(default)]
    pub gender: String,

    #[serde(default)]
    pub designation: String,

    #[serde(default)]
    pub qualification: String,

    #[serde(default)]
    pub subjects: Vec<String>,

    #[serde(default)]
    pub sections: Vec<ClassSections>,

    #[serde(default)]
    pub is_class_incharge: bool,

    #[serde(default)]
    pub incharge_class: Option<String>,

    #[serde(default)]
    pub incharge_section: Option<String>,

    #[serde(default, with = "date_format::option")]
    pub joining_date: Option<NaiveDate>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub bank_name: Option<String>,

    #[serde(default)]
    pub account_number: Option<String>,

    #[serde(default)]
    pub ifsc_code: Option<String>,

    #[serde(default)]
    pub status: TeacherStatus,
}

impl Teacher {
    /// Posición de tutor `(clase, sección)` si el profesor la ocupa
    pub fn incharge_position(&self) -> Option<(&str, &str)> {
        if !self.is_class_incharge {
            return None;
        }
        match (self.incharge_class.as_deref(), self.incharge_section.as_deref()) {
            (Some(class), Some(section)) if !class.is_empty() && !section.is_empty() => {
                Some((class, section))
            }
            _ => None,
        }
    }

    /// Busca otro profesor que ya sea tutor de la misma clase+sección
    pub fn find_incharge_conflict<'a>(&self, existing: &'a [Teacher]) -> Option<&'a Teacher> {
        let (class, section) = self.incharge_position()?;
        existing.iter().find(|other| {
            (self.id.is_empty() || other.id != self.id)
                && other
                    .incharge_position()
                    .map_or(false, |(c, s)| {
                        c.eq_ignore_ascii_case(class) && s.eq_ignore_ascii_case(section)
                    })
        })
    }

    pub fn incharge_conflict_message(&self, incumbent: &Teacher) -> String {
        let (class, section) = self.incharge_position().unwrap_or_default();
        format!(
            "{} is already the class incharge of class {} section {}",
            incumbent.full_name, class, section
        )
    }
}

fn validate_incharge_pair(teacher: &Teacher) -> Result<(), ValidationError> {
    if teacher.is_class_incharge && teacher.incharge_position().is_none() {
        let mut error = ValidationError::new("incharge");
        error.message = Some("Incharge class and section are required together".into());
        return Err(error);
    }
    Ok(())
}

impl Resource for Teacher {
    const PATH: &'static str = "teachers";
    const NAME: &'static str = "teacher";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

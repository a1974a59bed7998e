//! Asistente de matrícula de alumnos (3 pasos)

use crate::models::{ParentInfo, StudentRegistration};
use crate::utils::validation::{validate_email, validate_phone};

use super::{date_input, non_blank, require, Draft, FieldValue, FormError, FormErrors};

const BASIC: &[&str] = &[
    "formNo",
    "fullName",
    "registerForClass",
    "regnDate",
    "gender",
    "dateOfBirth",
    "bloodGroup",
    "religion",
    "category",
    "nationality",
    "aadhaarNo",
    "previousSchool",
];
const PARENTS: &[&str] = &[
    "fatherName",
    "fatherOccupation",
    "fatherQualification",
    "fatherMobile",
    "fatherEmail",
    "motherName",
    "motherOccupation",
    "motherQualification",
    "motherMobile",
    "motherEmail",
    "guardianName",
    "guardianMobile",
];
const CONTACT: &[&str] = &["address", "city", "state", "pincode", "mobile", "email"];
const STEPS: &[&[&str]] = &[BASIC, PARENTS, CONTACT];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentDraft {
    pub name: String,
    pub occupation: String,
    pub qualification: String,
    pub mobile: String,
    pub email: String,
}

impl ParentDraft {
    fn from_info(info: Option<&ParentInfo>) -> Self {
        match info {
            Some(p) => Self {
                name: p.name.clone(),
                occupation: p.occupation.clone().unwrap_or_default(),
                qualification: p.qualification.clone().unwrap_or_default(),
                mobile: p.mobile.clone().unwrap_or_default(),
                email: p.email.clone().unwrap_or_default(),
            },
            None => Self::default(),
        }
    }

    fn set(&mut self, attr: &str, value: String) -> bool {
        match attr {
            "Name" => self.name = value,
            "Occupation" => self.occupation = value,
            "Qualification" => self.qualification = value,
            "Mobile" => self.mobile = value,
            "Email" => self.email = value,
            _ => return false,
        }
        true
    }

    fn check(&self, prefix: &str, errors: &mut FormErrors) {
        if !self.mobile.trim().is_empty() {
            errors.check(&format!("{}Mobile", prefix), validate_phone(&self.mobile));
        }
        if !self.email.trim().is_empty() {
            errors.check(&format!("{}Email", prefix), validate_email(&self.email));
        }
    }

    fn build(&self) -> Option<ParentInfo> {
        if *self == ParentDraft::default() {
            return None;
        }
        Some(ParentInfo {
            name: self.name.trim().to_string(),
            occupation: non_blank(&self.occupation),
            qualification: non_blank(&self.qualification),
            mobile: non_blank(&self.mobile),
            email: non_blank(&self.email),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDraft {
    pub form_no: String,
    /// En edición el número de formulario no se puede cambiar
    pub form_no_locked: bool,
    pub full_name: String,
    pub register_for_class: String,
    pub regn_date: String,
    pub gender: String,
    pub date_of_birth: String,
    pub blood_group: String,
    pub religion: String,
    pub category: String,
    pub nationality: String,
    pub aadhaar_no: String,
    pub previous_school: String,
    pub father: ParentDraft,
    pub mother: ParentDraft,
    pub guardian_name: String,
    pub guardian_mobile: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub mobile: String,
    pub email: String,
    pub transport_required: bool,
}

fn date_text(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

impl From<&StudentRegistration> for StudentDraft {
    fn from(s: &StudentRegistration) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            form_no: s.form_no.clone(),
            form_no_locked: true,
            full_name: s.full_name.clone(),
            register_for_class: s.register_for_class.clone(),
            regn_date: date_text(Some(s.regn_date)),
            gender: text(&s.gender),
            date_of_birth: date_text(s.date_of_birth),
            blood_group: text(&s.blood_group),
            religion: text(&s.religion),
            category: text(&s.category),
            nationality: text(&s.nationality),
            aadhaar_no: text(&s.aadhaar_no),
            previous_school: text(&s.previous_school),
            father: ParentDraft::from_info(s.father.as_ref()),
            mother: ParentDraft::from_info(s.mother.as_ref()),
            guardian_name: text(&s.guardian_name),
            guardian_mobile: text(&s.guardian_mobile),
            address: text(&s.address),
            city: text(&s.city),
            state: text(&s.state),
            pincode: text(&s.pincode),
            mobile: text(&s.mobile),
            email: text(&s.email),
            transport_required: s.transport_required,
        }
    }
}

impl StudentDraft {
    fn check(&self, errors: &mut FormErrors) -> Option<chrono::NaiveDate> {
        require(errors, "fullName", &self.full_name, "Full name");
        require(errors, "registerForClass", &self.register_for_class, "Class");
        let regn_date = date_input(errors, "regnDate", &self.regn_date, "Registration date", true);
        let dob = date_input(errors, "dateOfBirth", &self.date_of_birth, "Date of birth", false);
        if matches!((dob, regn_date), (Some(b), Some(r)) if b > r) {
            errors.insert("dateOfBirth", "Date of birth cannot be after the registration date");
        }
        if !self.aadhaar_no.trim().is_empty()
            && (self.aadhaar_no.trim().len() != 12
                || !self.aadhaar_no.trim().chars().all(|c| c.is_ascii_digit()))
        {
            errors.insert("aadhaarNo", "Aadhaar number must be 12 digits");
        }

        self.father.check("father", errors);
        self.mother.check("mother", errors);
        if !self.guardian_mobile.trim().is_empty() {
            errors.check("guardianMobile", validate_phone(&self.guardian_mobile));
        }

        if !self.pincode.trim().is_empty()
            && (self.pincode.trim().len() != 6
                || !self.pincode.trim().chars().all(|c| c.is_ascii_digit()))
        {
            errors.insert("pincode", "Pincode must be 6 digits");
        }
        if !self.mobile.trim().is_empty() {
            errors.check("mobile", validate_phone(&self.mobile));
        }
        if !self.email.trim().is_empty() {
            errors.check("email", validate_email(&self.email));
        }
        regn_date
    }
}

impl Draft for StudentDraft {
    type Output = StudentRegistration;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        if field == "transportRequired" {
            self.transport_required = value.into_bool(field)?;
            return Ok(());
        }

        let text = value.into_text(field)?;
        let target = match field {
            "formNo" if self.form_no_locked => {
                return Err(FormError::ReadOnly(field.to_string()))
            }
            "formNo" => &mut self.form_no,
            "fullName" => &mut self.full_name,
            "registerForClass" => &mut self.register_for_class,
            "regnDate" => &mut self.regn_date,
            "gender" => &mut self.gender,
            "dateOfBirth" => &mut self.date_of_birth,
            "bloodGroup" => &mut self.blood_group,
            "religion" => &mut self.religion,
            "category" => &mut self.category,
            "nationality" => &mut self.nationality,
            "aadhaarNo" => &mut self.aadhaar_no,
            "previousSchool" => &mut self.previous_school,
            "guardianName" => &mut self.guardian_name,
            "guardianMobile" => &mut self.guardian_mobile,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "pincode" => &mut self.pincode,
            "mobile" => &mut self.mobile,
            "email" => &mut self.email,
            _ => {
                let handled = if let Some(attr) = field.strip_prefix("father") {
                    self.father.set(attr, text)
                } else if let Some(attr) = field.strip_prefix("mother") {
                    self.mother.set(attr, text)
                } else {
                    false
                };
                return if handled {
                    Ok(())
                } else {
                    Err(FormError::UnknownField(field.to_string()))
                };
            }
        };
        *target = text;
        Ok(())
    }

    fn toggle(&mut self, field: &str) -> Result<(), FormError> {
        match field {
            "transportRequired" => {
                self.transport_required = !self.transport_required;
                Ok(())
            }
            _ => Err(FormError::UnknownField(field.to_string())),
        }
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        self.check(&mut errors);
        errors
    }

    fn steps(&self) -> &'static [&'static [&'static str]] {
        STEPS
    }

    fn build(&self) -> Result<StudentRegistration, FormErrors> {
        let mut errors = FormErrors::new();
        let regn_date = match self.check(&mut errors) {
            Some(date) if errors.is_empty() => date,
            _ => return Err(errors),
        };

        Ok(StudentRegistration {
            form_no: self.form_no.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            register_for_class: self.register_for_class.trim().to_string(),
            regn_date,
            gender: non_blank(&self.gender),
            date_of_birth: crate::models::date_format::parse(&self.date_of_birth),
            blood_group: non_blank(&self.blood_group),
            religion: non_blank(&self.religion),
            category: non_blank(&self.category),
            nationality: non_blank(&self.nationality),
            aadhaar_no: non_blank(&self.aadhaar_no),
            previous_school: non_blank(&self.previous_school),
            address: non_blank(&self.address),
            city: non_blank(&self.city),
            state: non_blank(&self.state),
            pincode: non_blank(&self.pincode),
            mobile: non_blank(&self.mobile),
            email: non_blank(&self.email),
            father: self.father.build(),
            mother: self.mother.build(),
            guardian_name: non_blank(&self.guardian_name),
            guardian_mobile: non_blank(&self.guardian_mobile),
            transport_required: self.transport_required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormError, FormState};
    use chrono::NaiveDate;

    #[test]
    fn test_wizard_flow() {
        let mut form = FormState::<StudentDraft>::create();
        assert!(!form.next_step());
        assert_eq!(form.errors().get("fullName"), Some("Full name is required"));
        assert_eq!(form.errors().get("regnDate"), Some("Registration date is required"));

        form.change("fullName", "Riya Menon").unwrap();
        form.change("registerForClass", "3").unwrap();
        form.change("regnDate", "2024-04-01").unwrap();
        assert!(form.next_step());

        form.change("fatherName", "Suresh Menon").unwrap();
        form.change("fatherMobile", "12").unwrap();
        assert!(!form.next_step());
        assert_eq!(form.errors().get("fatherMobile"), Some("Invalid phone number"));
        form.change("fatherMobile", "9876543210").unwrap();
        assert!(form.next_step());

        form.change("email", "riya@").unwrap();
        assert!(form.submit().is_err());
        form.change("email", "").unwrap();
        form.toggle("transportRequired").unwrap();

        let student = form.submit().unwrap();
        assert_eq!(student.regn_date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(student.father.unwrap().mobile.as_deref(), Some("9876543210"));
        assert!(student.mother.is_none());
        assert!(student.email.is_none());
        assert!(student.transport_required);
    }

    #[test]
    fn test_form_no_is_locked_when_editing() {
        let existing = StudentRegistration {
            form_no: "F-101".into(),
            full_name: "Riya Menon".into(),
            register_for_class: "3".into(),
            regn_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            ..Default::default()
        };
        let mut form = FormState::edit("F-101", StudentDraft::from(&existing));
        assert_eq!(
            form.change("formNo", "F-999"),
            Err(FormError::ReadOnly("formNo".into()))
        );
        form.change("city", "Kochi").unwrap();
        assert_eq!(form.draft().form_no, "F-101");
    }

    #[test]
    fn test_pincode_and_aadhaar_formats() {
        let mut draft = StudentDraft::default();
        draft.set_field("pincode", "6820".into()).unwrap();
        draft.set_field("aadhaarNo", "1234 5678".into()).unwrap();
        let errors = draft.validate();
        assert_eq!(errors.get("pincode"), Some("Pincode must be 6 digits"));
        assert_eq!(errors.get("aadhaarNo"), Some("Aadhaar number must be 12 digits"));
    }
}

//! Asistente de alta/edición de profesores (3 pasos)
//!
//! La unicidad del tutor de clase se comprueba contra la plantilla cargada
//! (`roster`); el backend repite la comprobación y responde 409.

use crate::models::{ClassSections, Teacher, TeacherStatus};
use crate::utils::validation::{validate_email, validate_phone};

use super::{date_input, non_blank, require, Draft, FieldValue, FormError, FormErrors};

const PERSONAL: &[&str] = &["fullName", "email", "phone", "gender", "joiningDate", "address"];
const PROFESSIONAL: &[&str] = &["designation", "qualification", "subjects", "sections"];
const INCHARGE_AND_BANKING: &[&str] = &[
    "isClassIncharge",
    "inchargeClass",
    "inchargeSection",
    "bankName",
    "accountNumber",
    "ifscCode",
];
const STEPS: &[&[&str]] = &[PERSONAL, PROFESSIONAL, INCHARGE_AND_BANKING];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherDraft {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub joining_date: String,
    pub address: String,
    pub designation: String,
    pub qualification: String,
    pub subjects: Vec<String>,
    pub sections: Vec<ClassSections>,
    pub is_class_incharge: bool,
    pub incharge_class: String,
    pub incharge_section: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub status: TeacherStatus,
    /// Profesores ya registrados, para detectar tutores duplicados
    pub roster: Vec<Teacher>,
}

impl From<&Teacher> for TeacherDraft {
    fn from(teacher: &Teacher) -> Self {
        Self {
            id: teacher.id.clone(),
            full_name: teacher.full_name.clone(),
            email: teacher.email.clone(),
            phone: teacher.phone.clone(),
            gender: teacher.gender.clone(),
            joining_date: teacher
                .joining_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            address: teacher.address.clone().unwrap_or_default(),
            designation: teacher.designation.clone(),
            qualification: teacher.qualification.clone(),
            subjects: teacher.subjects.clone(),
            sections: teacher.sections.clone(),
            is_class_incharge: teacher.is_class_incharge,
            incharge_class: teacher.incharge_class.clone().unwrap_or_default(),
            incharge_section: teacher.incharge_section.clone().unwrap_or_default(),
            bank_name: teacher.bank_name.clone().unwrap_or_default(),
            account_number: teacher.account_number.clone().unwrap_or_default(),
            ifsc_code: teacher.ifsc_code.clone().unwrap_or_default(),
            status: teacher.status,
            roster: Vec::new(),
        }
    }
}

/// Secciones escritas como `clase:sección` ("5:A, 5:B, 6:A"), agrupadas por clase
fn parse_sections(field: &str, items: Vec<String>) -> Result<Vec<ClassSections>, FormError> {
    let mut sections: Vec<ClassSections> = Vec::new();
    for item in items {
        let (class, section) = item
            .split_once(':')
            .map(|(c, s)| (c.trim(), s.trim()))
            .filter(|(c, s)| !c.is_empty() && !s.is_empty())
            .ok_or_else(|| FormError::InvalidInput {
                field: field.to_string(),
                message: format!("Invalid section '{}', expected class:section", item),
            })?;

        match sections.iter_mut().find(|cs| cs.class == class) {
            Some(entry) => {
                if !entry.sections.iter().any(|s| s == section) {
                    entry.sections.push(section.to_string());
                }
            }
            None => sections.push(ClassSections {
                class: class.to_string(),
                sections: vec![section.to_string()],
            }),
        }
    }
    Ok(sections)
}

impl TeacherDraft {
    pub fn with_roster(mut self, roster: Vec<Teacher>) -> Self {
        self.roster = roster;
        self
    }

    /// Marca o desmarca una sección de una clase
    pub fn toggle_section(&mut self, class: &str, section: &str) {
        match self.sections.iter_mut().find(|cs| cs.class == class) {
            Some(entry) => {
                if let Some(pos) = entry.sections.iter().position(|s| s == section) {
                    entry.sections.remove(pos);
                } else {
                    entry.sections.push(section.to_string());
                }
            }
            None => self.sections.push(ClassSections {
                class: class.to_string(),
                sections: vec![section.to_string()],
            }),
        }
        self.sections.retain(|cs| !cs.sections.is_empty());
    }

    fn assemble(&self) -> Teacher {
        let (incharge_class, incharge_section) = if self.is_class_incharge {
            (non_blank(&self.incharge_class), non_blank(&self.incharge_section))
        } else {
            (None, None)
        };

        Teacher {
            id: self.id.clone(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            gender: self.gender.trim().to_string(),
            designation: self.designation.trim().to_string(),
            qualification: self.qualification.trim().to_string(),
            subjects: self.subjects.clone(),
            sections: self.sections.clone(),
            is_class_incharge: self.is_class_incharge,
            incharge_class,
            incharge_section,
            joining_date: crate::models::date_format::parse(&self.joining_date),
            address: non_blank(&self.address),
            bank_name: non_blank(&self.bank_name),
            account_number: non_blank(&self.account_number),
            ifsc_code: non_blank(&self.ifsc_code).map(|code| code.to_ascii_uppercase()),
            status: self.status,
        }
    }
}

impl Draft for TeacherDraft {
    type Output = Teacher;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        match field {
            "fullName" => self.full_name = value.into_text(field)?,
            "email" => self.email = value.into_text(field)?,
            "phone" => self.phone = value.into_text(field)?,
            "gender" => self.gender = value.into_text(field)?,
            "joiningDate" => self.joining_date = value.into_text(field)?,
            "address" => self.address = value.into_text(field)?,
            "designation" => self.designation = value.into_text(field)?,
            "qualification" => self.qualification = value.into_text(field)?,
            "subjects" => self.subjects = value.into_list(),
            "sections" => self.sections = parse_sections(field, value.into_list())?,
            "isClassIncharge" => self.is_class_incharge = value.into_bool(field)?,
            "inchargeClass" => self.incharge_class = value.into_text(field)?,
            "inchargeSection" => self.incharge_section = value.into_text(field)?,
            "bankName" => self.bank_name = value.into_text(field)?,
            "accountNumber" => self.account_number = value.into_text(field)?,
            "ifscCode" => self.ifsc_code = value.into_text(field)?,
            "status" => {
                self.status = match value.into_text(field)?.trim() {
                    "active" => TeacherStatus::Active,
                    "inactive" => TeacherStatus::Inactive,
                    other => {
                        return Err(FormError::InvalidInput {
                            field: field.to_string(),
                            message: format!("Unknown status '{}'", other),
                        })
                    }
                }
            }
            _ => return Err(FormError::UnknownField(field.to_string())),
        }
        Ok(())
    }

    fn toggle(&mut self, field: &str) -> Result<(), FormError> {
        match field {
            "isClassIncharge" => {
                self.is_class_incharge = !self.is_class_incharge;
                if !self.is_class_incharge {
                    self.incharge_class.clear();
                    self.incharge_section.clear();
                }
                Ok(())
            }
            _ => Err(FormError::UnknownField(field.to_string())),
        }
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::new();

        // Datos personales
        require(&mut errors, "fullName", &self.full_name, "Full name");
        require(&mut errors, "email", &self.email, "Email");
        if !errors.contains("email") {
            errors.check("email", validate_email(&self.email));
        }
        require(&mut errors, "phone", &self.phone, "Phone");
        if !errors.contains("phone") {
            errors.check("phone", validate_phone(&self.phone));
        }
        date_input(&mut errors, "joiningDate", &self.joining_date, "Joining date", false);

        // Datos profesionales
        require(&mut errors, "designation", &self.designation, "Designation");
        if self.subjects.is_empty() {
            errors.insert("subjects", "Select at least one subject");
        }

        // Tutoría
        if self.is_class_incharge {
            let class = self.incharge_class.trim();
            let section = self.incharge_section.trim();
            match (class.is_empty(), section.is_empty()) {
                (true, true) => {
                    errors.insert("inchargeClass", "Incharge class is required");
                    errors.insert("inchargeSection", "Incharge section is required");
                }
                (true, false) => {
                    errors.insert("inchargeClass", "Incharge class and section are required together")
                }
                (false, true) => errors.insert(
                    "inchargeSection",
                    "Incharge class and section are required together",
                ),
                (false, false) => {
                    let candidate = self.assemble();
                    if let Some(incumbent) = candidate.find_incharge_conflict(&self.roster) {
                        errors.insert(
                            "inchargeSection",
                            candidate.incharge_conflict_message(incumbent),
                        );
                    }
                }
            }
        }

        errors
    }

    fn steps(&self) -> &'static [&'static [&'static str]] {
        STEPS
    }

    fn build(&self) -> Result<Teacher, FormErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.assemble())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormState, SubmitError};

    fn incumbent() -> Teacher {
        Teacher {
            id: "t1".into(),
            full_name: "Anita Rao".into(),
            email: "anita@school.test".into(),
            phone: "9876543210".into(),
            is_class_incharge: true,
            incharge_class: Some("5".into()),
            incharge_section: Some("A".into()),
            ..Default::default()
        }
    }

    fn through_first_two_steps(form: &mut FormState<TeacherDraft>) {
        form.change("fullName", "Vikram Shah").unwrap();
        form.change("email", "vikram@school.test").unwrap();
        form.change("phone", "+91 98765 43211").unwrap();
        assert!(form.next_step());

        form.change("designation", "TGT").unwrap();
        form.change("subjects", "Maths, Science").unwrap();
        assert!(form.next_step());
    }

    #[test]
    fn test_sections_field_accepts_class_section_list() {
        let mut form = FormState::<TeacherDraft>::create();
        form.change("sections", "5:A, 5:B, 6:A, 5:A").unwrap();

        assert_eq!(
            form.draft().sections,
            vec![
                ClassSections {
                    class: "5".into(),
                    sections: vec!["A".into(), "B".into()],
                },
                ClassSections {
                    class: "6".into(),
                    sections: vec!["A".into()],
                },
            ]
        );

        form.change("sections", "5A").unwrap();
        assert!(form.errors().contains("sections"));
        assert_eq!(form.draft().sections.len(), 2);

        form.change("sections", Vec::<String>::new()).unwrap();
        assert!(!form.errors().contains("sections"));
        assert!(form.draft().sections.is_empty());
    }

    #[test]
    fn test_next_validates_only_current_step() {
        let mut form = FormState::<TeacherDraft>::create();
        assert_eq!(form.step_count(), 3);

        form.change("fullName", "Vikram Shah").unwrap();
        form.change("email", "not-an-email").unwrap();
        assert!(!form.next_step());
        assert_eq!(form.step(), 0);
        assert_eq!(form.errors().get("email"), Some("Invalid email address"));
        assert!(form.errors().get("designation").is_none());
        assert_eq!(
            form.take_toast().as_deref(),
            Some("Please fix the errors in the form")
        );

        form.change("email", "vikram@school.test").unwrap();
        assert!(form.errors().get("email").is_none());
        form.change("phone", "9876543211").unwrap();
        assert!(form.next_step());
        assert_eq!(form.step(), 1);

        assert!(form.prev_step());
        assert_eq!(form.step(), 0);
    }

    #[test]
    fn test_submit_only_from_last_step() {
        let mut form = FormState::<TeacherDraft>::create();
        assert_eq!(form.submit().unwrap_err(), SubmitError::NotOnLastStep);

        through_first_two_steps(&mut form);
        assert!(form.is_last_step());
        let teacher = form.submit().unwrap();
        assert_eq!(teacher.subjects, vec!["Maths", "Science"]);
        assert!(!teacher.is_class_incharge);
    }

    #[test]
    fn test_incharge_conflict_names_incumbent() {
        let draft = TeacherDraft::default().with_roster(vec![incumbent()]);
        let mut form = FormState::with_draft(crate::forms::FormMode::Create, draft);
        through_first_two_steps(&mut form);

        form.toggle("isClassIncharge").unwrap();
        form.change("inchargeClass", "5").unwrap();
        assert!(form.submit().is_err());
        assert_eq!(
            form.errors().get("inchargeSection"),
            Some("Incharge class and section are required together")
        );

        form.change("inchargeSection", "A").unwrap();
        assert!(form.submit().is_err());
        let message = form.errors().get("inchargeSection").unwrap();
        assert!(message.contains("Anita Rao"));

        form.change("inchargeSection", "B").unwrap();
        let teacher = form.submit().unwrap();
        assert_eq!(teacher.incharge_position(), Some(("5", "B")));
    }

    #[test]
    fn test_editing_incumbent_keeps_position() {
        let existing = incumbent();
        let mut draft = TeacherDraft::from(&existing).with_roster(vec![existing.clone()]);
        draft.designation = "PGT".into();
        draft.subjects = vec!["English".into()];
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn test_toggle_section() {
        let mut draft = TeacherDraft::default();
        draft.toggle_section("5", "A");
        draft.toggle_section("5", "B");
        draft.toggle_section("6", "A");
        assert_eq!(draft.sections[0].sections, vec!["A", "B"]);

        draft.toggle_section("6", "A");
        assert_eq!(draft.sections.len(), 1);
    }
}

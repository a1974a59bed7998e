//! Formularios de edición de entidades
//!
//! Cada entidad tiene un borrador (`Draft`) con los valores tal y como los
//! escribe el usuario y una función pura de validación borrador → errores
//! por campo. `FormState` añade el ciclo de vida del formulario: modo
//! crear/editar, pasos del asistente, limpieza de errores por campo y el
//! bloqueo del envío mientras haya errores.

pub mod student;
pub mod teacher;
pub mod transport;

pub use student::StudentDraft;
pub use teacher::TeacherDraft;
pub use transport::{
    BusDraft, DriverDraft, MaintenanceDraft, RouteDraft, StopDraft, TripDraft, VehicleDraft,
};

use chrono::NaiveDate;
use num_traits::Zero;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::str::FromStr;
use thiserror::Error;
use validator::ValidationError;

use crate::client::{ApiFailure, ApiResult};
use crate::utils::validation::{
    message_of, validate_date, validate_non_negative, validate_positive, validate_required,
};

pub const FIX_ERRORS_TOAST: &str = "Please fix the errors in the form";

/// Errores por campo, indexados por el nombre del campo en el formulario
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un error; si el campo ya tenía uno se conserva el primero
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Registra el error de un validador si lo hubo
    pub fn check<T>(&mut self, field: &str, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.insert(field, message_of(&e));
                None
            }
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Solo los errores de los campos indicados
    pub fn restricted_to(&self, fields: &[&str]) -> FormErrors {
        FormErrors(
            self.0
                .iter()
                .filter(|(k, _)| fields.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Conserva solo los campos para los que `keep` devuelve `true`
    pub fn retain_fields(&mut self, keep: impl Fn(&str) -> bool) {
        self.0.retain(|field, _| keep(field));
    }

    pub fn merge(&mut self, other: FormErrors) {
        for (field, message) in other.0 {
            self.0.insert(field, message);
        }
    }
}

/// Valor que llega de un input
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    List(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{0}' cannot be changed")]
    ReadOnly(String),

    #[error("{message}")]
    InvalidInput { field: String, message: String },
}

impl FieldValue {
    pub fn into_text(self, field: &str) -> Result<String, FormError> {
        match self {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Bool(b) => Ok(b.to_string()),
            FieldValue::List(_) => Err(FormError::InvalidInput {
                field: field.to_string(),
                message: "Expected a single value".to_string(),
            }),
        }
    }

    pub fn into_bool(self, field: &str) -> Result<bool, FormError> {
        match self {
            FieldValue::Bool(b) => Ok(b),
            FieldValue::Text(s) => match s.trim() {
                "true" | "on" | "1" => Ok(true),
                "false" | "off" | "0" | "" => Ok(false),
                _ => Err(FormError::InvalidInput {
                    field: field.to_string(),
                    message: "Expected yes or no".to_string(),
                }),
            },
            FieldValue::List(_) => Err(FormError::InvalidInput {
                field: field.to_string(),
                message: "Expected yes or no".to_string(),
            }),
        }
    }

    /// Lista; un texto se interpreta separado por comas
    pub fn into_list(self) -> Vec<String> {
        match self {
            FieldValue::List(items) => items,
            FieldValue::Text(s) => s
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            FieldValue::Bool(_) => Vec::new(),
        }
    }

    /// Número opcional: vacío es "sin valor", no cero
    pub fn into_number<N: FromStr>(self, field: &str, label: &str) -> Result<Option<N>, FormError> {
        let raw = self.into_text(field)?;
        parse_number(&raw).map_err(|_| FormError::InvalidInput {
            field: field.to_string(),
            message: format!("{} must be a number", label),
        })
    }
}

pub fn parse_number<N: FromStr>(raw: &str) -> Result<Option<N>, N::Err> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some)
}

/// Campo de texto obligatorio
pub(crate) fn require(errors: &mut FormErrors, field: &str, value: &str, label: &str) {
    errors.check(field, validate_required(value, label));
}

/// Fecha escrita en un input; vacía es `None`
pub(crate) fn date_input(
    errors: &mut FormErrors,
    field: &str,
    raw: &str,
    label: &str,
    required: bool,
) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        if required {
            errors.insert(field, format!("{} is required", label));
        }
        return None;
    }
    errors.check(field, validate_date(raw, label))
}

/// Número obligatorio y mayor que cero
pub(crate) fn positive_input<N>(
    errors: &mut FormErrors,
    field: &str,
    value: Option<N>,
    label: &str,
) -> Option<N>
where
    N: PartialOrd + Zero + Serialize + Copy,
{
    match value {
        None => {
            errors.insert(field, format!("{} is required", label));
            None
        }
        Some(n) => errors.check(field, validate_positive(n, label)).map(|_| n),
    }
}

/// Número opcional que no puede ser negativo
pub(crate) fn non_negative_input<N>(
    errors: &mut FormErrors,
    field: &str,
    value: Option<N>,
    label: &str,
) -> Option<N>
where
    N: PartialOrd + Zero + Serialize + Copy,
{
    let n = value?;
    errors.check(field, validate_non_negative(n, label)).map(|_| n)
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Borrador editable de una entidad
pub trait Draft: Clone {
    type Output;

    /// Manejador genérico de cambios
    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), FormError>;

    /// Checkboxes, independientes del manejador genérico
    fn toggle(&mut self, field: &str) -> Result<(), FormError> {
        Err(FormError::UnknownField(field.to_string()))
    }

    fn validate(&self) -> FormErrors;

    /// Campos de cada paso del asistente; vacío = formulario de un solo paso
    fn steps(&self) -> &'static [&'static [&'static str]] {
        &[]
    }

    /// Construye la entidad; solo se llama con el borrador ya validado
    fn build(&self) -> Result<Self::Output, FormErrors>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("The form can only be submitted from the last step")]
    NotOnLastStep,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Please fix the errors in the form")]
    Invalid(FormErrors),

    #[error("{0}")]
    Api(ApiFailure),
}

#[derive(Debug, Clone)]
pub struct FormState<D: Draft> {
    mode: FormMode,
    draft: D,
    errors: FormErrors,
    /// Entradas que no se pudieron interpretar; el borrador conserva el valor anterior
    input_errors: FormErrors,
    step: usize,
    submitting: bool,
    toast: Option<String>,
}

impl<D: Draft + Default> FormState<D> {
    pub fn create() -> Self {
        Self::with_draft(FormMode::Create, D::default())
    }
}

impl<D: Draft> FormState<D> {
    pub fn with_draft(mode: FormMode, draft: D) -> Self {
        Self {
            mode,
            draft,
            errors: FormErrors::new(),
            input_errors: FormErrors::new(),
            step: 0,
            submitting: false,
            toast: None,
        }
    }

    pub fn edit(id: impl Into<String>, draft: D) -> Self {
        Self::with_draft(FormMode::Edit(id.into()), draft)
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.draft.steps().len().max(1)
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 >= self.step_count()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Último aviso a mostrar, si lo hay (se consume)
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }

    /// Cambia un campo y borra su error al momento
    pub fn change(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        let result = self.draft.set_field(field, value.into());
        self.record_input(field, result)
    }

    /// Deja constancia del resultado de escribir en un campo
    pub(crate) fn record_input(
        &mut self,
        field: &str,
        result: Result<(), FormError>,
    ) -> Result<(), FormError> {
        match result {
            Ok(()) => {
                self.errors.remove(field);
                self.input_errors.remove(field);
                Ok(())
            }
            Err(FormError::InvalidInput { field, message }) => {
                self.errors.remove(&field);
                self.errors.insert(&field, message.clone());
                self.input_errors.remove(&field);
                self.input_errors.insert(&field, message);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn toggle(&mut self, field: &str) -> Result<(), FormError> {
        self.draft.toggle(field)?;
        self.errors.remove(field);
        self.input_errors.remove(field);
        Ok(())
    }

    /// Errores de entrada pendientes más los del validador
    fn collect_errors(&self) -> FormErrors {
        let mut errors = self.input_errors.clone();
        for (field, message) in self.draft.validate().iter() {
            errors.insert(field, message);
        }
        errors
    }

    /// Valida solo los campos del paso actual y avanza si no hay errores
    pub fn next_step(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }

        let fields = self.draft.steps()[self.step];
        let step_errors = self.collect_errors().restricted_to(fields);
        if !step_errors.is_empty() {
            self.errors.merge(step_errors);
            self.toast = Some(FIX_ERRORS_TOAST.to_string());
            return false;
        }

        self.step += 1;
        true
    }

    pub fn prev_step(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step -= 1;
        true
    }

    /// Valida todo el formulario y construye la entidad
    ///
    /// Deja el formulario en estado "enviando"; hay que cerrar con
    /// `finish_submit`.
    pub fn submit(&mut self) -> Result<D::Output, SubmitError> {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        if !self.is_last_step() {
            return Err(SubmitError::NotOnLastStep);
        }

        let errors = self.collect_errors();
        if !errors.is_empty() {
            return Err(self.block(errors));
        }

        match self.draft.build() {
            Ok(output) => {
                self.submitting = true;
                Ok(output)
            }
            Err(errors) => Err(self.block(errors)),
        }
    }

    fn block(&mut self, errors: FormErrors) -> SubmitError {
        self.errors = errors.clone();
        self.toast = Some(FIX_ERRORS_TOAST.to_string());
        SubmitError::Invalid(errors)
    }

    pub fn finish_submit(&mut self, result: Result<(), &ApiFailure>) {
        self.submitting = false;
        self.toast = Some(match result {
            Ok(()) => match self.mode {
                FormMode::Create => "Saved successfully".to_string(),
                FormMode::Edit(_) => "Updated successfully".to_string(),
            },
            Err(e) => e.message.clone(),
        });
    }

    /// Valida, envía con `action` y cierra el envío
    pub async fn submit_with<F, Fut, R>(&mut self, action: F) -> Result<R, SubmitError>
    where
        F: FnOnce(D::Output) -> Fut,
        Fut: Future<Output = ApiResult<R>>,
    {
        let output = self.submit()?;
        match action(output).await {
            Ok(result) => {
                self.finish_submit(Ok(()));
                Ok(result)
            }
            Err(e) => {
                self.finish_submit(Err(&e));
                Err(SubmitError::Api(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_treats_blank_as_absent() {
        assert_eq!(parse_number::<i64>("").unwrap(), None);
        assert_eq!(parse_number::<i64>("   ").unwrap(), None);
        assert_eq!(parse_number::<i64>("0").unwrap(), Some(0));
        assert_eq!(parse_number::<f64>("-2.5").unwrap(), Some(-2.5));
        assert!(parse_number::<i64>("ten").is_err());
    }

    #[test]
    fn test_form_errors_keep_first_message() {
        let mut errors = FormErrors::new();
        errors.insert("capacity", "Capacity is required");
        errors.insert("capacity", "Capacity must be greater than 0");
        assert_eq!(errors.get("capacity"), Some("Capacity is required"));

        let only = errors.restricted_to(&["name"]);
        assert!(only.is_empty());
    }

    #[test]
    fn test_into_list_splits_text() {
        let value = FieldValue::from("Maths, Physics ,,Chemistry");
        assert_eq!(value.into_list(), vec!["Maths", "Physics", "Chemistry"]);
    }
}

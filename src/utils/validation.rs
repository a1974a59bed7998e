//! Utilidades de validación
//!
//! Validadores de campo reutilizados por los formularios. Todos devuelven un
//! `ValidationError` con `message` ya redactado para mostrarse junto al campo.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use num_traits::Zero;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use validator::ValidationError;

use crate::models::date_format;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex");
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9\s\-()]{7,20}$").expect("phone regex");
}

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Mensaje de un error producido por estos helpers
pub fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Invalid value ({})", error.code))
}

/// Validar que un string no esté vacío
pub fn validate_required(value: &str, label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", format!("{} is required", label)));
    }
    Ok(())
}

/// Validar y convertir string a fecha (`YYYY-MM-DD`)
pub fn validate_date(value: &str, label: &str) -> Result<NaiveDate, ValidationError> {
    date_format::parse(value)
        .ok_or_else(|| error("date", format!("{} must be a valid date (YYYY-MM-DD)", label)))
}

/// Validar hora `HH:MM` (o `HH:MM:SS`)
pub fn validate_time(value: &str, label: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| error("time", format!("{} must be a valid time (HH:MM)", label)))
}

/// Validar formato de email
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(error("email", "Invalid email address"));
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_RE.is_match(value.trim()) || !(7..=15).contains(&digits) {
        return Err(error("phone", "Invalid phone number"));
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + Zero + Serialize>(
    value: T,
    label: &str,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        return Err(error("positive", format!("{} must be greater than 0", label)));
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + Zero + Serialize>(
    value: T,
    label: &str,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        return Err(error("non_negative", format!("{} cannot be negative", label)));
    }
    Ok(())
}

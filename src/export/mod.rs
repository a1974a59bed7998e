//! Exportación de tablas (CSV, documento paginado) e impresión
//!
//! Las filas se serializan a JSON y cada columna lee su valor con una ruta
//! de puntos (`father.name`). Una columna puede llevar un formateador
//! propio y decidir si aparece en el CSV, en el documento o en ambos.

pub mod csv;
pub mod pdf;
pub mod print;

pub use csv::{save_csv, to_csv};
pub use pdf::{DocPage, DocumentRenderer, PdfLayout, TextRenderer};
pub use print::print_registration_form;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Columna exportable
#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub formatter: Option<Formatter>,
    pub in_csv: bool,
    pub in_pdf: bool,
    /// Ancho en el documento (px)
    pub width: Option<f32>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("formatter", &self.formatter.is_some())
            .field("in_csv", &self.in_csv)
            .field("in_pdf", &self.in_pdf)
            .field("width", &self.width)
            .finish()
    }
}

impl Column {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            formatter: None,
            in_csv: true,
            in_pdf: true,
            width: None,
        }
    }

    pub fn format_with<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn csv_only(mut self) -> Self {
        self.in_pdf = false;
        self
    }

    pub fn pdf_only(mut self) -> Self {
        self.in_csv = false;
        self
    }

    /// Texto de la celda para una fila ya serializada
    pub fn render(&self, row: &Value) -> String {
        let value = resolve_path(row, &self.key).unwrap_or(&Value::Null);
        match &self.formatter {
            Some(formatter) => formatter(value),
            None => display_value(value),
        }
    }
}

/// Valor en una ruta de puntos; los índices numéricos entran en arrays
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Representación por defecto de un valor JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => (if *b { "Yes" } else { "No" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Formateador de fechas `DD/MM/YYYY` (acepta fecha o timestamp ISO)
pub fn date_formatter() -> impl Fn(&Value) -> String + Send + Sync + 'static {
    |value: &Value| match value.as_str().and_then(crate::models::date_format::parse) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => display_value(value),
    }
}

/// Formateador de importes con dos decimales
pub fn currency_formatter() -> impl Fn(&Value) -> String + Send + Sync + 'static {
    |value: &Value| {
        let amount = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        };
        amount.map(|a| format!("{:.2}", a)).unwrap_or_default()
    }
}

/// Serializa las filas una vez para todas las columnas
pub(crate) fn serialize_rows<T: Serialize>(rows: &[T]) -> Result<Vec<Value>, ExportError> {
    rows.iter()
        .map(|row| serde_json::to_value(row).map_err(ExportError::from))
        .collect()
}

/// Nombre de fichero `base_YYYY-MM-DD.ext`
pub fn export_filename(base: &str, extension: &str, date: NaiveDate) -> String {
    format!("{}_{}.{}", base, date.format("%Y-%m-%d"), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_path() {
        let row = json!({
            "fullName": "Riya",
            "father": { "name": "Suresh" },
            "stops": [{ "name": "Gate" }]
        });
        assert_eq!(resolve_path(&row, "father.name"), Some(&json!("Suresh")));
        assert_eq!(resolve_path(&row, "stops.0.name"), Some(&json!("Gate")));
        assert_eq!(resolve_path(&row, "mother.name"), None);
        assert_eq!(resolve_path(&row, "fullName.length"), None);
    }

    #[test]
    fn test_column_render() {
        let row = json!({ "regnDate": "2024-04-01T00:00:00.000Z", "fee": 1200, "subjects": ["Maths", "Art"] });

        let date = Column::new("regnDate", "Date").format_with(date_formatter());
        assert_eq!(date.render(&row), "01/04/2024");

        let fee = Column::new("fee", "Fee").format_with(currency_formatter());
        assert_eq!(fee.render(&row), "1200.00");

        assert_eq!(Column::new("subjects", "Subjects").render(&row), "Maths, Art");
        assert_eq!(Column::new("missing", "Missing").render(&row), "");
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(export_filename("drivers", "csv", date), "drivers_2024-03-05.csv");
    }
}

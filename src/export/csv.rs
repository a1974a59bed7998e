//! Exportación CSV
//!
//! Formato compatible con Excel: BOM UTF-8 al principio, todos los campos
//! entre comillas y las comillas internas duplicadas.

use serde::Serialize;
use std::path::Path;

use super::{serialize_rows, Column, ExportError};

const BOM: &str = "\u{FEFF}";

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| quote(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// CSV de las columnas marcadas `in_csv`
pub fn to_csv<T: Serialize>(rows: &[T], columns: &[Column]) -> Result<String, ExportError> {
    let columns: Vec<&Column> = columns.iter().filter(|c| c.in_csv).collect();
    let values = serialize_rows(rows)?;

    let mut lines = Vec::with_capacity(values.len() + 1);
    lines.push(line(columns.iter().map(|c| c.label.as_str())));
    for value in &values {
        lines.push(line(columns.iter().map(|c| c.render(value))));
    }

    Ok(format!("{}{}", BOM, lines.join("\n")))
}

pub async fn save_csv<T: Serialize>(
    path: impl AsRef<Path>,
    rows: &[T],
    columns: &[Column],
) -> Result<usize, ExportError> {
    let content = to_csv(rows, columns)?;
    tokio::fs::write(path.as_ref(), content.as_bytes()).await?;
    tracing::info!("📄 CSV exportado: {} filas en {}", rows.len(), path.as_ref().display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Driver, ParentInfo, StudentRegistration};

    fn driver_columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("licenseNumber", "License"),
            Column::new("isActive", "Active"),
            Column::new("id", "Id").pdf_only(),
        ]
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let drivers = vec![Driver {
            id: "d1".into(),
            name: "Ravi \"RK\" Kumar".into(),
            license_number: "DL-1, KA".into(),
            contact_number: "9876543210".into(),
            is_active: true,
        }];

        let csv = to_csv(&drivers, &driver_columns()).unwrap();
        assert!(csv.starts_with('\u{FEFF}'));

        let body = csv.trim_start_matches('\u{FEFF}');
        let lines: Vec<&str> = body.split('\n').collect();
        assert_eq!(lines[0], "\"Name\",\"License\",\"Active\"");
        assert_eq!(lines[1], "\"Ravi \"\"RK\"\" Kumar\",\"DL-1, KA\",\"Yes\"");
    }

    #[test]
    fn test_nested_paths_and_missing_values() {
        let students = vec![StudentRegistration {
            form_no: "F-1".into(),
            full_name: "Riya".into(),
            father: Some(ParentInfo {
                name: "Suresh".into(),
                ..Default::default()
            }),
            ..Default::default()
        }];
        let columns = vec![
            Column::new("formNo", "Form No"),
            Column::new("father.name", "Father"),
            Column::new("mother.name", "Mother"),
        ];

        let csv = to_csv(&students, &columns).unwrap();
        assert!(csv.ends_with("\"F-1\",\"Suresh\",\"\""));
    }

    /// Lee de vuelta un CSV entrecomillado: registros y campos
    fn read_records(csv: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut record = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut chars = csv.trim_start_matches('\u{FEFF}').chars().peekable();

        while let Some(c) = chars.next() {
            match (c, quoted) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                ('"', _) => quoted = !quoted,
                (',', false) => record.push(std::mem::take(&mut field)),
                ('\n', false) => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                (c, _) => field.push(c),
            }
        }
        record.push(field);
        records.push(record);
        records
    }

    #[test]
    fn test_csv_reads_back_with_embedded_newlines() {
        let drivers = vec![
            Driver {
                id: "d1".into(),
                name: "Ravi\nKumar".into(),
                license_number: "DL-1, KA".into(),
                is_active: true,
                ..Default::default()
            },
            Driver {
                id: "d2".into(),
                name: "Meena \"M\" Iyer".into(),
                license_number: "DL-2".into(),
                is_active: false,
                ..Default::default()
            },
        ];

        let csv = to_csv(&drivers, &driver_columns()).unwrap();
        assert!(csv.contains("\"Ravi\nKumar\""));

        let records = read_records(&csv);
        assert_eq!(records.len(), drivers.len() + 1);
        assert!(records.iter().all(|r| r.len() == 3));
        assert_eq!(records[1], vec!["Ravi\nKumar", "DL-1, KA", "Yes"]);
        assert_eq!(records[2], vec!["Meena \"M\" Iyer", "DL-2", "No"]);
    }

    #[tokio::test]
    async fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drivers.csv");
        let written = save_csv(&path, &Vec::<Driver>::new(), &driver_columns())
            .await
            .unwrap();
        assert_eq!(written, 0);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\u{FEFF}\"Name\",\"License\",\"Active\"");
    }
}

//! Maquetación de documentos paginados
//!
//! `PdfLayout` reparte las filas en páginas con la cabecera repetida y un
//! pie "Page i of n", y recorta con "…" las celdas que no caben en el ancho
//! de su columna. La conversión a bytes la hace un `DocumentRenderer`.

use serde::Serialize;

use super::{serialize_rows, Column, ExportError};

pub const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub title: String,
    /// Filas de datos por página (sin contar la cabecera)
    pub rows_per_page: usize,
    /// Ancho medio de un carácter (px)
    pub char_width: f32,
    /// Ancho de las columnas que no indican el suyo (px)
    pub default_column_width: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            title: String::new(),
            rows_per_page: 25,
            char_width: 6.0,
            default_column_width: 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocPage {
    pub number: usize,
    pub total: usize,
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub footer: String,
}

impl PdfLayout {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn capacity(&self, column: &Column) -> usize {
        let width = column.width.unwrap_or(self.default_column_width);
        if self.char_width <= 0.0 {
            return usize::MAX;
        }
        ((width / self.char_width).floor() as usize).max(1)
    }

    /// Páginas del documento; sin filas sale una única página con la cabecera
    pub fn paginate<T: Serialize>(
        &self,
        rows: &[T],
        columns: &[Column],
    ) -> Result<Vec<DocPage>, ExportError> {
        let columns: Vec<&Column> = columns.iter().filter(|c| c.in_pdf).collect();
        let capacities: Vec<usize> = columns.iter().map(|c| self.capacity(c)).collect();
        let values = serialize_rows(rows)?;

        let header: Vec<String> = columns
            .iter()
            .zip(&capacities)
            .map(|(c, cap)| truncate(&c.label, *cap))
            .collect();

        let body: Vec<Vec<String>> = values
            .iter()
            .map(|value| {
                columns
                    .iter()
                    .zip(&capacities)
                    .map(|(c, cap)| truncate(&c.render(value), *cap))
                    .collect()
            })
            .collect();

        let per_page = self.rows_per_page.max(1);
        let chunks: Vec<Vec<Vec<String>>> = if body.is_empty() {
            vec![Vec::new()]
        } else {
            body.chunks(per_page).map(|chunk| chunk.to_vec()).collect()
        };

        let total = chunks.len();
        Ok(chunks
            .into_iter()
            .enumerate()
            .map(|(i, rows)| DocPage {
                number: i + 1,
                total,
                title: self.title.clone(),
                header: header.clone(),
                rows,
                footer: format!("Page {} of {}", i + 1, total),
            })
            .collect())
    }
}

/// Recorta a `max` caracteres, con "…" como último carácter si se recortó
pub fn truncate(text: &str, max: usize) -> String {
    // Los saltos de línea no caben en una celda
    let text: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max {
        return text;
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    cut
}

/// Convierte páginas maquetadas en un documento
pub trait DocumentRenderer {
    fn content_type(&self) -> &'static str;

    fn extension(&self) -> &'static str;

    fn render(&self, pages: &[DocPage]) -> Result<Vec<u8>, ExportError>;
}

/// Documento de texto plano con columnas alineadas
#[derive(Debug, Clone, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn widths(page: &DocPage) -> Vec<usize> {
        let mut widths: Vec<usize> = page.header.iter().map(|h| h.chars().count()).collect();
        for row in &page.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        widths
    }

    fn line(cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }
}

impl DocumentRenderer for TextRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, pages: &[DocPage]) -> Result<Vec<u8>, ExportError> {
        let mut out = String::new();
        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                out.push('\u{000C}');
            }
            let widths = Self::widths(page);
            if !page.title.is_empty() {
                out.push_str(&page.title);
                out.push('\n');
            }
            let header = Self::line(&page.header, &widths);
            out.push_str(&header);
            out.push('\n');
            out.push_str(&"-".repeat(header.chars().count()));
            out.push('\n');
            for row in &page.rows {
                out.push_str(&Self::line(row, &widths));
                out.push('\n');
            }
            out.push_str(&page.footer);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Driver;

    fn drivers(n: usize) -> Vec<Driver> {
        (1..=n)
            .map(|i| Driver {
                id: format!("d{}", i),
                name: format!("Driver {}", i),
                license_number: "DL-0420110012345".into(),
                ..Default::default()
            })
            .collect()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::new("licenseNumber", "License").width(60.0),
            Column::new("contactNumber", "Contact").csv_only(),
        ]
    }

    #[test]
    fn test_header_repeats_and_footer_counts_pages() {
        let layout = PdfLayout {
            rows_per_page: 2,
            ..PdfLayout::titled("Drivers")
        };
        let pages = layout.paginate(&drivers(5), &columns()).unwrap();

        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert_eq!(page.header, vec!["Name", "License"]);
        }
        assert_eq!(pages[2].rows.len(), 1);
        assert_eq!(pages[0].footer, "Page 1 of 3");
        assert_eq!(pages[2].footer, "Page 3 of 3");
    }

    #[test]
    fn test_cells_are_truncated_to_column_width() {
        let pages = PdfLayout::default().paginate(&drivers(1), &columns()).unwrap();
        let license = &pages[0].rows[0][1];
        assert_eq!(license.chars().count(), 10);
        assert!(license.ends_with(ELLIPSIS));
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line\nbreak", 20), "line break");
    }

    #[test]
    fn test_empty_export_has_one_page() {
        let pages = PdfLayout::default()
            .paginate(&Vec::<Driver>::new(), &columns())
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].rows.is_empty());
        assert_eq!(pages[0].footer, "Page 1 of 1");
    }

    #[test]
    fn test_text_renderer() {
        let pages = PdfLayout::titled("Drivers")
            .paginate(&drivers(2), &columns())
            .unwrap();
        let text = String::from_utf8(TextRenderer.render(&pages).unwrap()).unwrap();
        assert!(text.starts_with("Drivers\nName"));
        assert!(text.contains("Driver 2"));
        assert!(text.trim_end().ends_with("Page 1 of 1"));
    }
}

//! Pipeline de tablas: búsqueda, filtros, orden y paginación en cliente
//!
//! `TableView::apply` es una función pura sobre la lista cacheada:
//! `paginar(ordenar(filtrar(filas)))`. Cambiar búsqueda, filtros o tamaño
//! de página vuelve a la página 1.

pub mod debounce;
pub mod rows;

pub use debounce::SearchDebouncer;

use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const DEFAULT_PER_PAGE: usize = 10;

/// Fila que se puede mostrar en una tabla
pub trait Tabular {
    /// Valor textual de una columna; `None` si la fila no la tiene
    fn cell(&self, key: &str) -> Option<String>;

    /// Columnas sobre las que actúa la búsqueda libre
    fn search_keys() -> &'static [&'static str];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub key: String,
    pub direction: SortDirection,
}

/// Página ya calculada
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a, T> {
    pub rows: Vec<&'a T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<'a, T> PageView<'a, T> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rango 1-based mostrado, p. ej. "11-20 of 45"
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "0 of 0".to_string();
        }
        let start = (self.page - 1) * self.per_page + 1;
        let end = start + self.rows.len() - 1;
        format!("{}-{} of {}", start, end, self.total)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    search: String,
    filters: BTreeMap<String, String>,
    sort: Option<SortKey>,
    page: usize,
    per_page: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl TableView {
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            ..Default::default()
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Filtro exacto; un valor vacío (o "all") lo quita
    pub fn set_filter(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() || value.eq_ignore_ascii_case("all") {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value);
        }
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.search.clear();
        self.page = 1;
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Primer clic ascendente, segundo descendente; otra columna vuelve a ascendente
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = Some(match &self.sort {
            Some(current) if current.key == key => SortKey {
                key: key.to_string(),
                direction: match current.direction {
                    SortDirection::Asc => SortDirection::Desc,
                    SortDirection::Desc => SortDirection::Asc,
                },
            },
            _ => SortKey {
                key: key.to_string(),
                direction: SortDirection::Asc,
            },
        });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    fn matches<T: Tabular>(&self, row: &T) -> bool {
        let term = self.search.trim().to_lowercase();
        if !term.is_empty() {
            let hit = T::search_keys().iter().any(|key| {
                row.cell(key)
                    .map_or(false, |value| value.to_lowercase().contains(&term))
            });
            if !hit {
                return false;
            }
        }

        self.filters.iter().all(|(key, expected)| {
            row.cell(key)
                .map_or(false, |value| value.eq_ignore_ascii_case(expected))
        })
    }

    /// Filas filtradas y ordenadas, sin paginar (lo que se exporta)
    pub fn visible<'a, T: Tabular>(&self, rows: &'a [T]) -> Vec<&'a T> {
        let mut visible: Vec<&T> = rows.iter().filter(|row| self.matches(*row)).collect();

        if let Some(sort) = &self.sort {
            visible.sort_by(|a, b| {
                let ordering = compare_cells(a.cell(&sort.key), b.cell(&sort.key));
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        visible
    }

    pub fn apply<'a, T: Tabular>(&self, rows: &'a [T]) -> PageView<'a, T> {
        let visible = self.visible(rows);
        let total = visible.len();
        let total_pages = ((total + self.per_page - 1) / self.per_page).max(1);
        let page = self.page.min(total_pages);

        let rows = visible
            .into_iter()
            .skip((page - 1) * self.per_page)
            .take(self.per_page)
            .collect();

        PageView {
            rows,
            page,
            per_page: self.per_page,
            total,
            total_pages,
        }
    }
}

/// Números como números, el resto como texto sin mayúsculas; vacíos al final
fn compare_cells(a: Option<String>, b: Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.to_lowercase().cmp(&b.to_lowercase()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: &'static str,
        class: &'static str,
        capacity: u32,
    }

    impl Tabular for Row {
        fn cell(&self, key: &str) -> Option<String> {
            match key {
                "name" => Some(self.name.to_string()),
                "class" => Some(self.class.to_string()),
                "capacity" => Some(self.capacity.to_string()),
                _ => None,
            }
        }

        fn search_keys() -> &'static [&'static str] {
            &["name"]
        }
    }

    fn rows() -> Vec<Row> {
        (1..=25)
            .map(|i| Row {
                name: if i % 2 == 0 { "Even" } else { "Odd" },
                class: if i <= 10 { "5" } else { "6" },
                capacity: i,
            })
            .collect()
    }

    #[test]
    fn test_pagination_is_clamped() {
        let rows = rows();
        let mut view = TableView::new(10);
        view.set_page(9);

        let page = view.apply(&rows);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.range_label(), "21-25 of 25");
    }

    #[test]
    fn test_search_and_filter_reset_page() {
        let rows = rows();
        let mut view = TableView::new(5);
        view.set_page(3);

        view.set_search("odd");
        assert_eq!(view.page(), 1);
        assert_eq!(view.apply(&rows).total, 13);

        view.set_filter("class", "5");
        assert_eq!(view.apply(&rows).total, 5);

        view.set_filter("class", "all");
        assert_eq!(view.filter("class"), None);
    }

    #[test]
    fn test_toggle_sort_numeric() {
        let rows = rows();
        let mut view = TableView::new(3);

        view.toggle_sort("capacity");
        let caps: Vec<u32> = view.apply(&rows).rows.iter().map(|r| r.capacity).collect();
        assert_eq!(caps, vec![1, 2, 3]);

        view.toggle_sort("capacity");
        let caps: Vec<u32> = view.apply(&rows).rows.iter().map(|r| r.capacity).collect();
        assert_eq!(caps, vec![25, 24, 23]);

        view.toggle_sort("name");
        assert_eq!(view.sort().unwrap().direction, SortDirection::Asc);
    }

    #[test]
    fn test_empty_table() {
        let rows: Vec<Row> = Vec::new();
        let page = TableView::default().apply(&rows);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.range_label(), "0 of 0");
    }
}

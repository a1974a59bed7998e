//! Estado de una colección cacheada
//!
//! Cada entidad tiene su propio `ResourceSlice`, con su propio estado de
//! carga y error: una carga de autobuses no pisa el error de las rutas.
//! Las respuestas de carga llevan un ticket; si llega una respuesta con un
//! ticket que ya no es el último emitido, se descarta.

use crate::client::ApiResult;
use crate::models::Resource;

/// Estado observable de una colección
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SliceStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Ticket de una carga en curso
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
pub struct ResourceSlice<T> {
    items: Vec<T>,
    selected: Option<T>,
    error: Option<String>,
    loaded: bool,
    in_flight: usize,
    latest_fetch: u64,
}

impl<T> Default for ResourceSlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            error: None,
            loaded: false,
            in_flight: 0,
            latest_fetch: 0,
        }
    }
}

impl<T: Resource> ResourceSlice<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn status(&self) -> SliceStatus {
        if self.in_flight > 0 {
            SliceStatus::Loading
        } else if let Some(error) = &self.error {
            SliceStatus::Failed(error.clone())
        } else if self.loaded {
            SliceStatus::Ready
        } else {
            SliceStatus::Idle
        }
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Marca el inicio de una carga completa y devuelve su ticket
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch += 1;
        self.in_flight += 1;
        self.error = None;
        FetchTicket(self.latest_fetch)
    }

    /// Aplica el resultado de una carga
    ///
    /// Devuelve `false` si la respuesta era obsoleta y se ignoró. En caso de
    /// error la lista anterior se conserva.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: &ApiResult<Vec<T>>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if ticket.0 != self.latest_fetch {
            tracing::debug!("⏭️ Respuesta obsoleta de {} descartada", T::NAME);
            return false;
        }

        match result {
            Ok(items) => {
                self.items = items.clone();
                self.loaded = true;
                self.error = None;
                let selected_id = self.selected.as_ref().map(|s| s.id().to_string());
                if let Some(id) = selected_id {
                    self.selected = self.items.iter().find(|i| i.id() == id).cloned();
                }
            }
            Err(e) => self.error = Some(e.message.clone()),
        }
        true
    }

    pub fn begin_mutation(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    pub fn fail_mutation(&mut self, message: &str) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.error = Some(message.to_string());
    }

    /// Cierra una mutación confirmada
    ///
    /// Las cargas emitidas antes traen una lista sin este cambio: sus tickets
    /// dejan de ser el último y su respuesta se descartará.
    fn commit_mutation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.latest_fetch += 1;
    }

    /// Añade el objeto devuelto por el servidor
    pub fn apply_created(&mut self, item: T) {
        self.commit_mutation();
        self.items.push(item);
    }

    /// Sustituye el elemento con el mismo id y refresca `selected`
    ///
    /// Si el id no está en caché la lista no cambia.
    pub fn apply_updated(&mut self, id: &str, item: T) {
        self.commit_mutation();

        match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => *existing = item.clone(),
            None => tracing::debug!("⏭️ {} '{}' no está en caché, no se añade", T::NAME, id),
        }
        if self.selected.as_ref().map_or(false, |s| s.id() == id) {
            self.selected = Some(item);
        }
    }

    /// Quita el elemento y limpia `selected` si coincidía
    pub fn apply_deleted(&mut self, id: &str) {
        self.commit_mutation();

        self.items.retain(|item| item.id() != id);
        if self.selected.as_ref().map_or(false, |s| s.id() == id) {
            self.selected = None;
        }
    }

    pub fn select(&mut self, item: Option<T>) {
        self.selected = item;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

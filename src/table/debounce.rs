//! Búsqueda con retardo
//!
//! Cada búsqueda recibe un número de secuencia. Solo se aplica el resultado
//! de la última emitida: si llega otra durante la espera o mientras la
//! consulta está en vuelo, la anterior se descarta aunque resuelva después.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Espera el retardo y ejecuta `query` si nadie la ha sustituido
    ///
    /// `None` significa que el resultado quedó obsoleto y no debe aplicarse.
    pub async fn run<F, Fut, R>(&self, query: F) -> Option<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;
        if !self.is_current(ticket) {
            tracing::debug!("⏭️ Búsqueda {} sustituida antes de enviarse", ticket);
            return None;
        }

        let result = query().await;
        if !self.is_current(ticket) {
            tracing::debug!("⏭️ Resultado de la búsqueda {} descartado", ticket);
            return None;
        }
        Some(result)
    }

    /// Invalida cualquier búsqueda pendiente
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_search_applies() {
        let debouncer = SearchDebouncer::default();

        let first = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.run(|| async { "ri" }).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.run(|| async { "riya" }).await })
        };

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some("riya"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_response_is_discarded() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(10));

        let slow = {
            let d = debouncer.clone();
            tokio::spawn(async move {
                d.run(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    "stale"
                })
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast = debouncer.run(|| async { "fresh" }).await;

        assert_eq!(fast, Some("fresh"));
        assert_eq!(slow.await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = SearchDebouncer::default();
        let pending = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.run(|| async { 1 }).await })
        };
        tokio::task::yield_now().await;
        debouncer.cancel();
        assert_eq!(pending.await.unwrap(), None);
    }
}

//! Contenedor de estado de recursos
//!
//! `ResourceStore<T>` es la caché en memoria de una colección del backend.
//! No hay actualizaciones optimistas: la caché solo cambia después de que el
//! servidor confirme, así que nunca hace falta deshacer nada.

pub mod slice;
pub mod transport_store;

pub use slice::{FetchTicket, ResourceSlice, SliceStatus};
pub use transport_store::{LoadSummary, TransportStore};

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::ApiResult;
use crate::models::Resource;
use crate::services::ResourceApi;

pub struct ResourceStore<T: Resource> {
    api: Arc<dyn ResourceApi<T>>,
    slice: Arc<RwLock<ResourceSlice<T>>>,
}

impl<T: Resource> Clone for ResourceStore<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            slice: Arc::clone(&self.slice),
        }
    }
}

impl<T: Resource> ResourceStore<T> {
    pub fn new(api: Arc<dyn ResourceApi<T>>) -> Self {
        Self {
            api,
            slice: Arc::new(RwLock::new(ResourceSlice::default())),
        }
    }

    /// Recarga la colección completa
    ///
    /// Si la carga falla o queda obsoleta, la lista en caché no cambia.
    pub async fn fetch(&self) -> ApiResult<Vec<T>> {
        let ticket = self.slice.write().await.begin_fetch();
        let result = self.api.get_all().await;
        self.finish(ticket, result).await
    }

    /// Aplica una carga hecha por fuera del CRUD genérico (p. ej. por ruta)
    pub(crate) async fn replace_with<F>(&self, load: F) -> ApiResult<Vec<T>>
    where
        F: std::future::Future<Output = ApiResult<Vec<T>>>,
    {
        let ticket = self.slice.write().await.begin_fetch();
        let result = load.await;
        self.finish(ticket, result).await
    }

    async fn finish(&self, ticket: FetchTicket, result: ApiResult<Vec<T>>) -> ApiResult<Vec<T>> {
        self.slice.write().await.finish_fetch(ticket, &result);
        result
    }

    /// Crea en el servidor y añade el objeto devuelto a la caché
    pub async fn add(&self, data: T) -> ApiResult<T> {
        self.slice.write().await.begin_mutation();
        match self.api.create(&data).await {
            Ok(created) => {
                self.slice.write().await.apply_created(created.clone());
                Ok(created)
            }
            Err(e) => {
                self.slice.write().await.fail_mutation(&e.message);
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: &str, data: T) -> ApiResult<T> {
        self.slice.write().await.begin_mutation();
        match self.api.update(id, &data).await {
            Ok(updated) => {
                self.slice.write().await.apply_updated(id, updated.clone());
                Ok(updated)
            }
            Err(e) => {
                self.slice.write().await.fail_mutation(&e.message);
                Err(e)
            }
        }
    }

    /// Sustituye en caché un objeto ya confirmado por el servidor
    pub(crate) async fn apply_server_update(&self, item: T) {
        let mut slice = self.slice.write().await;
        slice.begin_mutation();
        let id = item.id().to_string();
        slice.apply_updated(&id, item);
    }

    pub(crate) async fn record_failure(&self, message: &str) {
        let mut slice = self.slice.write().await;
        slice.begin_mutation();
        slice.fail_mutation(message);
    }

    pub async fn remove(&self, id: &str) -> ApiResult<()> {
        self.slice.write().await.begin_mutation();
        match self.api.delete(id).await {
            Ok(()) => {
                self.slice.write().await.apply_deleted(id);
                Ok(())
            }
            Err(e) => {
                self.slice.write().await.fail_mutation(&e.message);
                Err(e)
            }
        }
    }

    /// Selecciona un elemento de la caché; `None` si no existe
    pub async fn select(&self, id: &str) -> Option<T> {
        let mut slice = self.slice.write().await;
        let item = slice.find(id).cloned();
        slice.select(item.clone());
        item
    }

    pub async fn clear_selection(&self) {
        self.slice.write().await.select(None);
    }

    pub async fn clear_error(&self) {
        self.slice.write().await.clear_error();
    }

    pub async fn items(&self) -> Vec<T> {
        self.slice.read().await.items().to_vec()
    }

    pub async fn selected(&self) -> Option<T> {
        self.slice.read().await.selected().cloned()
    }

    pub async fn find(&self, id: &str) -> Option<T> {
        self.slice.read().await.find(id).cloned()
    }

    pub async fn status(&self) -> SliceStatus {
        self.slice.read().await.status()
    }

    pub async fn snapshot(&self) -> ResourceSlice<T> {
        self.slice.read().await.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! `ResourceApi` en memoria para pruebas del store

    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::client::{ApiFailure, ApiResult, FailureKind};
    use crate::models::Resource;
    use crate::services::ResourceApi;

    pub struct FakeApi<T> {
        pub items: Mutex<Vec<T>>,
        pub fail_with: Mutex<Option<String>>,
        next_id: Mutex<u32>,
    }

    impl<T: Resource> FakeApi<T> {
        pub fn new(items: Vec<T>) -> Self {
            Self {
                items: Mutex::new(items),
                fail_with: Mutex::new(None),
                next_id: Mutex::new(100),
            }
        }

        pub fn fail(&self, message: &str) {
            *self.fail_with.lock().unwrap() = Some(message.to_string());
        }

        fn check(&self) -> ApiResult<()> {
            match self.fail_with.lock().unwrap().clone() {
                Some(message) => Err(ApiFailure::new(FailureKind::Http(500), message)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl<T: Resource> ResourceApi<T> for FakeApi<T> {
        async fn get_all(&self) -> ApiResult<Vec<T>> {
            self.check()?;
            Ok(self.items.lock().unwrap().clone())
        }

        async fn get_by_id(&self, id: &str) -> ApiResult<Option<T>> {
            self.check()?;
            Ok(self.items.lock().unwrap().iter().find(|i| i.id() == id).cloned())
        }

        async fn create(&self, data: &T) -> ApiResult<T> {
            self.check()?;
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let mut created = data.clone();
            created.assign_id(format!("id-{}", next_id));
            self.items.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: &str, data: &T) -> ApiResult<T> {
            self.check()?;
            let mut updated = data.clone();
            updated.assign_id(id.to_string());
            let mut items = self.items.lock().unwrap();
            match items.iter_mut().find(|i| i.id() == id) {
                Some(existing) => {
                    *existing = updated.clone();
                    Ok(updated)
                }
                None => Err(ApiFailure::new(FailureKind::Http(404), "Not found")),
            }
        }

        async fn delete(&self, id: &str) -> ApiResult<()> {
            self.check()?;
            self.items.lock().unwrap().retain(|i| i.id() != id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeApi;
    use super::*;
    use crate::models::Driver;

    fn driver(id: &str, name: &str) -> Driver {
        Driver {
            id: id.into(),
            name: name.into(),
            license_number: "DL-1".into(),
            contact_number: "9876543210".into(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_fetch_add_update_remove() {
        let api = Arc::new(FakeApi::new(vec![driver("d1", "Ravi")]));
        let store = ResourceStore::<Driver>::new(api.clone());

        assert_eq!(store.fetch().await.unwrap().len(), 1);
        assert_eq!(store.status().await, SliceStatus::Ready);

        let created = store.add(driver("", "Meena")).await.unwrap();
        assert_eq!(store.items().await.len(), 2);

        store.select(&created.id).await;
        let renamed = driver(&created.id, "Meena Iyer");
        store.update(&created.id, renamed).await.unwrap();
        assert_eq!(store.selected().await.unwrap().name, "Meena Iyer");

        store.remove(&created.id).await.unwrap();
        assert!(store.selected().await.is_none());
        assert_eq!(store.items().await.len(), 1);
    }

    /// Lee la lista al instante pero tarda en responder
    struct SlowListApi(FakeApi<Driver>);

    #[async_trait::async_trait]
    impl ResourceApi<Driver> for SlowListApi {
        async fn get_all(&self) -> ApiResult<Vec<Driver>> {
            let snapshot = self.0.get_all().await;
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            snapshot
        }

        async fn get_by_id(&self, id: &str) -> ApiResult<Option<Driver>> {
            self.0.get_by_id(id).await
        }

        async fn create(&self, data: &Driver) -> ApiResult<Driver> {
            self.0.create(data).await
        }

        async fn update(&self, id: &str, data: &Driver) -> ApiResult<Driver> {
            self.0.update(id, data).await
        }

        async fn delete(&self, id: &str) -> ApiResult<()> {
            self.0.delete(id).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_does_not_erase_confirmed_add() {
        let store = ResourceStore::<Driver>::new(Arc::new(SlowListApi(FakeApi::new(Vec::new()))));

        let (fetched, added) = tokio::join!(store.fetch(), async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            store.add(driver("", "Meena")).await
        });

        assert!(fetched.unwrap().is_empty());
        let added = added.unwrap();
        assert_eq!(store.items().await, vec![added]);
        assert!(!store.snapshot().await.is_loading());
    }

    #[tokio::test]
    async fn test_failures_leave_cache_untouched() {
        let api = Arc::new(FakeApi::new(vec![driver("d1", "Ravi")]));
        let store = ResourceStore::<Driver>::new(api.clone());
        store.fetch().await.unwrap();

        api.fail("Internal error");
        assert!(store.fetch().await.is_err());
        assert!(store.add(driver("", "Meena")).await.is_err());
        assert!(store.remove("d1").await.is_err());

        assert_eq!(store.items().await.len(), 1);
        assert_eq!(
            store.status().await,
            SliceStatus::Failed("Internal error".to_string())
        );
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Resource;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

/// Almacén en memoria de un recurso, separado por escuela
pub struct MemoryRepository<T> {
    rows: Arc<RwLock<HashMap<String, Vec<T>>>>,
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Resource> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_all(&self, school_id: &str) -> Vec<T> {
        self.rows
            .read()
            .await
            .get(school_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn find_where<P>(&self, school_id: &str, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .get(school_id)
            .map(|rows| rows.iter().filter(|row| predicate(row)).cloned().collect())
            .unwrap_or_default()
    }

    pub async fn find_by_id(&self, school_id: &str, id: &str) -> Option<T> {
        self.rows
            .read()
            .await
            .get(school_id)
            .and_then(|rows| rows.iter().find(|row| row.id() == id).cloned())
    }

    /// Inserta; sin id se genera uno
    pub async fn create(&self, school_id: &str, mut item: T) -> Result<T, AppError> {
        let mut rows = self.rows.write().await;
        let school_rows = rows.entry(school_id.to_string()).or_default();

        if item.id().is_empty() {
            item.assign_id(Uuid::new_v4().to_string());
        } else if school_rows.iter().any(|row| row.id() == item.id()) {
            return Err(conflict_error(T::NAME, "id", item.id()));
        }

        school_rows.push(item.clone());
        tracing::debug!("💾 {} {} creado en escuela {}", T::NAME, item.id(), school_id);
        Ok(item)
    }

    /// Sustituye el registro; el id del path manda sobre el del body
    pub async fn update(&self, school_id: &str, id: &str, mut item: T) -> Result<T, AppError> {
        let mut rows = self.rows.write().await;
        let existing = rows
            .get_mut(school_id)
            .and_then(|rows| rows.iter_mut().find(|row| row.id() == id))
            .ok_or_else(|| not_found_error(T::NAME, id))?;

        item.assign_id(id.to_string());
        *existing = item.clone();
        Ok(item)
    }

    pub async fn delete(&self, school_id: &str, id: &str) -> Result<(), AppError> {
        let mut rows = self.rows.write().await;
        let school_rows = rows
            .get_mut(school_id)
            .ok_or_else(|| not_found_error(T::NAME, id))?;

        let before = school_rows.len();
        school_rows.retain(|row| row.id() != id);
        if school_rows.len() == before {
            return Err(not_found_error(T::NAME, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Driver;

    fn driver(name: &str) -> Driver {
        Driver {
            name: name.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_schools_are_isolated() {
        let repo = MemoryRepository::<Driver>::new();
        let created = repo.create("school-a", driver("Ravi")).await.unwrap();
        assert!(!created.id.is_empty());

        assert_eq!(repo.find_all("school-a").await.len(), 1);
        assert!(repo.find_all("school-b").await.is_empty());
        assert!(repo.find_by_id("school-b", &created.id).await.is_none());
        assert!(matches!(
            repo.delete("school-b", &created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_path_id() {
        let repo = MemoryRepository::<Driver>::new();
        let created = repo.create("s", driver("Ravi")).await.unwrap();

        let mut changed = driver("Ravi Kumar");
        changed.id = "something-else".into();
        let updated = repo.update("s", &created.id, changed).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(repo.find_all("s").await[0].name, "Ravi Kumar");

        assert!(matches!(
            repo.update("s", "missing", driver("X")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let repo = MemoryRepository::<Driver>::new();
        let created = repo.create("s", driver("Ravi")).await.unwrap();
        let again = repo.create("s", created.clone()).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }
}

//! Matrículas de alumnos (`/register/student`, clave `formNo`)

use crate::client::ApiResult;
use crate::models::{Resource, StudentRegistration};

use super::CrudService;

impl CrudService<StudentRegistration> {
    /// Búsqueda delegada al backend (nombre, formNo o clase)
    pub async fn search(&self, term: &str) -> ApiResult<Vec<StudentRegistration>> {
        let term = term.trim();
        let path = if term.is_empty() {
            StudentRegistration::PATH.to_string()
        } else {
            format!("{}?search={}", StudentRegistration::PATH, urlencoding::encode(term))
        };
        let items: Option<Vec<StudentRegistration>> = self.client().get(&path).await?;
        Ok(items.unwrap_or_default())
    }
}

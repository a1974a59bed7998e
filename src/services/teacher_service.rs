//! Reglas de servicio para profesores

use crate::client::{ApiFailure, ApiResult, FailureKind};
use crate::models::Teacher;

use super::{CrudService, ResourceApi};

impl CrudService<Teacher> {
    /// Comprueba contra el backend que la tutoría del profesor está libre
    ///
    /// Devuelve `Rejected` con el nombre del tutor actual si ya está ocupada.
    pub async fn ensure_incharge_available(&self, teacher: &Teacher) -> ApiResult<()> {
        if teacher.incharge_position().is_none() {
            return Ok(());
        }

        let existing = self.get_all().await?;
        match teacher.find_incharge_conflict(&existing) {
            Some(incumbent) => Err(ApiFailure::new(
                FailureKind::Rejected,
                teacher.incharge_conflict_message(incumbent),
            )),
            None => Ok(()),
        }
    }

    /// Crea el profesor tras verificar la tutoría
    pub async fn create_checked(&self, teacher: &Teacher) -> ApiResult<Teacher> {
        self.ensure_incharge_available(teacher).await?;
        self.create(teacher).await
    }

    /// Actualiza el profesor tras verificar la tutoría
    pub async fn update_checked(&self, id: &str, teacher: &Teacher) -> ApiResult<Teacher> {
        self.ensure_incharge_available(teacher).await?;
        self.update(id, teacher).await
    }
}

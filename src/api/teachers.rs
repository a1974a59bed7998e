//! Endpoints de profesores
//!
//! Igual que el CRUD genérico salvo en alta y edición, que rechazan con 409
//! un tutor de clase+sección ya ocupada.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedSchool;
use crate::models::Teacher;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

use super::resources::{get_one, list, remove};

pub fn create_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<Teacher>).post(create_teacher))
        .route(
            "/:id",
            put(update_teacher)
                .get(get_one::<Teacher>)
                .delete(remove::<Teacher>),
        )
}

async fn ensure_incharge_available(
    state: &AppState,
    school_id: &str,
    teacher: &Teacher,
) -> AppResult<()> {
    if teacher.incharge_position().is_none() {
        return Ok(());
    }

    let existing = state.teachers.find_all(school_id).await;
    match teacher.find_incharge_conflict(&existing) {
        Some(incumbent) => Err(AppError::Conflict(
            teacher.incharge_conflict_message(incumbent),
        )),
        None => Ok(()),
    }
}

async fn create_teacher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Json(payload): Json<Teacher>,
) -> AppResult<(StatusCode, Json<ApiResponse<Teacher>>)> {
    payload.validate()?;
    ensure_incharge_available(&state, &auth.school_id, &payload).await?;

    let created = state.teachers.create(&auth.school_id, payload).await?;
    tracing::info!("✅ Profesor {} creado", created.full_name);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            created,
            "Teacher created successfully".to_string(),
        )),
    ))
}

async fn update_teacher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Path(id): Path<String>,
    Json(mut payload): Json<Teacher>,
) -> AppResult<Json<ApiResponse<Teacher>>> {
    payload.validate()?;
    payload.id = id.clone();
    ensure_incharge_available(&state, &auth.school_id, &payload).await?;

    let updated = state.teachers.update(&auth.school_id, &id, payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        updated,
        "Teacher updated successfully".to_string(),
    )))
}

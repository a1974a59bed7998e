//! Handlers CRUD genéricos
//!
//! Todos los recursos comparten el mismo contrato REST sobre su
//! `MemoryRepository`: listado (con `?search=`), detalle, alta, edición y
//! borrado, siempre dentro de la escuela del token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::dto::ApiResponse;
use crate::middleware::{AuthenticatedSchool, TenantQuery};
use crate::models::Resource;
use crate::repositories::MemoryRepository;
use crate::state::{AppState, HasRepository};
use crate::table::{TableView, Tabular};
use crate::utils::errors::{not_found_error, AppResult};

pub(crate) fn repository<T>(state: &AppState) -> &MemoryRepository<T>
where
    AppState: HasRepository<T>,
{
    <AppState as HasRepository<T>>::repository(state)
}

pub fn resource_router<T>() -> Router<AppState>
where
    T: Resource + Validate + Tabular,
    AppState: HasRepository<T>,
{
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/:id", get(get_one::<T>).put(update::<T>).delete(remove::<T>))
}

pub async fn list<T>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Query(query): Query<TenantQuery>,
) -> AppResult<Json<ApiResponse<Vec<T>>>>
where
    T: Resource + Tabular,
    AppState: HasRepository<T>,
{
    let school_id = auth.resolve(&query)?;
    let rows = repository::<T>(&state).find_all(school_id).await;

    let rows = match query.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            let mut view = TableView::default();
            view.set_search(term);
            view.visible(&rows).into_iter().cloned().collect()
        }
        _ => rows,
    };

    tracing::debug!("📋 {} {} en escuela {}", rows.len(), T::NAME, school_id);
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn get_one<T>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<T>>>
where
    T: Resource,
    AppState: HasRepository<T>,
{
    let item = repository::<T>(&state)
        .find_by_id(&auth.school_id, &id)
        .await
        .ok_or_else(|| not_found_error(T::NAME, &id))?;
    Ok(Json(ApiResponse::success(item)))
}

pub async fn create<T>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Json(payload): Json<T>,
) -> AppResult<(StatusCode, Json<ApiResponse<T>>)>
where
    T: Resource + Validate,
    AppState: HasRepository<T>,
{
    payload.validate()?;
    let created = repository::<T>(&state).create(&auth.school_id, payload).await?;
    tracing::info!("✅ {} {} creado", T::NAME, created.id());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            created,
            format!("{} created successfully", capitalize(T::NAME)),
        )),
    ))
}

pub async fn update<T>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Path(id): Path<String>,
    Json(payload): Json<T>,
) -> AppResult<Json<ApiResponse<T>>>
where
    T: Resource + Validate,
    AppState: HasRepository<T>,
{
    payload.validate()?;
    let updated = repository::<T>(&state)
        .update(&auth.school_id, &id, payload)
        .await?;
    tracing::info!("✏️ {} {} actualizado", T::NAME, id);

    Ok(Json(ApiResponse::success_with_message(
        updated,
        format!("{} updated successfully", capitalize(T::NAME)),
    )))
}

pub async fn remove<T>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedSchool>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>>
where
    T: Resource,
    AppState: HasRepository<T>,
{
    repository::<T>(&state).delete(&auth.school_id, &id).await?;
    tracing::info!("🗑️ {} {} eliminado", T::NAME, id);

    Ok(Json(ApiResponse {
        success: true,
        data: None,
        error: None,
        message: Some(format!("{} deleted successfully", capitalize(T::NAME))),
    }))
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT y la resolución de la escuela
//! (tenant) de cada request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSchool {
    pub user_id: String,
    pub school_id: String,
}

/// Query `?schoolId=` que manda el cliente en los listados
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantQuery {
    pub school_id: Option<String>,
    pub search: Option<String>,
}

impl AuthenticatedSchool {
    /// Escuela efectiva; pedir otra distinta a la del token está prohibido
    pub fn resolve(&self, query: &TenantQuery) -> Result<&str, AppError> {
        match query.school_id.as_deref() {
            Some(requested) if !requested.is_empty() && requested != self.school_id => Err(
                AppError::Forbidden("You do not have access to this school".to_string()),
            ),
            _ => Ok(&self.school_id),
        }
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if claims.school_id.is_empty() {
        return Err(AppError::Unauthorized("Token has no school".to_string()));
    }

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(AuthenticatedSchool {
        user_id: claims.sub,
        school_id: claims.school_id,
    });

    Ok(next.run(request).await)
}

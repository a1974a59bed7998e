//! Handlers de autenticación
//!
//! El backend de referencia no gestiona usuarios: emite tokens de desarrollo
//! para una escuela con el claim `schoolId` que lee el cliente.

use axum::{extract::State, routing::post, Json, Router};
use validator::Validate;

use crate::{
    dto::{
        auth_dto::{TokenRequest, TokenResponse},
        ApiResponse,
    },
    state::AppState,
    utils::{
        errors::{AppError, AppResult},
        jwt::generate_token,
    },
};

pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/token", post(issue_token))
}

/// Emitir un token para una escuela
async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    if state.config.is_production() {
        return Err(AppError::Forbidden(
            "Token issuance is disabled in production".to_string(),
        ));
    }
    request.validate()?;

    let school_id = request.school_id.trim().to_string();
    let user_id = request.user_id.unwrap_or_else(|| "admin".to_string());
    let token = generate_token(&user_id, &school_id, &state.jwt)?;
    tracing::info!("🔑 Token emitido para {} en escuela {}", user_id, school_id);

    Ok(Json(ApiResponse::success(TokenResponse {
        token,
        school_id,
        expires_in: state.jwt.expiration,
    })))
}

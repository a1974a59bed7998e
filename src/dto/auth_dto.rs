use serde::{Deserialize, Serialize};
use validator::Validate;

// Request para emitir un token de desarrollo
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "School id is required"))]
    pub school_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

// Response con el token emitido
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub school_id: String,
    pub expires_in: u64,
}

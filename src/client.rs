//! Cliente HTTP de la API de la escuela
//!
//! Envoltorio fino sobre reqwest que añade el bearer token de la sesión y
//! normaliza toda respuesta al envelope `{success, data, error}`. Nunca
//! entra en pánico ni deja escapar errores de transporte: todo fallo se
//! convierte en `ApiFailure`. Un 401 desmonta la sesión y no se reintenta.

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::dto::ApiResponse;
use crate::session::Session;

/// Tipo de fallo, por si el llamador quiere distinguir más allá del mensaje
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No hubo respuesta (conexión, DNS, timeout)
    Network,
    /// Status 4xx/5xx distinto de 401
    Http(u16),
    Unauthorized,
    /// Respuesta que no se pudo interpretar
    Decode,
    /// 2xx con `success: false`
    Rejected,
}

/// Fallo de una llamada a la API con su mensaje legible
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Decode, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == FailureKind::Unauthorized
    }

    /// Envelope con forma de fallo, para quien todavía consume envelopes
    pub fn into_envelope<T>(self) -> ApiResponse<T> {
        ApiResponse::failure(self.message)
    }
}

pub type ApiResult<T> = Result<T, ApiFailure>;

impl<T> ApiResponse<T> {
    /// Convierte un envelope al contrato `Result` único
    pub fn into_result(self) -> ApiResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            let message = self
                .error_message()
                .unwrap_or("Request was not successful")
                .to_string();
            Err(ApiFailure::new(FailureKind::Rejected, message))
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// URL completa a partir de un path relativo
    pub fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.request(Method::POST, path, Some(to_body(body)?)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.request(Method::PUT, path, Some(to_body(body)?)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        self.request(Method::PATCH, path, Some(to_body(body)?)).await
    }

    /// DELETE; se ignora lo que venga en `data`
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.request::<Value>(Method::DELETE, path, None).await.map(|_| ())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!("🌐 {} {}", method, url);

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!("❌ Error de red en {} {}: {}", method, url, e);
            if e.is_timeout() {
                ApiFailure::network("Request timed out")
            } else {
                ApiFailure::network(format!("Network error: {}", e))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiFailure::network(format!("Network error: {}", e)))?;

        self.interpret(status, &text)
    }

    fn interpret<T: DeserializeOwned>(&self, status: StatusCode, text: &str) -> ApiResult<T> {
        let envelope = parse_envelope(text);

        if status == StatusCode::UNAUTHORIZED {
            self.session.expire();
            let message = envelope
                .as_ref()
                .and_then(|e| e.error_message())
                .unwrap_or("Session expired. Please log in again.");
            return Err(ApiFailure::new(FailureKind::Unauthorized, message));
        }

        if !status.is_success() {
            let message = envelope
                .as_ref()
                .and_then(|e| e.error_message().map(str::to_string))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
                });
            tracing::warn!("⚠️ HTTP {}: {}", status.as_u16(), message);
            return Err(ApiFailure::new(FailureKind::Http(status.as_u16()), message));
        }

        let envelope = envelope.ok_or_else(|| ApiFailure::decode("Invalid response from server"))?;
        let data = envelope.into_result()?.unwrap_or(Value::Null);

        serde_json::from_value(data)
            .map_err(|e| ApiFailure::decode(format!("Unexpected response format: {}", e)))
    }
}

/// Interpreta el cuerpo como envelope; un cuerpo sin `success` se toma como `data`
fn parse_envelope(text: &str) -> Option<ApiResponse<Value>> {
    if text.trim().is_empty() {
        return Some(ApiResponse {
            success: true,
            data: None,
            error: None,
            message: None,
        });
    }

    let value: Value = serde_json::from_str(text).ok()?;
    let is_envelope = value
        .as_object()
        .map_or(false, |map| map.contains_key("success"));
    if is_envelope {
        serde_json::from_value(value).ok()
    } else {
        Some(ApiResponse::success(value))
    }
}

fn to_body<B: Serialize>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiFailure::decode(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(&ClientConfig::new("http://school.test/api/"), Session::in_memory()).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let client = client();
        assert_eq!(client.url("/transport/buses"), "http://school.test/api/transport/buses");
        assert_eq!(client.url("teachers"), "http://school.test/api/teachers");
    }

    #[test]
    fn test_interpret_success_envelope() {
        let body = json!({"success": true, "data": [1, 2, 3]}).to_string();
        let data: Vec<u32> = client().interpret(StatusCode::OK, &body).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_interpret_rejected_envelope() {
        let body = json!({"success": false, "error": "Bus not found"}).to_string();
        let err = client().interpret::<Value>(StatusCode::OK, &body).unwrap_err();
        assert_eq!(err.kind, FailureKind::Rejected);
        assert_eq!(err.message, "Bus not found");
    }

    #[test]
    fn test_interpret_http_error_prefers_body_message() {
        let body = json!({"success": false, "message": "Duplicate registration"}).to_string();
        let err = client().interpret::<Value>(StatusCode::CONFLICT, &body).unwrap_err();
        assert_eq!(err.kind, FailureKind::Http(409));
        assert_eq!(err.message, "Duplicate registration");

        let err = client().interpret::<Value>(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert_eq!(err.message, "Bad Gateway");
    }

    #[test]
    fn test_unauthorized_expires_session() {
        let client = client();
        client.session().login("a.b.c", None).unwrap();
        let err = client.interpret::<Value>(StatusCode::UNAUTHORIZED, "").unwrap_err();
        assert!(err.is_unauthorized());
        assert!(client.session().token().is_none());
    }

    #[test]
    fn test_bare_json_is_treated_as_data() {
        let data: Vec<String> = client().interpret(StatusCode::OK, r#"["a","b"]"#).unwrap();
        assert_eq!(data, vec!["a", "b"]);
    }
}

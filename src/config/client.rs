//! Configuración del cliente de la API

use std::env;
use std::time::Duration;

use super::environment::parse_var;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base de la API, sin barra final
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base(api_url.into()),
            ..Self::default()
        }
    }

    /// `API_URL`, luego `VITE_API_URL` (el nombre que usa el frontend), luego el default
    pub fn from_env() -> Self {
        let api_url = env::var("API_URL")
            .or_else(|_| env::var("VITE_API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = parse_var::<u64>("API_TIMEOUT_SECS").unwrap_or(30);

        Self {
            api_url: normalize_base(api_url),
            timeout: Duration::from_secs(timeout),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

//! Configuración de variables de entorno del backend de referencia
//!
//! Lee `.env` (vía `dotenvy` en `main`) y variables del proceso. A diferencia
//! de producción, todo tiene un valor por defecto para poder arrancar en local.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    /// Segundos de validez de los tokens emitidos
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "school-erp-development-secret".to_string(),
            jwt_expiration: 60 * 60 * 24,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT").unwrap_or(defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_expiration: parse_var("JWT_EXPIRATION").unwrap_or(defaults.jwt_expiration),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub(crate) fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ {} tiene un valor inválido: '{}'", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}

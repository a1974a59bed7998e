//! Estado de sesión persistido del cliente
//!
//! Equivalente de escritorio del `localStorage` del navegador: guarda
//! `token`, `userData`/`user` y `currentDate`. También es el único sitio que
//! sabe sacar el id de escuela (tenant) del token; los servicios lo piden aquí.

use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::models::date_format;

pub const TOKEN_KEY: &str = "token";
pub const USER_DATA_KEY: &str = "userData";
pub const USER_KEY: &str = "user";
pub const CURRENT_DATE_KEY: &str = "currentDate";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is corrupted: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session storage lock poisoned")]
    Poisoned,
}

/// Almacén clave/valor de la sesión
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Sesión guardada en un fichero JSON; se reescribe entero en cada cambio
pub struct FileSessionStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileSessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.values.write().map_err(|_| SessionError::Poisoned)?;
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    /// El backend respondió 401: hay que volver a `/login`
    LoginRequired,
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Guarda token y (opcionalmente) los datos del usuario
    pub fn login(&self, token: &str, user: Option<&Value>) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, token)?;
        if let Some(user) = user {
            self.store.set(USER_DATA_KEY, &user.to_string())?;
        }
        let _ = self.events.send(SessionEvent::LoggedIn);
        tracing::info!("🔐 Sesión iniciada");
        Ok(())
    }

    /// Borra credenciales y datos de usuario
    pub fn logout(&self) -> Result<(), SessionError> {
        self.clear_credentials()?;
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Desmontaje por 401: limpia la sesión y avisa de que hay que ir a login
    pub fn expire(&self) {
        if let Err(e) = self.clear_credentials() {
            tracing::error!("❌ No se pudo limpiar la sesión: {}", e);
        }
        tracing::warn!("🔒 Sesión expirada, redirigiendo a /login");
        let _ = self.events.send(SessionEvent::LoginRequired);
    }

    fn clear_credentials(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_DATA_KEY)?;
        self.store.remove(USER_KEY)?;
        Ok(())
    }

    /// Id de la escuela del usuario actual
    ///
    /// Orden: claim `schoolId` del token, luego `userData.schoolId`, luego
    /// `user.schoolId`.
    pub fn current_tenant_id(&self) -> Option<String> {
        self.token()
            .and_then(|token| decode_token_claims(&token))
            .and_then(|claims| school_id_of(&claims))
            .or_else(|| self.stored_json(USER_DATA_KEY).and_then(|v| school_id_of(&v)))
            .or_else(|| self.stored_json(USER_KEY).and_then(|v| school_id_of(&v)))
    }

    /// Fecha de trabajo persistida, o hoy
    pub fn current_date(&self) -> NaiveDate {
        self.store
            .get(CURRENT_DATE_KEY)
            .and_then(|raw| date_format::parse(&raw))
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn set_current_date(&self, date: NaiveDate) -> Result<(), SessionError> {
        self.store
            .set(CURRENT_DATE_KEY, &date.format("%Y-%m-%d").to_string())
    }

    fn stored_json(&self, key: &str) -> Option<Value> {
        let raw = self.store.get(key)?;
        serde_json::from_str(&raw).ok()
    }
}

fn school_id_of(value: &Value) -> Option<String> {
    match value.get("schoolId")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodifica el payload de un JWT sin verificar la firma
///
/// El cliente no tiene el secreto; solo lee claims para enrutar peticiones.
pub fn decode_token_claims(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .or_else(|_| URL_SAFE.decode(payload))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fake_token(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_tenant_from_token_claim() {
        let session = Session::in_memory();
        session
            .login(&fake_token(json!({"sub": "u1", "schoolId": "school-7"})), None)
            .unwrap();
        assert_eq!(session.current_tenant_id().as_deref(), Some("school-7"));
    }

    #[test]
    fn test_tenant_falls_back_to_user_data() {
        let session = Session::in_memory();
        session
            .login(&fake_token(json!({"sub": "u1"})), Some(&json!({"schoolId": 12})))
            .unwrap();
        assert_eq!(session.current_tenant_id().as_deref(), Some("12"));
    }

    #[test]
    fn test_expire_clears_and_notifies() {
        let session = Session::in_memory();
        let mut events = session.subscribe();
        session.login("a.b.c", Some(&json!({"schoolId": "s"}))).unwrap();
        session.expire();

        assert!(session.token().is_none());
        assert!(session.current_tenant_id().is_none());
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn);
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);
    }

    #[test]
    fn test_file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.set(CURRENT_DATE_KEY, "2024-06-01").unwrap();
        drop(store);

        let session = Session::new(Arc::new(FileSessionStore::open(&path).unwrap()));
        assert_eq!(
            session.current_date(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }
}

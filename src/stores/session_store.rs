// ============================================================================
// SESSION STORE - única fuente de verdad sobre la autenticación
// ============================================================================
// Ciclo de vida explícito: restore → login/confirm → logout/expire.
// El loader solo puede forzar `expire` (401) y `confirm` (token aceptado).
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::CredentialField;
use crate::error::{ApiError, PortalError};
use crate::models::{LoginResponse, Session, UserIdentity};
use crate::services::ApiClient;
use crate::utils::constants::{EXPIRES_STORAGE_KEY, TOKEN_STORAGE_KEY, USER_STORAGE_KEY};
use crate::utils::storage::{load_from_storage, save_to_storage, KeyValueStorage};

/// Exactamente una de estas fases vale en cada momento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Anonymous,
    /// Token restaurado del storage, pendiente de verificación
    Tentative,
    Authenticated,
    /// `expires_at` vencido; no queda token
    Expired,
}

#[derive(Debug, Clone)]
struct SessionInner {
    phase: SessionPhase,
    session: Option<Session>,
    notice: Option<String>,
}

pub struct SessionStore {
    api: ApiClient,
    storage: Rc<dyn KeyValueStorage>,
    credential_field: CredentialField,
    inner: RefCell<SessionInner>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Rc<dyn KeyValueStorage>, credential_field: CredentialField) -> Self {
        Self {
            api,
            storage,
            credential_field,
            inner: RefCell::new(SessionInner {
                phase: SessionPhase::Anonymous,
                session: None,
                notice: None,
            }),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.borrow().phase
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.borrow().session.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.borrow().session.as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.inner
            .borrow()
            .session
            .as_ref()
            .and_then(|s| s.user.clone())
    }

    /// Aviso para el usuario (p.ej. "sesión caducada")
    pub fn notice(&self) -> Option<String> {
        self.inner.borrow().notice.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.phase(),
            SessionPhase::Tentative | SessionPhase::Authenticated
        )
    }

    /// Token utilizable ahora mismo; si `expires_at` ya pasó, la sesión
    /// pasa a `Expired` y no se devuelve nada.
    pub fn active_token(&self) -> Option<String> {
        let expired = {
            let inner = self.inner.borrow();
            match inner.session {
                Some(ref session) => session.is_expired_at(Utc::now()),
                None => return None,
            }
        };

        if expired {
            log::warn!("⌛ Sesión vencida (expires_at), limpiando");
            self.clear_storage();
            let mut inner = self.inner.borrow_mut();
            inner.session = None;
            inner.phase = SessionPhase::Expired;
            inner.notice = Some("Sessione scaduta, effettua di nuovo l'accesso.".to_string());
            return None;
        }

        self.token()
    }

    /// Al arrancar: lee token/usuario persistidos
    pub fn restore(&self) -> SessionPhase {
        let token = match self.storage.get_item(TOKEN_STORAGE_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => {
                log::info!("🔓 Sin token persistido, sesión anónima");
                self.set_state(SessionPhase::Anonymous, None);
                return SessionPhase::Anonymous;
            }
            Err(e) => {
                log::warn!("⚠️ No se pudo leer el token persistido: {}", e);
                self.set_state(SessionPhase::Anonymous, None);
                return SessionPhase::Anonymous;
            }
        };

        // La identidad persistida es solo una caché: si está corrupta se ignora
        let user = load_from_storage::<Option<UserIdentity>>(self.storage.as_ref(), USER_STORAGE_KEY).flatten();
        let expires_at = self
            .storage
            .get_item(EXPIRES_STORAGE_KEY)
            .ok()
            .flatten()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let session = Session {
            token,
            user,
            expires_at,
        };

        if session.is_expired_at(Utc::now()) {
            log::warn!("⌛ Token persistido vencido, limpiando storage");
            self.clear_storage();
            self.set_state(SessionPhase::Expired, None);
            return SessionPhase::Expired;
        }

        log::info!("💾 Sesión restaurada desde storage (pendiente de verificación)");
        self.set_state(SessionPhase::Tentative, Some(session));
        SessionPhase::Tentative
    }

    /// Login contra `/api/v1/auth/login`
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, PortalError> {
        let identifier = username.trim();
        log::info!("🔐 Login para usuario: {}", identifier);

        // Un login nuevo sustituye a la sesión previa, salga bien o mal
        if self.token().is_some() {
            log::info!("🔄 Descartando sesión previa antes del login");
            self.clear_storage();
            self.set_state(SessionPhase::Anonymous, None);
        }

        let value = self
            .api
            .login(self.credential_field.as_str(), identifier, password)
            .await
            .map_err(|e| {
                log::error!("❌ Login fallido: {}", e);
                match e {
                    // Credenciales rechazadas: mensaje del servidor tal cual
                    ApiError::Http {
                        status: 400 | 401 | 403 | 422,
                        message,
                    } => PortalError::Auth(message),
                    other => PortalError::from(other),
                }
            })?;

        let response: LoginResponse = serde_json::from_value(value)
            .map_err(|e| PortalError::Validation(format!("login response: {}", e)))?;

        let token = match response.token {
            Some(token) if !token.trim().is_empty() => token,
            _ => {
                log::error!("❌ Login sin token en la respuesta");
                return Err(PortalError::missing_token());
            }
        };

        let session = Session {
            token,
            user: response.user,
            expires_at: response.expires_at,
        };

        self.persist(&session);
        self.set_state(SessionPhase::Authenticated, Some(session.clone()));
        log::info!("✅ Sesión iniciada");
        Ok(session)
    }

    /// Limpia todo y avisa al backend sin esperar nada de él
    pub async fn logout(&self) {
        let token = self.token();
        self.clear_storage();
        self.set_state(SessionPhase::Anonymous, None);
        log::info!("👋 Logout - sesión limpiada");

        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                log::warn!("⚠️ Logout en backend no notificado: {}", e);
            }
        }
    }

    /// 401 en un recurso protegido: fuera la sesión
    pub fn expire(&self, reason: &str) {
        if !self.is_authenticated() {
            return;
        }
        log::warn!("🔒 Sesión rechazada por el backend: {}", reason);
        self.clear_storage();
        let mut inner = self.inner.borrow_mut();
        inner.phase = SessionPhase::Anonymous;
        inner.session = None;
        inner.notice = Some(format!("Sessione non valida o scaduta: {}", reason));
    }

    /// El backend aceptó el token; refresca la identidad si llegó una
    pub fn confirm(&self, user: Option<UserIdentity>) {
        let updated = {
            let mut inner = self.inner.borrow_mut();
            let Some(ref mut session) = inner.session else {
                return;
            };
            let changed = user.is_some() && session.user != user;
            if user.is_some() {
                session.user = user;
            }
            let snapshot = changed.then(|| session.user.clone());
            if inner.phase == SessionPhase::Tentative {
                log::info!("✅ Token restaurado verificado");
                inner.phase = SessionPhase::Authenticated;
            }
            snapshot
        };

        if let Some(user) = updated {
            if let Err(e) = save_to_storage(self.storage.as_ref(), USER_STORAGE_KEY, &user) {
                log::warn!("⚠️ Error guardando usuario: {}", e);
            }
        }
    }

    fn set_state(&self, phase: SessionPhase, session: Option<Session>) {
        let mut inner = self.inner.borrow_mut();
        inner.phase = phase;
        inner.session = session;
        if phase == SessionPhase::Authenticated {
            inner.notice = None;
        }
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.storage.set_item(TOKEN_STORAGE_KEY, &session.token) {
            log::error!("❌ Error guardando token: {}", e);
        }
        if let Err(e) = save_to_storage(self.storage.as_ref(), USER_STORAGE_KEY, &session.user) {
            log::error!("❌ Error guardando usuario: {}", e);
        }
        let expires = match session.expires_at {
            Some(exp) => self.storage.set_item(EXPIRES_STORAGE_KEY, &exp.to_rfc3339()),
            None => self.storage.remove_item(EXPIRES_STORAGE_KEY),
        };
        if let Err(e) = expires {
            log::error!("❌ Error guardando expires_at: {}", e);
        }
    }

    fn clear_storage(&self) {
        for key in [TOKEN_STORAGE_KEY, USER_STORAGE_KEY, EXPIRES_STORAGE_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                log::warn!("⚠️ Error limpiando {}: {}", key, e);
            }
        }
    }
}

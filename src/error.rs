// ============================================================================
// ERRORES - taxonomía del portal
// ============================================================================

use thiserror::Error;

use crate::models::ResourceKind;

/// Error de una petición HTTP concreta (nivel cliente API)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Respuesta no-2xx; `message` ya sigue la precedencia message > error > "HTTP <status>"
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    /// Cuerpo 2xx que no es JSON
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 401: el backend rechaza el token
    pub fn is_auth_rejection(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Error de operación tal como se muestra al usuario
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    /// Red caída, timeout o respuesta ilegible; se puede reintentar
    #[error("{0}")]
    Transport(String),

    /// Credenciales rechazadas al login o sesión caducada
    #[error("{0}")]
    Auth(String),

    /// Un recurso concreto no se ha podido cargar
    #[error("{resource}: {message}")]
    Resource {
        resource: ResourceKind,
        message: String,
    },

    /// Respuesta 2xx con campos ausentes o malformados
    #[error("Invalid response: {0}")]
    Validation(String),
}

impl PortalError {
    pub fn missing_token() -> Self {
        PortalError::Auth("missing token".to_string())
    }

    pub fn resource(resource: ResourceKind, message: impl Into<String>) -> Self {
        PortalError::Resource {
            resource,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, PortalError::Transport(_))
    }
}

impl From<ApiError> for PortalError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http { status: 401, message } => PortalError::Auth(message),
            ApiError::Http { message, .. } => PortalError::Transport(message),
            other => PortalError::Transport(other.to_string()),
        }
    }
}

/// Fallo del almacenamiento persistente del navegador
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("localStorage unavailable")]
    Unavailable,

    #[error("storage write failed for key '{0}'")]
    Write(String),

    #[error("storage read failed for key '{0}'")]
    Read(String),

    #[error("storage serialization failed: {0}")]
    Serialization(String),
}

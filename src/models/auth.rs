use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identidad del usuario autenticado.
///
/// Solo la consume la capa de presentación: el loader no la interpreta.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UserIdentity {
    /// Vacío si el backend identifica al usuario solo por email
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserIdentity {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            name: None,
            role: None,
            email: None,
            extra: Map::new(),
        }
    }

    /// Nombre para la topbar: name → username → email → "utente"
    pub fn display_name(&self) -> &str {
        [
            self.name.as_deref(),
            Some(self.username.as_str()),
            self.email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|n| !n.trim().is_empty())
        .unwrap_or("utente")
    }
}

/// Respuesta de `POST /api/v1/auth/login`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserIdentity>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Respuesta de `GET /api/v1/auth/me`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub user: UserIdentity,
}

/// Sesión activa: token + identidad cacheada
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Session {
    pub token: String,
    pub user: Option<UserIdentity>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_identity_keeps_unknown_fields() {
        let user: UserIdentity = serde_json::from_value(serde_json::json!({
            "username": "agent1",
            "role": "agency_admin",
            "agency_id": 12
        }))
        .unwrap();

        assert_eq!(user.role.as_deref(), Some("agency_admin"));
        assert_eq!(user.extra.get("agency_id"), Some(&serde_json::json!(12)));
        assert_eq!(user.display_name(), "agent1");
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let by_email: UserIdentity = serde_json::from_value(serde_json::json!({
            "email": "agenzia@example.it",
            "name": "  "
        }))
        .unwrap();
        assert_eq!(by_email.display_name(), "agenzia@example.it");

        let named = UserIdentity {
            name: Some("Agenzia Nord".into()),
            ..UserIdentity::new("agent1")
        };
        assert_eq!(named.display_name(), "Agenzia Nord");

        let blank: UserIdentity = serde_json::from_value(serde_json::json!({"username": null})).unwrap();
        assert_eq!(blank.display_name(), "utente");
    }

    #[test]
    fn test_login_response_tolerates_missing_fields() {
        let resp: LoginResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(resp.token.is_none());
        assert!(resp.user.is_none());
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            token: "abc".into(),
            user: None,
            expires_at: Some(now - chrono::Duration::minutes(1)),
        };
        assert!(session.is_expired_at(now));

        let open = Session { expires_at: None, ..session };
        assert!(!open.is_expired_at(now));
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::ResourceKind;
use crate::utils::constants::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_MS};

/// Nombre del campo de credencial que espera `/api/v1/auth/login`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialField {
    #[default]
    Username,
    Email,
}

impl CredentialField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialField::Username => "username",
            CredentialField::Email => "email",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "username" => Some(CredentialField::Username),
            "email" => Some(CredentialField::Email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub credential_field: CredentialField,
    /// Recursos que el loader pide en cada ciclo
    pub resources: Vec<ResourceKind>,
    /// Superponer datos demo donde el backend no llega
    pub demo_fallback: bool,
    pub enable_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: normalize_base_url(DEFAULT_API_BASE_URL),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            credential_field: CredentialField::Username,
            resources: ResourceKind::ALL.to_vec(),
            demo_fallback: true,
            enable_logging: true,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self::from_values(
            option_env!("PORTAL_API_BASE_URL"),
            option_env!("PORTAL_REQUEST_TIMEOUT_MS"),
            option_env!("PORTAL_CREDENTIAL_FIELD"),
            option_env!("PORTAL_RESOURCES"),
            option_env!("PORTAL_DEMO_FALLBACK"),
            option_env!("PORTAL_ENABLE_LOGGING"),
            defaults,
        )
    }

    fn from_values(
        base_url: Option<&str>,
        timeout_ms: Option<&str>,
        credential_field: Option<&str>,
        resources: Option<&str>,
        demo_fallback: Option<&str>,
        enable_logging: Option<&str>,
        defaults: Self,
    ) -> Self {
        let resources = match resources.map(parse_resources) {
            Some(Ok(list)) if !list.is_empty() => list,
            Some(Err(e)) => {
                log::warn!("⚠️ PORTAL_RESOURCES ignorada: {}", e);
                defaults.resources.clone()
            }
            _ => defaults.resources.clone(),
        };

        Self {
            api_base_url: base_url
                .map(normalize_base_url)
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.api_base_url),
            request_timeout_ms: timeout_ms
                .and_then(|v| v.trim().parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.request_timeout_ms),
            credential_field: credential_field
                .and_then(CredentialField::parse)
                .unwrap_or(defaults.credential_field),
            resources,
            demo_fallback: demo_fallback
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.demo_fallback),
            enable_logging: enable_logging
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.enable_logging),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base_url = normalize_base_url(url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis().max(1) as u64;
        self
    }

    pub fn with_credential_field(mut self, field: CredentialField) -> Self {
        self.credential_field = field;
        self
    }

    pub fn with_resources(mut self, resources: &[ResourceKind]) -> Self {
        let mut list = Vec::with_capacity(resources.len());
        for kind in resources {
            if !list.contains(kind) {
                list.push(*kind);
            }
        }
        self.resources = list;
        self
    }

    pub fn with_demo_fallback(mut self, enabled: bool) -> Self {
        self.demo_fallback = enabled;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

/// Quita espacios y barras finales de la URL base
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// "identity, summary,activities" → lista sin duplicados
pub fn parse_resources(value: &str) -> Result<Vec<ResourceKind>, String> {
    let mut list = Vec::new();
    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
        let kind: ResourceKind = part.parse()?;
        if !list.contains(&kind) {
            list.push(kind);
        }
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_strips_trailing_slashes() {
        assert_eq!(normalize_base_url(" https://api.example.it/// "), "https://api.example.it");
        assert_eq!(normalize_base_url("https://api.example.it"), "https://api.example.it");
    }

    #[test]
    fn test_parse_resources() {
        assert_eq!(
            parse_resources("identity, summary,activities,summary"),
            Ok(vec![ResourceKind::Identity, ResourceKind::Summary, ResourceKind::Activities])
        );
        assert!(parse_resources("identity,branding").is_err());
    }

    #[test]
    fn test_from_values_overrides_and_fallbacks() {
        let config = AppConfig::from_values(
            Some("http://localhost:8080/"),
            Some("not-a-number"),
            Some("EMAIL"),
            Some("identity,credits"),
            Some("false"),
            None,
            AppConfig::default(),
        );

        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.credential_field, CredentialField::Email);
        assert_eq!(config.resources, vec![ResourceKind::Identity, ResourceKind::Credits]);
        assert!(!config.demo_fallback);
        assert!(config.is_logging_enabled());
    }

    #[test]
    fn test_invalid_resource_list_keeps_defaults() {
        let config = AppConfig::from_values(
            None,
            Some("2500"),
            None,
            Some("identity,nope"),
            None,
            None,
            AppConfig::default(),
        );
        assert_eq!(config.resources, ResourceKind::ALL.to_vec());
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .with_base_url("https://x.test/")
            .with_resources(&[ResourceKind::Summary, ResourceKind::Summary])
            .with_timeout(Duration::from_millis(250));

        assert_eq!(config.api_base_url, "https://x.test");
        assert_eq!(config.resources, vec![ResourceKind::Summary]);
        assert_eq!(config.request_timeout_ms, 250);
    }
}

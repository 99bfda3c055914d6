// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO toca la sesión: recibe el token como parámetro y devuelve JSON o ApiError
// ============================================================================

use std::rc::Rc;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::ResourceKind;
use crate::services::transport::{HttpRequest, HttpTransport, Method};
use crate::utils::timer::with_timeout;

const LOGIN_PATH: &str = "/api/v1/auth/login";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";

/// Opciones de una petición (`method`, `token`, `body`)
#[derive(Debug, Clone, Default)]
pub struct RequestOptions<'a> {
    pub method: Method,
    pub token: Option<&'a str>,
    pub body: Option<Value>,
}

impl<'a> RequestOptions<'a> {
    pub fn get(token: Option<&'a str>) -> Self {
        Self {
            method: Method::Get,
            token,
            body: None,
        }
    }

    pub fn post(token: Option<&'a str>, body: Option<Value>) -> Self {
        Self {
            method: Method::Post,
            token,
            body,
        }
    }
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Rc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self {
            base_url: crate::config::normalize_base_url(base_url),
            transport,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Petición genérica: JSON de vuelta o `ApiError`
    pub async fn request(&self, path: &str, options: RequestOptions<'_>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut headers = Vec::new();
        let body = match options.body {
            Some(ref body) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(body).map_err(|e| ApiError::Parse(e.to_string()))?)
            }
            None => None,
        };
        if let Some(token) = options.token.filter(|t| !t.is_empty()) {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let request = HttpRequest {
            method: options.method,
            url,
            headers,
            body,
        };

        log::debug!("🌐 {} {}", request.method.as_str(), path);

        let response = with_timeout(self.transport.send(request), self.timeout)
            .await
            .map_err(|_| {
                log::warn!("⏱️ Timeout en {} ({} ms)", path, self.timeout.as_millis());
                ApiError::Timeout(self.timeout.as_millis() as u64)
            })?
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let parsed = parse_body(&response.body);

        if !(200..300).contains(&response.status) {
            let message = extract_error_message(response.status, &response.status_text, parsed.as_ref());
            log::warn!("❌ HTTP {} en {}: {}", response.status, path, message);
            return Err(ApiError::Http {
                status: response.status,
                message,
            });
        }

        match parsed {
            Some(value) => Ok(value),
            // Cuerpo vacío en 2xx (p.ej. logout) → objeto vacío
            None if response.body.trim().is_empty() => Ok(Value::Object(Map::new())),
            None => Err(ApiError::Parse(format!(
                "non-JSON response from {} ({} bytes)",
                path,
                response.body.len()
            ))),
        }
    }

    /// `POST /api/v1/auth/login` con `{<campo>: ..., password}`
    pub async fn login(&self, credential_field: &str, identifier: &str, password: &str) -> Result<Value, ApiError> {
        let mut body = Map::new();
        body.insert(credential_field.to_string(), Value::String(identifier.to_string()));
        body.insert("password".to_string(), Value::String(password.to_string()));
        self.request(LOGIN_PATH, RequestOptions::post(None, Some(Value::Object(body))))
            .await
    }

    pub async fn logout(&self, token: &str) -> Result<Value, ApiError> {
        self.request(LOGOUT_PATH, RequestOptions::post(Some(token), None))
            .await
    }

    pub async fn me(&self, token: &str) -> Result<Value, ApiError> {
        self.resource(ResourceKind::Identity, token).await
    }

    /// GET autenticado del recurso protegido
    pub async fn resource(&self, kind: ResourceKind, token: &str) -> Result<Value, ApiError> {
        self.request(kind.path(), RequestOptions::get(Some(token))).await
    }
}

fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Precedencia: `message` del servidor → `error` del servidor → "HTTP <status>"
pub fn extract_error_message(status: u16, status_text: &str, body: Option<&Value>) -> String {
    if let Some(body) = body {
        if let Some(message) = non_empty_str(body.get("message")) {
            return message;
        }
        if let Some(error) = body.get("error") {
            if let Some(message) = non_empty_str(Some(error)) {
                return message;
            }
            // `{error: {message: "..."}}`
            if let Some(message) = non_empty_str(error.get("message")) {
                return message;
            }
        }
    }

    let status_text = status_text.trim();
    if status_text.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {} - {}", status, status_text)
    }
}

/// Regla única de envelopes de lista: array suelto o `{items|data|rows: [...]}`
pub fn unwrap_list(value: Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ["items", "data", "rows"] {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return Ok(items);
                }
            }
            Err("expected a list or an {items|data|rows} envelope".to_string())
        }
        _ => Err("expected a list or an {items|data|rows} envelope".to_string()),
    }
}

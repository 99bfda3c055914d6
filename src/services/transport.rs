// ============================================================================
// TRANSPORTE HTTP - la única pieza que habla con la red
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// Fallo de red (el servidor no llegó a responder)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Envía una petición y devuelve la respuesta cruda, sea cual sea el status.
///
/// Las futures no son `Send`: todo corre en el event loop del navegador.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(target_arch = "wasm32")]
pub use browser::GlooTransport;

#[cfg(target_arch = "wasm32")]
mod browser {
    use async_trait::async_trait;
    use gloo_net::http::Request;

    use super::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

    /// Transporte `fetch` vía gloo-net
    #[derive(Debug, Default, Clone, Copy)]
    pub struct GlooTransport;

    #[async_trait(?Send)]
    impl HttpTransport for GlooTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let built = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError(format!("Request build error: {}", e)))?;

            let response = built
                .send()
                .await
                .map_err(|e| TransportError(e.to_string()))?;

            let status = response.status();
            let status_text = response.status_text();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError(format!("Body read error: {}", e)))?;

            Ok(HttpResponse {
                status,
                status_text,
                body,
            })
        }
    }
}

//! Transporte de pruebas: respuestas guionizadas por (método, path).

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::services::transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use crate::utils::timer::sleep;

#[derive(Debug, Clone)]
pub struct StubReply {
    status: u16,
    status_text: String,
    body: String,
    delay: Option<Duration>,
    network_error: Option<String>,
}

impl StubReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::text(status, &body.to_string())
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            status_text: String::new(),
            body: body.to_string(),
            delay: None,
            network_error: None,
        }
    }

    pub fn network_error(message: &str) -> Self {
        Self {
            network_error: Some(message.to_string()),
            ..Self::text(0, "")
        }
    }

    pub fn status_text(mut self, text: &str) -> Self {
        self.status_text = text.to_string();
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Cada ruta tiene una cola de respuestas; la última se repite
#[derive(Default)]
pub struct StubTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<StubReply>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, method: Method, path: &str, reply: StubReply) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<StubReply> {
        let mut routes = self.routes.borrow_mut();
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

/// "https://api.test/api/v1/x" → "/api/v1/x"
fn path_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| &url[i + 3..]).unwrap_or(url);
    after_scheme
        .find('/')
        .map(|i| &after_scheme[i..])
        .unwrap_or("/")
}

#[async_trait(?Send)]
impl HttpTransport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = path_of(&request.url).to_string();
        let reply = self.next_reply(request.method, &path);
        self.requests.borrow_mut().push(request);

        let Some(reply) = reply else {
            return Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: r#"{"error":"Route not found"}"#.to_string(),
            });
        };

        if let Some(delay) = reply.delay {
            sleep(delay).await;
        }
        if let Some(message) = reply.network_error {
            return Err(TransportError(message));
        }

        Ok(HttpResponse {
            status: reply.status,
            status_text: reply.status_text,
            body: reply.body,
        })
    }
}

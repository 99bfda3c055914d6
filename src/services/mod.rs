pub mod transport;
pub mod api_client;
pub mod demo_merge;
pub mod data_loader;

pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
#[cfg(target_arch = "wasm32")]
pub use transport::GlooTransport;
pub use api_client::{ApiClient, RequestOptions};
pub use demo_merge::*;
pub use data_loader::{DataLoader, LoadOutcome};

// ============================================================================
// AGENCY DASHBOARD - NÚCLEO CLIENTE (RUST + WASM)
// ============================================================================
// Capas:
// - Services: cliente API, loader de recursos protegidos, merge demo
// - Stores: sesión (token + identidad) con ciclo de vida explícito
// - State: snapshot publicado con Rc<RefCell> + notificaciones
// - ViewModels: KPIs, filtros y navegación listos para pintar
// - Models: estructuras compartidas con el backend
// ============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;
pub mod viewmodels;

#[cfg(test)]
mod test_support;

pub use app::PortalApp;
pub use config::{AppConfig, CredentialField};
pub use error::{ApiError, PortalError, StorageError};
pub use services::{LoadOutcome, HttpTransport};
pub use stores::{SessionPhase, SessionStore};
pub use viewmodels::DashboardData;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use js_sys::Promise;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{future_to_promise, spawn_local};
    use web_sys::{CustomEvent, CustomEventInit};

    use crate::app::PortalApp;
    use crate::config::AppConfig;
    use crate::services::{GlooTransport, LoadOutcome};
    use crate::state::LoaderSnapshot;
    use crate::utils::constants::PORTAL_UPDATED_EVENT;
    use crate::utils::storage::LocalStorage;
    use crate::viewmodels::{
        filter_reports, outcome_filter_options, status_filter_options, ActivityFilter, View,
    };

    // Instancia global de la app (un solo hilo en el navegador)
    thread_local! {
        static APP: RefCell<Option<Rc<PortalApp>>> = RefCell::new(None);
    }

    fn app() -> Result<Rc<PortalApp>, JsValue> {
        APP.with(|cell| cell.borrow().clone())
            .ok_or_else(|| JsValue::from_str("App no está inicializada"))
    }

    fn dashboard_json(app: &PortalApp) -> Result<String, JsValue> {
        to_json(&app.dashboard())
    }

    /// `window.dispatchEvent(new CustomEvent("portalUpdated", {detail: phase}))`
    fn dispatch_portal_updated(snapshot: &LoaderSnapshot) {
        let Some(win) = web_sys::window() else {
            return;
        };
        let detail = serde_json::to_string(&snapshot.phase).unwrap_or_default();
        let init = CustomEventInit::new();
        init.set_detail(&JsValue::from_str(detail.trim_matches('"')));
        match CustomEvent::new_with_event_init_dict(PORTAL_UPDATED_EVENT, &init) {
            Ok(event) => {
                if let Err(e) = win.dispatch_event(&event) {
                    log::warn!("⚠️ Error despachando {}: {:?}", PORTAL_UPDATED_EVENT, e);
                }
            }
            Err(e) => log::warn!("⚠️ Error creando {}: {:?}", PORTAL_UPDATED_EVENT, e),
        }
    }

    fn outcome_label(outcome: &LoadOutcome) -> &'static str {
        match outcome {
            LoadOutcome::NoSession => "no_session",
            LoadOutcome::Stale => "stale",
            LoadOutcome::SessionExpired => "session_expired",
            LoadOutcome::Loaded(_) => "loaded",
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let config = AppConfig::from_env();
        if config.is_logging_enabled() {
            wasm_logger::init(wasm_logger::Config::default());
        }
        log::info!("🚀 Agency Dashboard - Rust + WASM");

        let app = Rc::new(PortalApp::new(config, Rc::new(GlooTransport), Rc::new(LocalStorage)));
        app.subscribe(|snapshot| dispatch_portal_updated(snapshot));

        APP.with(|cell| {
            *cell.borrow_mut() = Some(app.clone());
        });

        spawn_local(async move {
            let outcome = app.boot().await;
            log::info!("🏁 Boot terminado: {}", outcome_label(&outcome));
        });

        Ok(())
    }

    /// Resuelve con el JSON del dashboard; rechaza con el mensaje de error
    #[wasm_bindgen]
    pub fn portal_login(username: String, password: String) -> Promise {
        future_to_promise(async move {
            let app = app()?;
            app.login(&username, &password)
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(JsValue::from_str(&dashboard_json(&app)?))
        })
    }

    #[wasm_bindgen]
    pub fn portal_logout() -> Promise {
        future_to_promise(async move {
            app()?.logout().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Resuelve con "loaded" | "stale" | "session_expired" | "no_session"
    #[wasm_bindgen]
    pub fn portal_refresh() -> Promise {
        future_to_promise(async move {
            let outcome = app()?.refresh().await;
            Ok(JsValue::from_str(outcome_label(&outcome)))
        })
    }

    #[wasm_bindgen]
    pub fn portal_dashboard_json() -> Result<String, JsValue> {
        dashboard_json(&app()?)
    }

    #[wasm_bindgen]
    pub fn portal_navigate(view: &str) -> Result<(), JsValue> {
        let view: View = view.parse().map_err(|e: String| JsValue::from_str(&e))?;
        app()?.navigate(view);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn portal_open_activity(id: i64) -> Result<(), JsValue> {
        app()?.open_activity(id);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn portal_navigation_json() -> Result<String, JsValue> {
        to_json(&app()?.navigation())
    }

    /// `filter_json`: `{"query": "...", "status": "scheduled", "outcome": ""}` ("" = Tutti)
    #[wasm_bindgen]
    pub fn portal_filter_activities(filter_json: &str) -> Result<String, JsValue> {
        let filter: ActivityFilter =
            serde_json::from_str(filter_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let data = app()?.dashboard();
        to_json(&filter.apply(&data.activities))
    }

    /// Relazioni PDF filtradas por código, cliente u operador
    #[wasm_bindgen]
    pub fn portal_filter_reports(query: &str) -> Result<String, JsValue> {
        let data = app()?.dashboard();
        to_json(&filter_reports(&data.reports, query))
    }

    #[wasm_bindgen]
    pub fn portal_filter_options_json() -> Result<String, JsValue> {
        to_json(&serde_json::json!({
            "status": status_filter_options(),
            "outcome": outcome_filter_options(),
        }))
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
        serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

// ============================================================================
// APP - controlador del portal (sesión + loader + navegación)
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::error::PortalError;
use crate::services::{ApiClient, DataLoader, HttpTransport, LoadOutcome};
use crate::state::LoaderSnapshot;
use crate::stores::{SessionPhase, SessionStore};
use crate::utils::storage::KeyValueStorage;
use crate::viewmodels::{DashboardData, NavigationState, View};

/// Aplicación principal
pub struct PortalApp {
    config: AppConfig,
    session: SessionStore,
    loader: DataLoader,
    navigation: RefCell<NavigationState>,
}

impl PortalApp {
    pub fn new(config: AppConfig, transport: Rc<dyn HttpTransport>, storage: Rc<dyn KeyValueStorage>) -> Self {
        let api = ApiClient::new(&config.api_base_url, transport, config.request_timeout());
        let session = SessionStore::new(api.clone(), storage, config.credential_field);
        let loader = DataLoader::new(api, config.resources.clone());

        log::info!(
            "🚀 Portal configurado: {} ({} recursos, demo {})",
            config.api_base_url,
            config.resources.len(),
            if config.demo_fallback { "on" } else { "off" }
        );

        Self {
            config,
            session,
            loader,
            navigation: RefCell::new(NavigationState::default()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    /// Arranque: restaura la sesión persistida y carga si hay token
    pub async fn boot(&self) -> LoadOutcome {
        match self.session.restore() {
            SessionPhase::Tentative | SessionPhase::Authenticated => self.loader.load(&self.session).await,
            _ => {
                self.loader.reset();
                LoadOutcome::NoSession
            }
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoadOutcome, PortalError> {
        // Nada del usuario anterior debe seguir visible, aunque el login falle
        self.loader.reset();
        self.navigation.borrow_mut().reset();
        self.session.login(username, password).await?;
        Ok(self.loader.load(&self.session).await)
    }

    pub async fn logout(&self) {
        self.loader.reset();
        self.navigation.borrow_mut().reset();
        self.session.logout().await;
    }

    pub async fn refresh(&self) -> LoadOutcome {
        self.loader.load(&self.session).await
    }

    /// Datos listos para pintar a partir del último snapshot publicado
    pub fn dashboard(&self) -> DashboardData {
        DashboardData::build(
            &self.loader.snapshot(),
            self.session.notice(),
            self.config.demo_fallback,
        )
    }

    pub fn navigation(&self) -> NavigationState {
        self.navigation.borrow().clone()
    }

    pub fn navigate(&self, view: View) {
        self.navigation.borrow_mut().go(view);
    }

    pub fn open_activity(&self, id: i64) {
        self.navigation.borrow_mut().open_activity(id);
    }

    /// Se llama en cada publicación de snapshot (loading, loaded, reset)
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&Rc<LoaderSnapshot>) + 'static,
    {
        self.loader.state().subscribe(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceKind;
    use crate::services::Method;
    use crate::state::LoadPhase;
    use crate::test_support::{StubReply, StubTransport};
    use crate::utils::constants::TOKEN_STORAGE_KEY;
    use crate::utils::storage::MemoryStorage;
    use serde_json::json;
    use std::cell::Cell;

    fn app(stub: &Rc<StubTransport>, storage: &Rc<MemoryStorage>) -> PortalApp {
        let config = AppConfig::default().with_base_url("https://api.test");
        PortalApp::new(config, stub.clone(), storage.clone())
    }

    fn backend() -> Rc<StubTransport> {
        let stub = Rc::new(StubTransport::new());
        stub.route(
            Method::Post,
            "/api/v1/auth/login",
            StubReply::json(200, json!({"token": "abc123", "user": {"username": "agent1"}})),
        );
        stub.route(Method::Post, "/api/v1/auth/logout", StubReply::text(204, ""));
        stub.route(Method::Get, "/api/v1/auth/me", StubReply::json(200, json!({"user": {"username": "agent1"}})));
        stub.route(
            Method::Get,
            "/api/v1/dashboard/summary",
            StubReply::json(200, json!({"kpis": {"credits_available": 34, "activities_open": 2}})),
        );
        stub.route(Method::Get, "/api/v1/activities", StubReply::json(200, json!({"items": []})));
        stub
    }

    #[tokio::test]
    async fn test_login_then_dashboard() {
        let stub = backend();
        let storage = Rc::new(MemoryStorage::new());
        let app = app(&stub, &storage);
        let published = Rc::new(Cell::new(0));
        let published_cb = published.clone();
        app.subscribe(move |_| published_cb.set(published_cb.get() + 1));

        let outcome = app.login("agent1", "secret").await.unwrap();
        assert!(matches!(outcome, LoadOutcome::Loaded(_)));

        let data = app.dashboard();
        assert_eq!(data.kpis.credits_available, 34);
        assert_eq!(data.kpis.activities_open, 2);
        assert_eq!(data.user.unwrap().username, "agent1");
        assert!(data.api_online);
        // reports / operators / credits no tienen ruta en el stub
        assert_eq!(data.phase, LoadPhase::LoadedWithErrors);
        assert!(data.errors.contains_key(&ResourceKind::Operators));
        // Operadores demo como relleno
        assert_eq!(data.operators.len(), 2);

        assert_eq!(app.session().phase(), SessionPhase::Authenticated);
        // reset + loading + loaded
        assert_eq!(published.get(), 3);
    }

    #[tokio::test]
    async fn test_boot_without_token_loads_nothing() {
        let stub = backend();
        let storage = Rc::new(MemoryStorage::new());
        let app = app(&stub, &storage);

        assert_eq!(app.boot().await, LoadOutcome::NoSession);
        assert!(stub.requests().is_empty());
        assert_eq!(app.dashboard().phase, LoadPhase::Idle);
    }

    #[tokio::test]
    async fn test_boot_with_rejected_token_shows_notice() {
        let stub = Rc::new(StubTransport::new());
        stub.route(Method::Get, "/api/v1/auth/me", StubReply::json(401, json!({"error": "expired"})));
        let storage = Rc::new(MemoryStorage::new());
        storage.set_item(TOKEN_STORAGE_KEY, "old").unwrap();
        let app = app(&stub, &storage);

        assert_eq!(app.boot().await, LoadOutcome::SessionExpired);

        let data = app.dashboard();
        assert_eq!(data.notice.as_deref(), Some("Sessione non valida o scaduta: expired"));
        assert!(!data.api_online);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_logout_resets_everything() {
        let stub = backend();
        let storage = Rc::new(MemoryStorage::new());
        let app = app(&stub, &storage);
        app.login("agent1", "secret").await.unwrap();
        app.open_activity(5001);

        app.logout().await;

        assert_eq!(app.session().phase(), SessionPhase::Anonymous);
        assert_eq!(app.navigation().view, View::Dashboard);
        assert!(app.loader().snapshot().bundle.is_empty());
        assert!(storage.is_empty());
        assert_eq!(stub.count("/api/v1/auth/logout"), 1);
        assert_eq!(app.refresh().await, LoadOutcome::NoSession);
    }

    #[tokio::test]
    async fn test_failed_login_keeps_anonymous() {
        let stub = Rc::new(StubTransport::new());
        stub.route(
            Method::Post,
            "/api/v1/auth/login",
            StubReply::json(401, json!({"message": "Credenziali non valide"})),
        );
        let storage = Rc::new(MemoryStorage::new());
        let app = app(&stub, &storage);

        let err = app.login("agent1", "bad").await.unwrap_err();

        assert_eq!(err, PortalError::Auth("Credenziali non valide".into()));
        assert_eq!(app.session().phase(), SessionPhase::Anonymous);
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_relogin_drops_previous_user_data() {
        let stub = backend();
        stub.route(
            Method::Post,
            "/api/v1/auth/login",
            StubReply::json(401, json!({"message": "Credenziali non valide"})),
        );
        let storage = Rc::new(MemoryStorage::new());
        let app = app(&stub, &storage);
        app.login("agent1", "secret").await.unwrap();
        app.navigate(View::Operators);
        assert!(!app.loader().snapshot().bundle.is_empty());

        let err = app.login("agent2", "wrong").await.unwrap_err();

        assert_eq!(err, PortalError::Auth("Credenziali non valide".into()));
        assert_eq!(app.session().phase(), SessionPhase::Anonymous);
        assert!(storage.is_empty());
        assert!(app.loader().snapshot().bundle.is_empty());
        assert_eq!(app.navigation().view, View::Dashboard);
        let data = app.dashboard();
        assert!(data.user.is_none());
        assert_eq!(data.phase, LoadPhase::Idle);
        assert_eq!(app.refresh().await, LoadOutcome::NoSession);
    }
}

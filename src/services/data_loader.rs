// ============================================================================
// LOADER DE DATOS PROTEGIDOS
// ============================================================================
// - todas las peticiones se lanzan antes de esperar ninguna (join_all)
// - cada recurso falla por su cuenta, sin cancelar a los demás
// - un ciclo superado por otro más nuevo se descarta al llegar
// - el snapshot se publica entero (swap de Rc) cuando todo ha terminado
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use futures::future::join_all;

use crate::error::PortalError;
use crate::models::{ErrorMap, ResourceBundle, ResourceKind, ResourcePayload};
use crate::services::ApiClient;
use crate::state::{LoadPhase, LoaderSnapshot, ReactiveState};
use crate::stores::SessionStore;

/// Cómo terminó una llamada a `load`
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No hay token: estado reseteado a idle
    NoSession,
    /// Otro ciclo empezó mientras tanto; resultados descartados
    Stale,
    /// 401 en algún recurso: sesión expirada, nada publicado
    SessionExpired,
    Loaded(Rc<LoaderSnapshot>),
}

pub struct DataLoader {
    api: ApiClient,
    resources: Vec<ResourceKind>,
    cycle: Cell<u64>,
    state: ReactiveState<Rc<LoaderSnapshot>>,
}

impl DataLoader {
    pub fn new(api: ApiClient, resources: Vec<ResourceKind>) -> Self {
        Self {
            api,
            resources,
            cycle: Cell::new(0),
            state: ReactiveState::new(Rc::new(LoaderSnapshot::idle())),
        }
    }

    pub fn resources(&self) -> &[ResourceKind] {
        &self.resources
    }

    /// Celda reactiva compartida (para suscribirse a publicaciones)
    pub fn state(&self) -> ReactiveState<Rc<LoaderSnapshot>> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> Rc<LoaderSnapshot> {
        self.state.get()
    }

    pub fn current_cycle(&self) -> u64 {
        self.cycle.get()
    }

    /// Invalida cualquier ciclo en vuelo y vuelve a idle (logout)
    pub fn reset(&self) {
        self.cycle.set(self.cycle.get() + 1);
        self.state.set(Rc::new(LoaderSnapshot::idle()));
    }

    /// Un ciclo completo de carga
    pub async fn load(&self, session: &SessionStore) -> LoadOutcome {
        let Some(token) = session.active_token() else {
            log::info!("🔓 Sin sesión: loader a idle");
            self.reset();
            return LoadOutcome::NoSession;
        };

        let cycle = self.cycle.get() + 1;
        self.cycle.set(cycle);

        // Mientras carga se sigue mostrando el último bundle
        let previous = self.snapshot();
        self.state.set(Rc::new(LoaderSnapshot {
            phase: LoadPhase::Loading,
            cycle: previous.cycle,
            bundle: previous.bundle.clone(),
            errors: previous.errors.clone(),
        }));

        log::info!(
            "📦 Ciclo {}: cargando {} recursos",
            cycle,
            self.resources.len()
        );

        let api = &self.api;
        let token = token.as_str();
        let requests = self
            .resources
            .iter()
            .map(|&kind| async move { (kind, api.resource(kind, token).await) });
        let results = join_all(requests).await;

        if self.cycle.get() != cycle {
            log::info!(
                "🗑️ Ciclo {} descartado (actual: {})",
                cycle,
                self.cycle.get()
            );
            return LoadOutcome::Stale;
        }

        let rejection = results.iter().find_map(|(kind, result)| match result {
            Err(e) if e.is_auth_rejection() => Some((*kind, e.to_string())),
            _ => None,
        });
        if let Some((kind, reason)) = rejection {
            log::warn!("🔒 401 en {}: sesión expirada", kind);
            session.expire(&reason);
            self.state.set(Rc::new(LoaderSnapshot::idle()));
            return LoadOutcome::SessionExpired;
        }

        let mut bundle = ResourceBundle::default();
        let mut errors = ErrorMap::new();
        for (kind, result) in results {
            let decoded = result
                .map_err(|e| e.to_string())
                .and_then(|value| ResourcePayload::decode(kind, value));
            match decoded {
                Ok(payload) => bundle.insert(payload),
                Err(message) => {
                    log::warn!("⚠️ Recurso no disponible: {}", PortalError::resource(kind, &message));
                    errors.insert(kind, message);
                }
            }
        }

        // Cualquier respuesta 2xx demuestra que el token vale
        if !bundle.is_empty() {
            session.confirm(bundle.identity.clone());
        }

        let phase = if errors.is_empty() {
            LoadPhase::Loaded
        } else {
            LoadPhase::LoadedWithErrors
        };
        log::info!(
            "✅ Ciclo {} terminado: {} ok, {} con error",
            cycle,
            bundle.loaded().len(),
            errors.len()
        );

        let snapshot = Rc::new(LoaderSnapshot {
            phase,
            cycle,
            bundle: Rc::new(bundle),
            errors,
        });
        self.state.set(snapshot.clone());
        LoadOutcome::Loaded(snapshot)
    }
}

// ============================================================================
// DASHBOARD STATE - snapshot publicado por el loader
// ============================================================================

use std::rc::Rc;

use serde::Serialize;

use crate::error::PortalError;
use crate::models::{ErrorMap, ResourceBundle};

/// idle → loading → {loaded | loaded_with_errors}, re-entrable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    LoadedWithErrors,
}

/// Lo que la UI puede ver en un instante dado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderSnapshot {
    pub phase: LoadPhase,
    /// Ciclo que produjo `bundle`/`errors` (0 = ninguno)
    pub cycle: u64,
    pub bundle: Rc<ResourceBundle>,
    pub errors: ErrorMap,
}

impl LoaderSnapshot {
    pub fn idle() -> Self {
        Self {
            phase: LoadPhase::Idle,
            cycle: 0,
            bundle: Rc::new(ResourceBundle::default()),
            errors: ErrorMap::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.phase, LoadPhase::Loaded | LoadPhase::LoadedWithErrors)
    }

    /// Fallos del ciclo como errores tipados, en orden de recurso
    pub fn failures(&self) -> Vec<PortalError> {
        self.errors
            .iter()
            .map(|(kind, message)| PortalError::resource(*kind, message.as_str()))
            .collect()
    }
}

impl Default for LoaderSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DashboardSummary, ResourceKind};
    use serde_json::json;

    #[test]
    fn test_snapshot_serializes_shared_bundle() {
        let bundle = ResourceBundle {
            summary: Some(DashboardSummary::default()),
            ..Default::default()
        };
        let mut errors = ErrorMap::new();
        errors.insert(ResourceKind::Operators, "HTTP 404".into());
        let snapshot = LoaderSnapshot {
            phase: LoadPhase::LoadedWithErrors,
            cycle: 3,
            bundle: Rc::new(bundle),
            errors,
        };

        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["phase"], json!("loaded_with_errors"));
        assert_eq!(value["cycle"], json!(3));
        assert_eq!(value["bundle"]["summary"]["kpis"], json!({}));
        assert_eq!(value["bundle"]["activities"], json!(null));
        assert_eq!(value["errors"]["operators"], json!("HTTP 404"));
    }
}

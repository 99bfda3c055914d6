// ============================================================================
// ETIQUETAS (it-IT) - el portal de agencia solo está en italiano
// ============================================================================

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ActivityStatus, OperatorStatus, Outcome};
use crate::utils::format::EMPTY_VALUE;

/// Diccionario de etiquetas de estado
fn get_status_labels() -> HashMap<&'static str, &'static str> {
    let mut labels = HashMap::new();

    // Actividades
    labels.insert("scheduled", "Programmata");
    labels.insert("in_progress", "In corso");
    labels.insert("completed", "Completata");
    labels.insert("report_available", "Report disponibile");
    labels.insert("closed", "Chiusa");

    // Operadores
    labels.insert("active", "Attivo");
    labels.insert("inactive", "Non attivo");
    labels.insert("invited", "Invitato");

    // Reports
    labels.insert("generated", "Generato");
    labels.insert("updated", "Aggiornato");

    labels
}

fn get_outcome_labels() -> HashMap<&'static str, &'static str> {
    let mut labels = HashMap::new();
    labels.insert("compatible", "Compatibile");
    labels.insert("not_compatible", "Non compatibile");
    labels.insert("to_review", "Da approfondire");
    labels.insert("na", "N/D");
    labels
}

/// Etiqueta de un estado crudo; desconocido → el propio valor, vacío → "—"
pub fn status_label(status: &str) -> String {
    if status.is_empty() {
        return EMPTY_VALUE.to_string();
    }
    get_status_labels()
        .get(status)
        .map(|s| s.to_string())
        .unwrap_or_else(|| status.to_string())
}

pub fn outcome_label(outcome: &str) -> String {
    if outcome.is_empty() {
        return EMPTY_VALUE.to_string();
    }
    get_outcome_labels()
        .get(outcome)
        .map(|s| s.to_string())
        .unwrap_or_else(|| outcome.to_string())
}

impl ActivityStatus {
    pub fn label(&self) -> String {
        status_label(self.as_str())
    }
}

impl OperatorStatus {
    pub fn label(&self) -> String {
        status_label(self.as_str())
    }
}

impl Outcome {
    pub fn label(&self) -> String {
        outcome_label(self.as_str())
    }
}

/// Tono del badge que acompaña a un estado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Default,
    Ok,
    Warn,
    Danger,
}

pub fn status_badge(status: &str) -> BadgeKind {
    match status {
        "active" | "report_available" | "generated" | "updated" => BadgeKind::Ok,
        "completed" | "to_review" | "invited" => BadgeKind::Warn,
        "inactive" => BadgeKind::Danger,
        _ => BadgeKind::Default,
    }
}

pub fn outcome_badge(outcome: Outcome) -> BadgeKind {
    match outcome {
        Outcome::Compatible => BadgeKind::Ok,
        Outcome::ToReview => BadgeKind::Warn,
        Outcome::NotCompatible => BadgeKind::Danger,
        Outcome::Na => BadgeKind::Default,
    }
}

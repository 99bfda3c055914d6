use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// ACTIVIDADES DE INSPECCIÓN
// ============================================================================

/// Ciclo de vida de una actividad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Scheduled,
    InProgress,
    Completed,
    ReportAvailable,
    Closed,
    /// Valor que el backend envía y que aún no conocemos
    #[default]
    #[serde(other)]
    Unknown,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Scheduled => "scheduled",
            ActivityStatus::InProgress => "in_progress",
            ActivityStatus::Completed => "completed",
            ActivityStatus::ReportAvailable => "report_available",
            ActivityStatus::Closed => "closed",
            ActivityStatus::Unknown => "unknown",
        }
    }

    /// Actividad todavía abierta (ni cerrada ni con report)
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ActivityStatus::Scheduled | ActivityStatus::InProgress | ActivityStatus::Completed
        )
    }
}

/// Resultado de la inspección
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Compatible,
    NotCompatible,
    ToReview,
    #[default]
    #[serde(other)]
    Na,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Compatible => "compatible",
            Outcome::NotCompatible => "not_compatible",
            Outcome::ToReview => "to_review",
            Outcome::Na => "na",
        }
    }
}

/// Report PDF asociado a una actividad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ActivityReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// "generated" | "updated"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// Síntesis de la prueba instrumental
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TestSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument_serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_power_kw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_power_kw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Evento del historial de la actividad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub at: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    #[serde(default)]
    pub public_code: Option<String>,
    #[serde(default)]
    pub customer_reference_name: Option<String>,
    #[serde(default)]
    pub customer_reference_code: Option<String>,
    #[serde(default)]
    pub site_city: Option<String>,
    #[serde(default)]
    pub site_address: Option<String>,
    #[serde(default)]
    pub assigned_user_id: Option<i64>,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub status: ActivityStatus,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub outcome: Outcome,
    #[serde(default)]
    pub activity_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub report_available: Option<bool>,

    // Subestructuras anidadas: el backend todavía no siempre las expone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ActivityReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_summary: Option<TestSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<ActivityEvent>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    /// Actividad mínima (usada por los datos demo y los tests)
    pub fn new(id: i64, public_code: &str, status: ActivityStatus) -> Self {
        Self {
            id,
            public_code: Some(public_code.to_string()),
            customer_reference_name: None,
            customer_reference_code: None,
            site_city: None,
            site_address: None,
            assigned_user_id: None,
            operator_name: None,
            status,
            outcome: Outcome::Na,
            activity_at: None,
            created_at: None,
            report_available: None,
            report: None,
            test_summary: None,
            notes: None,
            events: None,
            extra: Map::new(),
        }
    }

    /// `report_available` efectivo: booleano explícito o derivado del status
    pub fn has_report_available(&self) -> bool {
        self.report_available
            .unwrap_or(self.status == ActivityStatus::ReportAvailable)
    }

    /// Texto sobre el que se hace la búsqueda libre
    pub fn search_pool(&self) -> String {
        [
            self.customer_reference_name.as_deref(),
            self.customer_reference_code.as_deref(),
            self.public_code.as_deref(),
            self.site_city.as_deref(),
            self.operator_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

use serde::{Deserialize, Serialize};

use crate::models::activity::{ActivityStatus, Outcome};

/// Fila de la vista "Relazioni PDF".
///
/// Normalmente derivada de las actividades con report; si el backend expone
/// `/api/v1/reports` se deserializa directamente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: i64,
    #[serde(default)]
    pub activity_id: Option<i64>,
    #[serde(default)]
    pub public_code: Option<String>,
    #[serde(default)]
    pub customer_reference_name: Option<String>,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub status: ActivityStatus,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub outcome: Outcome,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub report_status: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
}

impl ReportRow {
    /// Búsqueda por código, cliente u operador
    pub fn matches(&self, query: &str) -> bool {
        let pool = [
            self.public_code.as_deref(),
            self.customer_reference_name.as_deref(),
            self.operator_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
        pool.contains(&query.trim().to_lowercase())
    }
}

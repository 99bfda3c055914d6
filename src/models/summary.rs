use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Respuesta de `GET /api/v1/dashboard/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DashboardSummary {
    #[serde(default)]
    pub kpis: BTreeMap<String, Value>,
    #[serde(default)]
    pub generated_at: Option<String>,
}

impl DashboardSummary {
    /// Lee un KPI numérico; acepta números y strings numéricos como el backend
    pub fn kpi(&self, name: &str) -> Option<i64> {
        match self.kpis.get(name)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kpi_accepts_numbers_and_numeric_strings() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "kpis": {
                "credits_available": 34,
                "activities_open": "5",
                "reports_available": 2.0,
                "operators_active": null
            }
        }))
        .unwrap();

        assert_eq!(summary.kpi("credits_available"), Some(34));
        assert_eq!(summary.kpi("activities_open"), Some(5));
        assert_eq!(summary.kpi("reports_available"), Some(2));
        assert_eq!(summary.kpi("operators_active"), None);
        assert_eq!(summary.kpi("missing"), None);
    }
}

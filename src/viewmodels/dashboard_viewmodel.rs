// ============================================================================
// DASHBOARD VIEWMODEL - lo que la UI pinta a partir de un snapshot
// ============================================================================
// Funciones puras: snapshot del loader (+ aviso de sesión) → DashboardData.
// Con demo_fallback activo los huecos del backend se rellenan con el
// dataset demo; sin él, lo que no llegó queda vacío.
// ============================================================================

use serde::de::value::StringDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::demo::{demo_activities, demo_agency, demo_credit_movements, demo_operators};
use crate::models::{
    Activity, ActivityStatus, Agency, CreditMovement, DashboardSummary, ErrorMap, Operator,
    Outcome, ReportRow, ResourceKind, UserIdentity,
};
use crate::services::demo_merge::{
    derive_reports, merge_activities, movements_or_demo, normalize_activity, operators_or_demo,
};
use crate::state::{LoadPhase, LoaderSnapshot};
use crate::utils::format::parse_timestamp;
use crate::utils::i18n::{outcome_badge, status_badge, BadgeKind};

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DashboardKpis {
    pub credits_available: i64,
    pub activities_open: i64,
    pub reports_available: i64,
    pub operators_active: i64,
    pub activities_total_loaded: usize,
    pub latest_activity_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct CreditOverview {
    pub total: i64,
    /// Suma de los saldos asignados a operadores
    pub assigned: i64,
    pub movements: Vec<CreditMovement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub phase: LoadPhase,
    pub user: Option<UserIdentity>,
    pub agency: Option<Agency>,
    pub summary: Option<DashboardSummary>,
    pub kpis: DashboardKpis,
    pub activities: Vec<Activity>,
    pub reports: Vec<ReportRow>,
    pub operators: Vec<Operator>,
    pub credits: CreditOverview,
    pub errors: ErrorMap,
    /// Al menos un recurso respondió en el último ciclo
    pub api_online: bool,
    pub notice: Option<String>,
}

impl DashboardData {
    pub fn build(snapshot: &LoaderSnapshot, notice: Option<String>, demo_fallback: bool) -> Self {
        let bundle = &snapshot.bundle;
        let summary = bundle.summary.clone();
        let generated_at = summary.as_ref().and_then(|s| s.generated_at.as_deref());

        let activities = if demo_fallback {
            merge_activities(
                bundle.activities.as_deref().unwrap_or_default(),
                &demo_activities(),
                generated_at,
            )
        } else {
            let mut list = bundle.activities.clone().unwrap_or_default();
            for activity in list.iter_mut() {
                normalize_activity(activity, generated_at);
            }
            list
        };

        let reports = match bundle.reports {
            Some(ref rows) => rows.clone(),
            None => derive_reports(&activities),
        };

        let operators = if demo_fallback {
            operators_or_demo(bundle.operators.as_deref(), &demo_operators())
        } else {
            bundle.operators.clone().unwrap_or_default()
        };

        let api_movements = bundle
            .credits
            .as_ref()
            .filter(|c| !c.movements.is_empty())
            .map(|c| c.movements.as_slice());
        let movements = if demo_fallback {
            movements_or_demo(api_movements, &demo_credit_movements())
        } else {
            movements_or_demo(api_movements, &[])
        };

        let kpis = compute_kpis(snapshot, &activities, &operators, demo_fallback);
        let credits = CreditOverview {
            total: kpis.credits_available,
            assigned: operators.iter().map(|o| o.credits_balance).sum(),
            movements,
        };

        Self {
            phase: snapshot.phase,
            user: bundle.identity.clone(),
            agency: demo_fallback.then(demo_agency),
            summary,
            kpis,
            activities,
            reports,
            operators,
            credits,
            errors: snapshot.errors.clone(),
            api_online: !bundle.is_empty(),
            notice,
        }
    }

    /// Banner de errores parciales: "Summary non disponibile: ... ."
    pub fn error_banner(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(kind, message)| format!("{} non disponibile: {}.", resource_label(*kind), message))
            .collect();
        Some(parts.join(" "))
    }

    /// Últimas `limit` actividades, de la más reciente a la más antigua
    pub fn recent_activities(&self, limit: usize) -> Vec<&Activity> {
        let mut list: Vec<&Activity> = self.activities.iter().collect();
        list.sort_by_key(|a| std::cmp::Reverse(a.activity_at.as_deref().and_then(parse_timestamp)));
        list.truncate(limit);
        list
    }

    pub fn find_activity(&self, id: i64) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }
}

fn resource_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Identity => "Profilo",
        ResourceKind::Summary => "Summary",
        ResourceKind::Activities => "Attività",
        ResourceKind::Reports => "Relazioni",
        ResourceKind::Operators => "Operatori",
        ResourceKind::Credits => "Crediti",
    }
}

fn compute_kpis(
    snapshot: &LoaderSnapshot,
    activities: &[Activity],
    operators: &[Operator],
    demo_fallback: bool,
) -> DashboardKpis {
    let bundle = &snapshot.bundle;
    let summary = bundle.summary.as_ref();
    let kpi = |name: &str| summary.and_then(|s| s.kpi(name));

    let credits_balance = bundle.credits.as_ref().and_then(|c| {
        c.balance("credits_available")
            .or_else(|| c.balance("available"))
            .map(|f| f.round() as i64)
    });
    let credits_available = kpi("credits_available")
        .or(credits_balance)
        .unwrap_or(if demo_fallback {
            demo_agency().credits_available
        } else {
            0
        });

    let operators_active = kpi("operators_active")
        .unwrap_or_else(|| operators.iter().filter(|o| o.is_active()).count() as i64);

    let latest_activity_at = activities
        .iter()
        .filter_map(|a| {
            let raw = a.activity_at.as_deref()?;
            Some((parse_timestamp(raw)?, raw))
        })
        .max_by_key(|(ts, _)| *ts)
        .map(|(_, raw)| raw.to_string())
        .or_else(|| summary.and_then(|s| s.generated_at.clone()));

    DashboardKpis {
        credits_available,
        activities_open: kpi("activities_open").unwrap_or(0),
        reports_available: kpi("reports_available").unwrap_or(0),
        operators_active,
        activities_total_loaded: activities.len(),
        latest_activity_at,
    }
}

// ============================================================================
// FILTROS
// ============================================================================

/// Filtro de la vista Attività (`None` = "tutti")
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ActivityFilter {
    #[serde(default)]
    pub query: String,
    #[serde(default, deserialize_with = "choice_or_all")]
    pub status: Option<ActivityStatus>,
    #[serde(default, deserialize_with = "choice_or_all")]
    pub outcome: Option<Outcome>,
}

/// `null`, `""` (opción "Tutti") y `"all"` no filtran
fn choice_or_all<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    let choice: StringDeserializer<D::Error> = value.to_string().into_deserializer();
    T::deserialize(choice).map(Some)
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        let query = self.query.trim().to_lowercase();
        let query_ok = query.is_empty() || activity.search_pool().contains(&query);
        let status_ok = self.status.map_or(true, |s| activity.status == s);
        let outcome_ok = self.outcome.map_or(true, |o| activity.outcome == o);
        query_ok && status_ok && outcome_ok
    }

    pub fn apply<'a>(&self, activities: &'a [Activity]) -> Vec<&'a Activity> {
        activities.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Opción de un desplegable de filtro (`value` vacío = "Tutti")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub badge: BadgeKind,
}

impl FilterOption {
    fn all() -> Self {
        Self {
            value: String::new(),
            label: "Tutti".to_string(),
            badge: BadgeKind::Default,
        }
    }
}

pub fn status_filter_options() -> Vec<FilterOption> {
    let statuses = [
        ActivityStatus::Scheduled,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
        ActivityStatus::ReportAvailable,
        ActivityStatus::Closed,
    ];
    std::iter::once(FilterOption::all())
        .chain(statuses.into_iter().map(|s| FilterOption {
            value: s.as_str().to_string(),
            label: s.label(),
            badge: status_badge(s.as_str()),
        }))
        .collect()
}

pub fn outcome_filter_options() -> Vec<FilterOption> {
    let outcomes = [Outcome::Compatible, Outcome::NotCompatible, Outcome::ToReview];
    std::iter::once(FilterOption::all())
        .chain(outcomes.into_iter().map(|o| FilterOption {
            value: o.as_str().to_string(),
            label: o.label(),
            badge: outcome_badge(o),
        }))
        .collect()
}

pub fn filter_reports<'a>(reports: &'a [ReportRow], query: &str) -> Vec<&'a ReportRow> {
    reports.iter().filter(|r| r.matches(query)).collect()
}

pub fn filter_operators<'a>(operators: &'a [Operator], query: &str) -> Vec<&'a Operator> {
    operators.iter().filter(|o| o.matches(query)).collect()
}

/// Actividades asignadas a un operador
pub fn activities_for_operator(activities: &[Activity], operator_id: i64) -> Vec<&Activity> {
    activities
        .iter()
        .filter(|a| a.assigned_user_id == Some(operator_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreditBalances, ResourceBundle};
    use serde_json::json;
    use std::rc::Rc;

    fn snapshot(bundle: ResourceBundle, errors: ErrorMap) -> LoaderSnapshot {
        let phase = if errors.is_empty() {
            LoadPhase::Loaded
        } else {
            LoadPhase::LoadedWithErrors
        };
        LoaderSnapshot {
            phase,
            cycle: 1,
            bundle: Rc::new(bundle),
            errors,
        }
    }

    fn summary(kpis: serde_json::Value) -> DashboardSummary {
        serde_json::from_value(json!({ "kpis": kpis, "generated_at": "2026-02-24T07:00:00" })).unwrap()
    }

    #[test]
    fn test_summary_kpis_win() {
        let bundle = ResourceBundle {
            summary: Some(summary(json!({
                "credits_available": 12,
                "activities_open": 3,
                "reports_available": "2",
                "operators_active": 5
            }))),
            ..Default::default()
        };

        let data = DashboardData::build(&snapshot(bundle, ErrorMap::new()), None, true);

        assert_eq!(data.kpis.credits_available, 12);
        assert_eq!(data.kpis.activities_open, 3);
        assert_eq!(data.kpis.reports_available, 2);
        assert_eq!(data.kpis.operators_active, 5);
        assert_eq!(data.credits.total, 12);
        assert!(data.api_online);
    }

    #[test]
    fn test_kpi_fallbacks_with_demo() {
        let data = DashboardData::build(&snapshot(ResourceBundle::default(), ErrorMap::new()), None, true);

        assert_eq!(data.kpis.credits_available, 34);
        assert_eq!(data.kpis.activities_open, 0);
        assert_eq!(data.kpis.reports_available, 0);
        // Los dos operadores demo están activos
        assert_eq!(data.kpis.operators_active, 2);
        assert_eq!(data.kpis.activities_total_loaded, 4);
        assert_eq!(data.credits.assigned, 10);
        assert_eq!(data.credits.movements[0].id, 10010);
        assert!(!data.api_online);
        assert!(data.agency.is_some());
    }

    #[test]
    fn test_without_demo_nothing_is_invented() {
        let data = DashboardData::build(&snapshot(ResourceBundle::default(), ErrorMap::new()), None, false);

        assert_eq!(data.kpis.credits_available, 0);
        assert_eq!(data.kpis.operators_active, 0);
        assert!(data.activities.is_empty());
        assert!(data.reports.is_empty());
        assert!(data.operators.is_empty());
        assert!(data.credits.movements.is_empty());
        assert!(data.agency.is_none());
    }

    #[test]
    fn test_credits_endpoint_balance_before_demo_value() {
        let bundle = ResourceBundle {
            credits: Some(CreditBalances::from_value(json!({"available": 20})).unwrap()),
            ..Default::default()
        };

        let data = DashboardData::build(&snapshot(bundle, ErrorMap::new()), None, true);

        assert_eq!(data.kpis.credits_available, 20);
    }

    #[test]
    fn test_reports_endpoint_rows_replace_derived_ones() {
        let row: ReportRow = serde_json::from_value(json!({"id": 1, "public_code": "R-1"})).unwrap();
        let bundle = ResourceBundle {
            reports: Some(vec![row.clone()]),
            ..Default::default()
        };

        let with_endpoint = DashboardData::build(&snapshot(bundle, ErrorMap::new()), None, true);
        let derived = DashboardData::build(&snapshot(ResourceBundle::default(), ErrorMap::new()), None, true);

        assert_eq!(with_endpoint.reports, vec![row]);
        assert_eq!(derived.reports.len(), 1);
        assert_eq!(derived.reports[0].id, 9001);
    }

    #[test]
    fn test_latest_activity_and_error_banner() {
        let mut a = Activity::new(1, "A-1", ActivityStatus::Scheduled);
        a.activity_at = Some("2026-02-20T10:00:00".into());
        let mut b = Activity::new(2, "A-2", ActivityStatus::Scheduled);
        b.activity_at = Some("2026-02-22T09:00:00".into());
        let bundle = ResourceBundle {
            activities: Some(vec![a, b]),
            ..Default::default()
        };
        let mut errors = ErrorMap::new();
        errors.insert(ResourceKind::Summary, "db down".into());

        let data = DashboardData::build(&snapshot(bundle, errors), None, false);

        assert_eq!(data.phase, LoadPhase::LoadedWithErrors);
        assert_eq!(data.kpis.latest_activity_at.as_deref(), Some("2026-02-22T09:00:00"));
        assert_eq!(data.recent_activities(1)[0].id, 2);
        assert_eq!(data.error_banner().as_deref(), Some("Summary non disponibile: db down."));
    }

    #[test]
    fn test_activity_filter() {
        let activities = merge_activities(&[], &demo_activities(), None);

        let by_city = ActivityFilter {
            query: "MILANO".into(),
            ..Default::default()
        };
        assert!(!by_city.apply(&activities).is_empty());

        let by_status = ActivityFilter {
            status: Some(ActivityStatus::ReportAvailable),
            ..Default::default()
        };
        let found = by_status.apply(&activities);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 5001);

        let mismatch = ActivityFilter {
            query: "ATT-2026-0001".into(),
            outcome: Some(Outcome::NotCompatible),
            ..Default::default()
        };
        assert!(mismatch.apply(&activities).is_empty());
    }

    #[test]
    fn test_filter_options_are_labelled() {
        let statuses = status_filter_options();
        assert_eq!(statuses[0].label, "Tutti");
        let report = statuses.iter().find(|o| o.value == "report_available").unwrap();
        assert_eq!(report.label, "Report disponibile");
        assert_eq!(report.badge, BadgeKind::Ok);

        let outcomes = outcome_filter_options();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[2].label, "Non compatibile");
    }

    #[test]
    fn test_operator_filters() {
        let operators = demo_operators();
        let activities = merge_activities(&[], &demo_activities(), None);

        assert_eq!(filter_operators(&operators, "giulia")[0].id, 2004);
        assert_eq!(filter_operators(&operators, "").len(), 2);
        assert!(activities_for_operator(&activities, 2003)
            .iter()
            .all(|a| a.assigned_user_id == Some(2003)));
    }

    #[test]
    fn test_every_filter_option_feeds_back_into_activity_filter() {
        let activities = merge_activities(&[], &demo_activities(), None);

        for option in status_filter_options() {
            let filter: ActivityFilter =
                serde_json::from_value(json!({"status": option.value})).unwrap();
            let found = filter.apply(&activities);
            if option.value.is_empty() {
                assert_eq!(filter.status, None);
                assert_eq!(found.len(), 4);
            } else {
                assert_eq!(filter.status.map(|s| s.as_str()), Some(option.value.as_str()));
                assert!(found.iter().all(|a| a.status.as_str() == option.value));
            }
        }

        for option in outcome_filter_options() {
            let filter: ActivityFilter =
                serde_json::from_value(json!({"outcome": option.value})).unwrap();
            if option.value.is_empty() {
                assert_eq!(filter.outcome, None);
                assert_eq!(filter.apply(&activities).len(), 4);
            } else {
                assert_eq!(filter.outcome.map(|o| o.as_str()), Some(option.value.as_str()));
                assert_eq!(filter.apply(&activities).len(), 1);
            }
        }

        let tutti: ActivityFilter =
            serde_json::from_value(json!({"query": "", "status": "all", "outcome": null})).unwrap();
        assert_eq!(tutti, ActivityFilter::default());
    }

    #[test]
    fn test_report_filter_by_code_customer_and_operator() {
        let reports: Vec<ReportRow> = serde_json::from_value(json!([
            {"id": 1, "public_code": "ATT-2026-0001", "customer_reference_name": "Condominio Aurora", "operator_name": "Luca Bianchi"},
            {"id": 2, "public_code": "ATT-2026-0002", "customer_reference_name": "Panificio Brambilla", "operator_name": "Giulia Verdi"},
            {"id": 3, "public_code": "ATT-2026-0003"}
        ]))
        .unwrap();

        assert_eq!(filter_reports(&reports, "").len(), 3);
        assert_eq!(filter_reports(&reports, " att-2026 ").len(), 3);
        assert_eq!(filter_reports(&reports, "aurora")[0].id, 1);
        assert_eq!(filter_reports(&reports, "GIULIA")[0].id, 2);
        assert!(filter_reports(&reports, "torino").is_empty());
    }
}

// ============================================================================
// MERGE DEMO / FALLBACK - funciones puras, sin red
// ============================================================================
// Reglas de precedencia:
// - escalares de primer nivel: manda siempre la API
// - test_summary / report / notes / events: demo solo si la API no los trae
// - demo sin contraparte en la API: al final, en orden demo
// ============================================================================

use std::collections::HashSet;

use crate::models::{Activity, CreditMovement, Operator, ReportRow};
use crate::models::credit::sort_movements_desc;

/// Campos derivados de una actividad (recalculados en cada merge)
pub fn normalize_activity(activity: &mut Activity, generated_at: Option<&str>) {
    if activity.activity_at.is_none() {
        activity.activity_at = activity
            .created_at
            .clone()
            .or_else(|| generated_at.map(str::to_string));
    }
    activity.report_available = Some(activity.has_report_available());
}

fn find_demo<'a>(api: &Activity, demo: &'a [Activity]) -> Option<(usize, &'a Activity)> {
    demo.iter()
        .enumerate()
        .find(|(_, d)| d.id == api.id)
        .or_else(|| {
            let code = api.public_code.as_deref().filter(|c| !c.is_empty())?;
            demo.iter()
                .enumerate()
                .find(|(_, d)| d.public_code.as_deref() == Some(code))
        })
}

/// Superpone el dataset demo sobre las actividades de la API.
///
/// Idempotente: `merge(merge(a, d), d) == merge(a, d)`.
pub fn merge_activities(api: &[Activity], demo: &[Activity], generated_at: Option<&str>) -> Vec<Activity> {
    let mut matched = HashSet::new();
    let mut merged = Vec::with_capacity(api.len() + demo.len());

    for source in api {
        let mut record = source.clone();
        if let Some((idx, fallback)) = find_demo(source, demo) {
            matched.insert(idx);
            if record.test_summary.is_none() {
                record.test_summary = fallback.test_summary.clone();
            }
            if record.report.is_none() {
                record.report = fallback.report.clone();
            }
            if record.notes.is_none() {
                record.notes = fallback.notes.clone();
            }
            if record.events.is_none() {
                record.events = fallback.events.clone();
            }
        }
        normalize_activity(&mut record, generated_at);
        merged.push(record);
    }

    for (idx, fallback) in demo.iter().enumerate() {
        if matched.contains(&idx) {
            continue;
        }
        let mut record = fallback.clone();
        normalize_activity(&mut record, generated_at);
        merged.push(record);
    }

    merged
}

/// Vista "Reports": actividades con report presente, nunca almacenada aparte
pub fn derive_reports(activities: &[Activity]) -> Vec<ReportRow> {
    activities
        .iter()
        .filter_map(|activity| {
            let report = activity.report.as_ref()?;
            Some(ReportRow {
                id: report.id.unwrap_or(activity.id),
                activity_id: Some(activity.id),
                public_code: activity.public_code.clone(),
                customer_reference_name: activity.customer_reference_name.clone(),
                operator_name: activity.operator_name.clone(),
                status: activity.status,
                outcome: activity.outcome,
                file_name: report.file_name.clone(),
                generated_at: report
                    .generated_at
                    .clone()
                    .or_else(|| activity.activity_at.clone()),
                report_status: report.status.clone(),
                download_url: report.download_url.clone(),
                version: report.version,
            })
        })
        .collect()
}

/// Operadores de la API si se cargaron; si no, los demo
pub fn operators_or_demo(api: Option<&[Operator]>, demo: &[Operator]) -> Vec<Operator> {
    match api {
        Some(list) => list.to_vec(),
        None => demo.to_vec(),
    }
}

/// Movimientos de la API si se cargaron; si no, los demo. Siempre del más reciente al más antiguo.
pub fn movements_or_demo(api: Option<&[CreditMovement]>, demo: &[CreditMovement]) -> Vec<CreditMovement> {
    let mut list = match api {
        Some(list) => list.to_vec(),
        None => demo.to_vec(),
    };
    sort_movements_desc(&mut list);
    list
}

// ============================================================================
// DATOS DEMO - relleno mientras el backend no expone todos los endpoints
// ============================================================================

use serde::Serialize;

use crate::models::activity::{
    Activity, ActivityEvent, ActivityReport, ActivityStatus, Outcome, TestSummary,
};
use crate::models::credit::{CreditMovement, Direction};
use crate::models::operator::{Instrument, Operator, OperatorStatus};

/// Datos de la agencia para la vista de branding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agency {
    pub name: String,
    pub user: String,
    pub role: String,
    pub credits_available: i64,
}

pub fn demo_agency() -> Agency {
    Agency {
        name: "Agenzia Energia Milano Centro".to_string(),
        user: "Responsabile Agenzia".to_string(),
        role: "Responsabile Agenzia".to_string(),
        credits_available: 34,
    }
}

#[allow(clippy::too_many_arguments)]
fn operator(
    id: i64,
    first_name: &str,
    last_name: &str,
    credits_balance: i64,
    activities_count_30d: u32,
    last_login_at: &str,
    phone: &str,
    serial: &str,
) -> Operator {
    Operator {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!(
            "{}.{}@agenzia-milano-demo.it",
            &first_name[..1].to_lowercase(),
            last_name.to_lowercase()
        ),
        status: OperatorStatus::Active,
        credits_balance,
        activities_count_30d,
        last_login_at: Some(last_login_at.to_string()),
        phone: Some(phone.to_string()),
        instrument: Some(Instrument {
            serial_number: serial.to_string(),
        }),
    }
}

pub fn demo_operators() -> Vec<Operator> {
    vec![
        operator(2003, "Luca", "Bianchi", 7, 12, "2026-02-23T08:55:00", "+39 333 2222222", "CHK-STR-0001"),
        operator(2004, "Giulia", "Verdi", 3, 6, "2026-02-22T16:10:00", "+39 333 3333333", "CHK-STR-0002"),
    ]
}

pub fn demo_credit_movements() -> Vec<CreditMovement> {
    vec![
        CreditMovement {
            id: 10010,
            created_at: "2026-02-23T08:45:00".to_string(),
            transaction_type: "assign_to_operator".to_string(),
            direction: Direction::Debit,
            amount: 1,
            description: "Riassegnazione a Luca Bianchi".to_string(),
            operator_id: Some(2003),
            activity_id: None,
            created_by_name: Some("Mario Rossi".to_string()),
        },
        CreditMovement {
            id: 10002,
            created_at: "2026-02-20T10:00:00".to_string(),
            transaction_type: "topup".to_string(),
            direction: Direction::Credit,
            amount: 20,
            description: "Carico crediti agenzia".to_string(),
            operator_id: None,
            activity_id: None,
            created_by_name: Some("Checks Admin".to_string()),
        },
    ]
}

fn event(at: &str, label: &str, actor: &str) -> ActivityEvent {
    ActivityEvent {
        at: at.to_string(),
        label: label.to_string(),
        actor: Some(actor.to_string()),
    }
}

pub fn demo_activities() -> Vec<Activity> {
    let mut first = Activity::new(5001, "ATT-2026-0001", ActivityStatus::ReportAvailable);
    first.customer_reference_name = Some("Condominio Via Torino 12".to_string());
    first.customer_reference_code = Some("CLI-0001".to_string());
    first.site_city = Some("Milano".to_string());
    first.site_address = Some("Via Torino 12".to_string());
    first.assigned_user_id = Some(2003);
    first.operator_name = Some("Luca Bianchi".to_string());
    first.outcome = Outcome::Compatible;
    first.activity_at = Some("2026-02-21T10:30:00".to_string());
    first.report = Some(ActivityReport {
        id: Some(9001),
        file_name: Some("ATT-2026-0001.pdf".to_string()),
        generated_at: Some("2026-02-21T12:05:00".to_string()),
        status: Some("generated".to_string()),
        download_url: None,
        version: Some(1),
    });
    first.test_summary = Some(TestSummary {
        instrument_serial: Some("CHK-STR-0001".to_string()),
        duration_minutes: Some(45),
        measured_power_kw: Some(5.8),
        contract_power_kw: Some(6.0),
        note: Some("Impianto conforme ai parametri contrattuali".to_string()),
    });
    first.notes = Some(vec!["Accesso al contatore dal cortile interno".to_string()]);
    first.events = Some(vec![
        event("2026-02-19T09:00:00", "Attività programmata", "Mario Rossi"),
        event("2026-02-21T10:30:00", "Prova completata", "Luca Bianchi"),
        event("2026-02-21T12:05:00", "Relazione PDF generata", "Checks Energy"),
    ]);

    let mut second = Activity::new(5002, "ATT-2026-0002", ActivityStatus::InProgress);
    second.customer_reference_name = Some("Panificio Brambilla".to_string());
    second.customer_reference_code = Some("CLI-0002".to_string());
    second.site_city = Some("Monza".to_string());
    second.assigned_user_id = Some(2004);
    second.operator_name = Some("Giulia Verdi".to_string());
    second.outcome = Outcome::ToReview;
    second.activity_at = Some("2026-02-22T15:00:00".to_string());
    second.notes = Some(vec!["Richiesta seconda misura a carico pieno".to_string()]);

    let mut third = Activity::new(5003, "ATT-2026-0003", ActivityStatus::Completed);
    third.customer_reference_name = Some("Studio Dentistico Ferri".to_string());
    third.customer_reference_code = Some("CLI-0003".to_string());
    third.site_city = Some("Sesto San Giovanni".to_string());
    third.assigned_user_id = Some(2003);
    third.operator_name = Some("Luca Bianchi".to_string());
    third.outcome = Outcome::NotCompatible;
    third.activity_at = Some("2026-02-20T11:15:00".to_string());

    let mut fourth = Activity::new(5004, "ATT-2026-0004", ActivityStatus::Scheduled);
    fourth.customer_reference_name = Some("Famiglia Colombo".to_string());
    fourth.customer_reference_code = Some("CLI-0004".to_string());
    fourth.site_city = Some("Milano".to_string());
    fourth.assigned_user_id = Some(2004);
    fourth.operator_name = Some("Giulia Verdi".to_string());
    fourth.activity_at = Some("2026-02-26T09:00:00".to_string());

    vec![first, second, third, fourth]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_dataset_is_consistent() {
        let operators = demo_operators();
        assert_eq!(operators[0].email, "l.bianchi@agenzia-milano-demo.it");
        assert_eq!(operators[1].email, "g.verdi@agenzia-milano-demo.it");

        // Cada actividad demo apunta a un operador demo existente
        for activity in demo_activities() {
            let assigned = activity.assigned_user_id.unwrap();
            assert!(operators.iter().any(|o| o.id == assigned));
        }

        assert_eq!(demo_agency().credits_available, 34);
        assert_eq!(demo_credit_movements().len(), 2);
    }
}

pub mod auth;
pub mod activity;
pub mod operator;
pub mod credit;
pub mod summary;
pub mod report;
pub mod resource;
pub mod demo;

pub use auth::{LoginResponse, MeResponse, Session, UserIdentity};
pub use activity::{Activity, ActivityReport, ActivityStatus, Outcome};
pub use operator::{Operator, OperatorStatus};
pub use credit::{CreditBalances, CreditMovement, Direction};
pub use summary::DashboardSummary;
pub use report::ReportRow;
pub use resource::{ErrorMap, ResourceBundle, ResourceKind, ResourcePayload};
pub use demo::Agency;

use serde::{Deserialize, Deserializer};

/// `null` en el JSON equivale a campo ausente (`#[serde(default)]` no lo cubre)
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// RECURSOS PROTEGIDOS - bundle tipado + mapa de errores por recurso
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    Activity, CreditBalances, DashboardSummary, MeResponse, Operator, ReportRow, UserIdentity,
};
use crate::services::api_client::unwrap_list;

/// Recurso protegido que el loader sabe pedir
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Identity,
    Summary,
    Activities,
    Reports,
    Operators,
    Credits,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Identity,
        ResourceKind::Summary,
        ResourceKind::Activities,
        ResourceKind::Reports,
        ResourceKind::Operators,
        ResourceKind::Credits,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Identity => "identity",
            ResourceKind::Summary => "summary",
            ResourceKind::Activities => "activities",
            ResourceKind::Reports => "reports",
            ResourceKind::Operators => "operators",
            ResourceKind::Credits => "credits",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Identity => "/api/v1/auth/me",
            ResourceKind::Summary => "/api/v1/dashboard/summary",
            ResourceKind::Activities => "/api/v1/activities",
            ResourceKind::Reports => "/api/v1/reports",
            ResourceKind::Operators => "/api/v1/operators",
            ResourceKind::Credits => "/api/v1/credits",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted || (wanted == "me" && *kind == ResourceKind::Identity))
            .ok_or_else(|| format!("unknown resource '{}'", s.trim()))
    }
}

/// Payload decodificado de un recurso
#[derive(Debug, Clone, PartialEq)]
pub enum ResourcePayload {
    Identity(UserIdentity),
    Summary(DashboardSummary),
    Activities(Vec<Activity>),
    Reports(Vec<ReportRow>),
    Operators(Vec<Operator>),
    Credits(CreditBalances),
}

impl ResourcePayload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourcePayload::Identity(_) => ResourceKind::Identity,
            ResourcePayload::Summary(_) => ResourceKind::Summary,
            ResourcePayload::Activities(_) => ResourceKind::Activities,
            ResourcePayload::Reports(_) => ResourceKind::Reports,
            ResourcePayload::Operators(_) => ResourceKind::Operators,
            ResourcePayload::Credits(_) => ResourceKind::Credits,
        }
    }

    /// Decodifica el JSON de un recurso. Un error aquí es un fallo de
    /// validación del recurso, no del ciclo entero.
    pub fn decode(kind: ResourceKind, value: Value) -> Result<Self, String> {
        match kind {
            ResourceKind::Identity => {
                // `{user: {...}}` o directamente el objeto usuario
                let user = if value.get("user").is_some() {
                    serde_json::from_value::<MeResponse>(value).map(|me| me.user)
                } else {
                    serde_json::from_value::<UserIdentity>(value)
                };
                user.map(ResourcePayload::Identity)
                    .map_err(|e| format!("invalid identity payload: {}", e))
            }
            ResourceKind::Summary => serde_json::from_value(value)
                .map(ResourcePayload::Summary)
                .map_err(|e| format!("invalid summary payload: {}", e)),
            ResourceKind::Activities => decode_list(value).map(ResourcePayload::Activities),
            ResourceKind::Reports => decode_list(value).map(ResourcePayload::Reports),
            ResourceKind::Operators => decode_list(value).map(ResourcePayload::Operators),
            ResourceKind::Credits => CreditBalances::from_value(value).map(ResourcePayload::Credits),
        }
    }
}

fn decode_list<T: serde::de::DeserializeOwned>(value: Value) -> Result<Vec<T>, String> {
    let items = unwrap_list(value)?;
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item).map_err(|e| format!("invalid item #{}: {}", idx, e))
        })
        .collect()
}

/// Conjunto de datos del backend de un ciclo de carga.
///
/// Se reemplaza entero en cada ciclo, nunca campo a campo.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ResourceBundle {
    pub identity: Option<UserIdentity>,
    pub summary: Option<DashboardSummary>,
    pub activities: Option<Vec<Activity>>,
    pub reports: Option<Vec<ReportRow>>,
    pub operators: Option<Vec<Operator>>,
    pub credits: Option<CreditBalances>,
}

impl ResourceBundle {
    pub fn insert(&mut self, payload: ResourcePayload) {
        match payload {
            ResourcePayload::Identity(v) => self.identity = Some(v),
            ResourcePayload::Summary(v) => self.summary = Some(v),
            ResourcePayload::Activities(v) => self.activities = Some(v),
            ResourcePayload::Reports(v) => self.reports = Some(v),
            ResourcePayload::Operators(v) => self.operators = Some(v),
            ResourcePayload::Credits(v) => self.credits = Some(v),
        }
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Identity => self.identity.is_some(),
            ResourceKind::Summary => self.summary.is_some(),
            ResourceKind::Activities => self.activities.is_some(),
            ResourceKind::Reports => self.reports.is_some(),
            ResourceKind::Operators => self.operators.is_some(),
            ResourceKind::Credits => self.credits.is_some(),
        }
    }

    pub fn loaded(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded().is_empty()
    }
}

/// Motivo legible del fallo de cada recurso
pub type ErrorMap = BTreeMap<ResourceKind, String>;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperatorStatus {
    Active,
    Inactive,
    Invited,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OperatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorStatus::Active => "active",
            OperatorStatus::Inactive => "inactive",
            OperatorStatus::Invited => "invited",
            OperatorStatus::Unknown => "unknown",
        }
    }
}

/// Strumento assegnato all'operatore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub serial_number: String,
}

/// Operador de la agencia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub status: OperatorStatus,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub credits_balance: i64,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub activities_count_30d: u32,
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<Instrument>,
}

impl Operator {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == OperatorStatus::Active
    }

    /// Búsqueda por "nombre apellido email", sin distinguir mayúsculas
    pub fn matches(&self, query: &str) -> bool {
        let pool = format!("{} {} {}", self.first_name, self.last_name, self.email).to_lowercase();
        pool.contains(&query.trim().to_lowercase())
    }
}

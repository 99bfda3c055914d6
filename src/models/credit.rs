use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::format::parse_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn sign(&self) -> &'static str {
        match self {
            Direction::Credit => "+",
            Direction::Debit => "-",
        }
    }
}

/// Movimiento de créditos (append-only, nunca se modifica)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditMovement {
    pub id: i64,
    pub created_at: String,
    pub transaction_type: String,
    pub direction: Direction,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub operator_id: Option<i64>,
    #[serde(default)]
    pub activity_id: Option<i64>,
    #[serde(default)]
    pub created_by_name: Option<String>,
}

impl CreditMovement {
    /// Importe con signo para mostrar ("+20", "-1")
    pub fn signed_amount(&self) -> String {
        format!("{}{}", self.direction.sign(), self.amount)
    }
}

/// Ordena por timestamp descendente; los timestamps ilegibles van al final
pub fn sort_movements_desc(movements: &mut [CreditMovement]) {
    movements.sort_by(|a, b| {
        let ta = parse_timestamp(&a.created_at);
        let tb = parse_timestamp(&b.created_at);
        tb.cmp(&ta).then_with(|| b.id.cmp(&a.id))
    });
}

/// Saldos con nombre devueltos por `GET /api/v1/credits`.
///
/// El endpoint todavía no está fijado: aceptamos cualquier objeto, los
/// campos numéricos son saldos y `movements` (si existe) la lista de
/// movimientos.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct CreditBalances {
    pub balances: BTreeMap<String, f64>,
    pub movements: Vec<CreditMovement>,
}

impl CreditBalances {
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err("expected an object of named balances".to_string());
        };

        let mut balances = BTreeMap::new();
        let mut movements = Vec::new();

        for (key, val) in map {
            if key == "movements" {
                movements = serde_json::from_value(val)
                    .map_err(|e| format!("invalid credit movements: {}", e))?;
                continue;
            }
            match &val {
                Value::Number(n) => {
                    if let Some(f) = n.as_f64() {
                        balances.insert(key, f);
                    }
                }
                Value::String(s) => {
                    if let Ok(f) = s.trim().parse::<f64>() {
                        balances.insert(key, f);
                    }
                }
                _ => {}
            }
        }

        Ok(Self { balances, movements })
    }

    pub fn balance(&self, name: &str) -> Option<f64> {
        self.balances.get(name).copied()
    }
}

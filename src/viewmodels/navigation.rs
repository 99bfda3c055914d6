// ============================================================================
// NAVEGACIÓN - vista activa + actividad seleccionada
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Dashboard,
    Activities,
    Reports,
    Credits,
    Operators,
    Branding,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Activities,
        View::Reports,
        View::Credits,
        View::Operators,
        View::Branding,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Activities => "activities",
            View::Reports => "reports",
            View::Credits => "credits",
            View::Operators => "operators",
            View::Branding => "branding",
        }
    }

    /// Etiqueta de la barra lateral
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Activities => "Attività",
            View::Reports => "Relazioni PDF",
            View::Credits => "Crediti",
            View::Operators => "Operatori",
            View::Branding => "Branding Agenzia",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        View::ALL
            .into_iter()
            .find(|v| v.key() == wanted)
            .ok_or_else(|| format!("unknown view '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct NavigationState {
    pub view: View,
    pub selected_activity: Option<i64>,
}

impl NavigationState {
    pub fn go(&mut self, view: View) {
        self.view = view;
    }

    /// Abrir una actividad desde el dashboard lleva a la vista Attività
    pub fn open_activity(&mut self, id: i64) {
        self.selected_activity = Some(id);
        self.view = View::Activities;
    }

    /// Tras logout se vuelve siempre al dashboard
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

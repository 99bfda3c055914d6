pub mod dashboard_viewmodel;
pub mod navigation;

pub use dashboard_viewmodel::{
    activities_for_operator, filter_operators, filter_reports, outcome_filter_options,
    status_filter_options, ActivityFilter, CreditOverview, DashboardData, DashboardKpis, FilterOption,
};
pub use navigation::{NavigationState, View};

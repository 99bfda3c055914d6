// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod dashboard_state;

pub use reactivity::*;
pub use dashboard_state::*;

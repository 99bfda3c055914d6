/// URL base del backend.
/// Configurada en tiempo de compilación con `PORTAL_API_BASE_URL`
/// (el build.rs la lee también del `.env`).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("PORTAL_API_BASE_URL") {
    Some(url) => url,
    None => "https://checks-energy-api.onrender.com",
};

/// Claves de localStorage de la sesión
pub const TOKEN_STORAGE_KEY: &str = "ce_token";
pub const USER_STORAGE_KEY: &str = "ce_user";
pub const EXPIRES_STORAGE_KEY: &str = "ce_expires_at";

/// Timeout por petición si no se configura otro
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Evento de window emitido al publicar un snapshot nuevo
pub const PORTAL_UPDATED_EVENT: &str = "portalUpdated";

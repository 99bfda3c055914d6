use chrono::{DateTime, NaiveDateTime};

/// Marcador para valores ausentes
pub const EMPTY_VALUE: &str = "—";

/// Parsea un timestamp del backend: RFC 3339 o ISO local sin zona
/// ("2026-02-23T08:55:00"). Los RFC 3339 se normalizan a UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Fecha al estilo it-IT: "23/02/2026 08:55".
/// Sin valor → "—"; valor ilegible → se devuelve tal cual.
pub fn format_date_time(value: Option<&str>) -> String {
    match value {
        None => EMPTY_VALUE.to_string(),
        Some(raw) if raw.trim().is_empty() => EMPTY_VALUE.to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
            None => raw.to_string(),
        },
    }
}

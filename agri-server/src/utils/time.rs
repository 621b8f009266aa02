//! Funções de tempo — conversões no fuso horário do negócio
//!
//! Todas as conversões data→timestamp são feitas na camada dos handlers;
//! os repositórios recebem apenas `i64` Unix millis.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Fuso horário por omissão (Angola não tem horário de verão)
pub const DEFAULT_TZ: &str = "Africa/Luanda";

/// Parse um fuso horário IANA, com fallback para Luanda
pub fn parse_tz(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid timezone '{}', falling back to {}", name, DEFAULT_TZ);
        DEFAULT_TZ.parse().expect("default timezone must parse")
    })
}

/// Parse uma data (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Ano civil corrente no fuso do negócio (usado na numeração AGC-<ano>-...)
pub fn current_year(tz: Tz) -> i32 {
    chrono::Utc::now().with_timezone(&tz).year()
}

/// Início do dia (00:00:00) → Unix millis no fuso do negócio
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Fim do dia → 00:00:00 do dia seguinte, semântica `< end` (exclusivo)
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tz_fallback() {
        let tz = parse_tz("Not/AZone");
        assert_eq!(tz.name(), DEFAULT_TZ);
        assert_eq!(parse_tz("Europe/Lisbon").name(), "Europe/Lisbon");
    }

    #[test]
    fn test_day_bounds_are_exclusive() {
        let tz = parse_tz(DEFAULT_TZ);
        let date = parse_date("2025-03-10").unwrap();
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(parse_date("10/03/2025").is_err());
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub(crate) fn normalize_header(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_ascii_lowercase()
}

pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

pub(crate) fn parse_week(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Competitive pressure index from its raw drivers, in `0..=100`.
pub(crate) fn pressure_index_from_drivers(
    contract_days_remaining: i64,
    price_sensitive: bool,
    peer_port_count_30d: i64,
    weekly_ad_intensity_index: f64,
) -> u8 {
    let days_term = 100i64.saturating_sub(contract_days_remaining.min(100)).max(0) as f64;
    let price_term = if price_sensitive { 100.0 } else { 0.0 };
    let peer_term = peer_port_count_30d.saturating_mul(10).clamp(0, 100) as f64;
    let ad_term = (weekly_ad_intensity_index * 10.0)
        .clamp(0.0, 100.0)
        .round_ties_even();

    // ties-to-even keeps parity with indices already present in exported datasets
    let blended = 0.35 * days_term + 0.25 * price_term + 0.25 * peer_term + 0.15 * ad_term;
    blended.round_ties_even().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_trimmed_and_lowercased() {
        assert_eq!(normalize_header("\u{feff} Customer_ID "), "customer_id");
        assert_eq!(normalize_header("CPI"), "cpi");
    }

    #[test]
    fn flags_accept_common_truthy_spellings() {
        for raw in ["1", "true", "TRUE", "Yes", " y "] {
            assert!(parse_flag(raw), "{raw}");
        }
        for raw in ["0", "false", "no", "", "maybe"] {
            assert!(!parse_flag(raw), "{raw}");
        }
    }

    #[test]
    fn weeks_parse_from_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 6).expect("valid date");
        assert_eq!(parse_week("2025-01-06"), Some(expected));
        assert_eq!(parse_week("2025-01-06T00:00:00Z"), Some(expected));
        assert_eq!(parse_week("2025-01-06 00:00:00"), Some(expected));
        assert_eq!(parse_week("   "), None);
        assert_eq!(parse_week("last week"), None);
    }

    #[test]
    fn pressure_index_blends_driver_terms() {
        // days 30 -> 70, price -> 100, peers 2 -> 20, ad 6.0 -> 60
        assert_eq!(pressure_index_from_drivers(30, true, 2, 6.0), 64);
        assert_eq!(pressure_index_from_drivers(14, true, 0, 3.2), 60);
        assert_eq!(pressure_index_from_drivers(0, true, 10, 10.0), 100);
        assert_eq!(pressure_index_from_drivers(400, false, 0, 0.0), 0);
    }

    #[test]
    fn pressure_index_rounds_half_to_even() {
        // ad 62.5 -> 62
        assert_eq!(pressure_index_from_drivers(7, false, 1, 6.25), 44);
    }

    #[test]
    fn pressure_index_clamps_wild_inputs() {
        assert_eq!(pressure_index_from_drivers(-50, true, 99, 80.0), 100);
        assert_eq!(pressure_index_from_drivers(10, false, -3, -2.0), 31);
        assert_eq!(pressure_index_from_drivers(i64::MIN, false, 0, 0.0), 100);
    }
}

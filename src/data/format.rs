//! Numeric rounding and display formatting.

/// Round to `digits` fractional digits, half-up.
///
/// Matches JavaScript's `Math.round(x * 10^d) / 10^d`, which the upstream
/// dashboards use: halves round towards positive infinity (`-2.5 -> -2`).
/// NaN and infinities pass through unchanged.
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits);
    (value * factor + 0.5).floor() / factor
}

/// Round to one fractional digit.
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Format a rate for display, e.g. `12.0`. Non-finite values are unknown.
pub fn format_rate(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}", value)
    } else {
        "-".to_string()
    }
}

/// Format a gauge value without trailing zeros (`3`, `2.5`, `0.1234`).
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.4}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format large counts with K/M suffixes.
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        "-".to_string()
    } else if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_like_javascript() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round1(12.04), 12.0);
        assert_eq!(round1(6.06), 6.1);
    }

    #[test]
    fn non_finite_passes_through() {
        assert!(round1(f64::NAN).is_nan());
        assert_eq!(round1(f64::INFINITY), f64::INFINITY);
        assert_eq!(round1(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(12.0), "12.0");
        assert_eq!(format_rate(f64::NAN), "-");
        assert_eq!(format_rate(f64::INFINITY), "-");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(0.1234), "0.1234");
        assert_eq!(format_value(f64::NAN), "-");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1_500.0), "1.5K");
        assert_eq!(format_count(2_000_000.0), "2.0M");
    }
}

//! Free-text numeric input
//!
//! Edit fields hold whatever the user typed. Values are read leniently:
//! leading whitespace is skipped and the longest numeric prefix is used,
//! so `"72.5C"` reads as 72.5 and `"45s"` as 45. Anything without a usable
//! prefix reads as zero.

/// Read a temperature (°C)
///
/// Non-finite results (overflowing exponents) read as zero.
pub fn parse_temperature(text: &str) -> f32 {
    let text = text.trim_start();
    let end = float_prefix_len(text.as_bytes());
    text[..end]
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Read a non-negative whole number (seconds, hours, minutes)
///
/// Negative values read as zero; values past `u32::MAX` saturate.
pub fn parse_count(text: &str) -> u32 {
    let bytes = text.trim_start().as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut value: u32 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        value = value.saturating_mul(10).saturating_add((b - b'0') as u32);
    }

    if negative {
        0
    } else {
        value
    }
}

/// Length of the longest prefix shaped like a decimal float
///
/// `[+-]? digits? (. digits?)? ([eE] [+-]? digits)?` with at least one
/// mantissa digit. An exponent marker without digits is not consumed.
fn float_prefix_len(b: &[u8]) -> usize {
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        mantissa_digits += j - frac_start;
        i = j;
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if i < b.len() && matches!(b[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < b.len() && matches!(b[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_plain() {
        assert_eq!(parse_temperature("95"), 95.0);
        assert_eq!(parse_temperature("50.7"), 50.7);
        assert_eq!(parse_temperature("-4.5"), -4.5);
        assert_eq!(parse_temperature("  72"), 72.0);
    }

    #[test]
    fn test_temperature_garbage_is_zero() {
        assert_eq!(parse_temperature("abc"), 0.0);
        assert_eq!(parse_temperature(""), 0.0);
        assert_eq!(parse_temperature("-"), 0.0);
        assert_eq!(parse_temperature("."), 0.0);
        assert_eq!(parse_temperature("inf"), 0.0);
        assert_eq!(parse_temperature("NaN"), 0.0);
    }

    #[test]
    fn test_temperature_prefix() {
        assert_eq!(parse_temperature("72.5C"), 72.5);
        assert_eq!(parse_temperature("1e2"), 100.0);
        assert_eq!(parse_temperature("3e"), 3.0);
        assert_eq!(parse_temperature(".5"), 0.5);
        assert_eq!(parse_temperature("5."), 5.0);
    }

    #[test]
    fn test_temperature_overflow_is_zero() {
        assert_eq!(parse_temperature("1e99"), 0.0);
    }

    #[test]
    fn test_count() {
        assert_eq!(parse_count("45"), 45);
        assert_eq!(parse_count(" 120"), 120);
        assert_eq!(parse_count("+7"), 7);
        assert_eq!(parse_count("12.9"), 12);
        assert_eq!(parse_count("30s"), 30);
    }

    #[test]
    fn test_count_garbage_is_zero() {
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-"), 0);
        assert_eq!(parse_count("-15"), 0);
    }

    #[test]
    fn test_count_saturates() {
        assert_eq!(parse_count("99999999999999"), u32::MAX);
    }
}

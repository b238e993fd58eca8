//! Compact number formatting for counters.

const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Format `value` as `1.5K`, `12M` and so on.
///
/// One decimal is kept unless it would round to zero.
pub fn large_number_format(value: f64) -> String {
    let mut value = value;
    let mut suffix = 0;
    while value >= 1000.0 && suffix < SUFFIXES.len() - 1 {
        value /= 1000.0;
        suffix += 1;
    }

    if suffix == 0 {
        return value.to_string();
    }

    let remainder = value % 1.0;
    let decimals = if (0.0..0.05).contains(&remainder) { 0 } else { 1 };
    format!("{value:.decimals$}{}", SUFFIXES[suffix])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values_unchanged() {
        assert_eq!(large_number_format(0.0), "0");
        assert_eq!(large_number_format(999.0), "999");
        assert_eq!(large_number_format(12.5), "12.5");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(large_number_format(1000.0), "1K");
        assert_eq!(large_number_format(1040.0), "1K");
        assert_eq!(large_number_format(1500.0), "1.5K");
        assert_eq!(large_number_format(12_300.0), "12.3K");
    }

    #[test]
    fn test_larger_suffixes() {
        assert_eq!(large_number_format(2_000_000.0), "2M");
        assert_eq!(large_number_format(3_400_000_000.0), "3.4B");
        assert_eq!(large_number_format(5_000_000_000_000.0), "5T");
    }

    #[test]
    fn test_beyond_trillions_stays_in_trillions() {
        assert_eq!(large_number_format(2_000_000_000_000_000.0), "2000T");
    }
}

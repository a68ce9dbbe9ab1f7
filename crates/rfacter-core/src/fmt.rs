//! Formatting helpers for fact values.
//!
//! Human-readable strings that several facts share: sizes (`"20.00 GiB"`),
//! megabyte amounts and uptime descriptions.

const BYTE_UNITS: [&str; 7] = ["bytes", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Format byte count as a human-readable size with two decimals.
///
/// `512` -> `"512 bytes"`, `21474836480` -> `"20.00 GiB"`.
pub fn bytes_to_human(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, BYTE_UNITS[unit])
}

/// Convert bytes to mebibytes rounded to two decimals.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}

/// Format uptime as shown by the `uptime` fact.
///
/// `"59 seconds"`, `"1:02 hours"`, `"3 days"`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = secs / 3600;
    match days {
        0 if hours == 0 => format!("{} seconds", secs),
        0 => format!("{}:{:02} hours", hours, (secs % 3600) / 60),
        1 => "1 day".to_string(),
        _ => format!("{} days", days),
    }
}

/// Percentage of `used` against `total` with two decimals, e.g. `"26.76%"`.
pub fn capacity(used: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", used as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_human() {
        assert_eq!(bytes_to_human(0), "0 bytes");
        assert_eq!(bytes_to_human(1023), "1023 bytes");
        assert_eq!(bytes_to_human(1024), "1.00 KiB");
        assert_eq!(bytes_to_human(1536 * 1024), "1.50 MiB");
        assert_eq!(bytes_to_human(21474836480), "20.00 GiB");
        assert_eq!(bytes_to_human(u64::MAX), "16.00 EiB");
    }

    #[test]
    fn test_bytes_to_mb() {
        assert_eq!(bytes_to_mb(16777216000), 16000.0);
        assert_eq!(bytes_to_mb(1572864), 1.5);
        assert_eq!(bytes_to_mb(0), 0.0);
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "59 seconds");
        assert_eq!(format_uptime(3725), "1:02 hours");
        assert_eq!(format_uptime(86400), "1 day");
        assert_eq!(format_uptime(266400), "3 days");
    }

    #[test]
    fn test_capacity() {
        assert_eq!(capacity(1, 4), "25.00%");
        assert_eq!(capacity(0, 0), "0.00%");
    }
}

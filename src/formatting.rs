//! Human-readable renderings of sizes, timestamps and dimensions.

use chrono::{DateTime, Local};
use std::time::SystemTime;

const BINARY_UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

/// Exact byte count, with a binary-unit approximation in front once the size
/// reaches 1 KiB: `1.50 KiB (1536 bytes)`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} bytes");
    }

    let exponent = (bytes.ilog2() / 10).min(BINARY_UNITS.len() as u32);
    let scaled = bytes as f64 / (1_u64 << (10 * exponent)) as f64;
    format!(
        "{scaled:.2} {} ({bytes} bytes)",
        BINARY_UNITS[exponent as usize - 1]
    )
}

/// Local time with its UTC offset, or `Unavailable` when the platform did not
/// report one.
pub fn format_timestamp(time: Option<SystemTime>) -> String {
    time.map(|time| {
        DateTime::<Local>::from(time)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string()
    })
    .unwrap_or_else(|| "Unavailable".to_string())
}

pub fn format_dimensions(width: u32, height: u32) -> String {
    format!("{width} x {height}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(1536), "1.50 KiB (1536 bytes)");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MiB (3145728 bytes)");
        assert!(format_size(u64::MAX).contains(" TiB ("));
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(None), "Unavailable");
        let rendered = format_timestamp(Some(UNIX_EPOCH + Duration::from_secs(86_400 * 365)));
        assert!(rendered.starts_with("197"), "{rendered}");
    }

    #[test]
    fn dimensions() {
        assert_eq!(format_dimensions(640, 480), "640 x 480");
    }
}

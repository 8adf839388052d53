//! Display formatting for sizes and storage quota.

use crate::StorageQuota;

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

const MB: f64 = 1024.0 * 1024.0;

/// Humanize a byte count: the largest unit that keeps the magnitude in
/// `[1, 1024)`, two decimals, trailing zeros trimmed. Counts at or past
/// 1024 GB clamp to GB rather than running off the unit table.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{} {}", trim_decimals(size), UNITS[unit_index])
}

/// Two-decimal rendering with trailing zeros (and a bare dot) removed,
/// so 1.50 reads "1.5" and 1.00 reads "1".
fn trim_decimals(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// The "X MB / Y MB" usage label.
pub fn quota_label(quota: &StorageQuota) -> String {
    format!(
        "{:.2} MB / {:.2} MB",
        quota.used as f64 / MB,
        quota.total as f64 / MB
    )
}

/// Percentage of storage in use. A zero-capacity quota reads as 0% so an
/// unconfigured service cannot produce a NaN-width bar.
pub fn quota_percentage(quota: &StorageQuota) -> f64 {
    if quota.total == 0 {
        return 0.0;
    }
    quota.used as f64 / quota.total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes() {
        assert_eq!(format_size(0), "0 Bytes");
    }

    #[test]
    fn exact_unit_boundaries() {
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 + 256), "1.25 KB");
    }

    #[test]
    fn sub_kilobyte_counts_stay_in_bytes() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(500), "500 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
    }

    #[test]
    fn magnitude_stays_below_1024_within_the_unit_table() {
        for bytes in [1u64, 1023, 1024, 1536, 1 << 20, (1 << 20) + 1, 1 << 30] {
            let rendered = format_size(bytes);
            let value: f64 = rendered
                .split(' ')
                .next()
                .unwrap()
                .parse()
                .expect("numeric prefix");
            assert!(value >= 1.0, "{rendered}");
            assert!(value < 1024.0, "{rendered}");
        }
    }

    #[test]
    fn counts_past_the_table_clamp_to_gigabytes() {
        assert_eq!(format_size(1 << 40), "1024 GB");
        assert_eq!(format_size(1 << 41), "2048 GB");
    }

    #[test]
    fn quota_label_renders_megabytes() {
        let quota = StorageQuota {
            used: 512 * 1024 * 1024,
            total: 1024 * 1024 * 1024,
        };
        assert_eq!(quota_label(&quota), "512.00 MB / 1024.00 MB");
    }

    #[test]
    fn quota_percentage_at_half_capacity() {
        let quota = StorageQuota {
            used: 512 * 1024 * 1024,
            total: 1024 * 1024 * 1024,
        };
        assert_eq!(format!("{:.2}", quota_percentage(&quota)), "50.00");
    }

    #[test]
    fn zero_capacity_quota_is_zero_percent() {
        let quota = StorageQuota { used: 42, total: 0 };
        assert_eq!(quota_percentage(&quota), 0.0);
    }
}

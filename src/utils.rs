//! Utility functions for packet statistics.

use log::info;

/// Percentage of `dropped` out of all packets, 0.0 when nothing was seen.
pub fn drop_percentage(accepted: usize, dropped: usize) -> f64 {
    let total = accepted + dropped;
    if total == 0 {
        return 0.0;
    }

    (dropped as f64 / total as f64) * 100.0
}

/// Logs accepted and dropped totals with the drop percentage.
///
/// # Arguments
///
/// * `accepted` - Number of packets accepted
/// * `dropped` - Number of packets dropped
pub fn log_statistics(accepted: usize, dropped: usize) {
    info!(
        "Accepted Packets: {}, Dropped Packets: {} - {:.2}%",
        accepted,
        dropped,
        drop_percentage(accepted, dropped)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_percentage() {
        assert_eq!(drop_percentage(0, 0), 0.0);
        assert_eq!(drop_percentage(5, 0), 0.0);
        assert_eq!(drop_percentage(3, 1), 25.0);
        assert_eq!(drop_percentage(0, 4), 100.0);
    }
}

//! Display helpers for simulation figures

use std::time::Duration;

/// Odds of seeing `count` in `total` rolls as `N:1`
///
/// Odds are rounded to a whole number and abbreviated with `K`, `M` or `B`.
/// A tier never seen is `∞:1`.
pub fn format_odds(count: u64, total: u64) -> String {
    if count == 0 || total == 0 {
        return "∞:1".to_string();
    }
    if count >= total {
        return "1:1".to_string();
    }

    let odds = (total as f64 / count as f64).round();
    if odds >= 1e9 {
        format!("{}B:1", (odds / 1e9).round())
    } else if odds >= 1e6 {
        format!("{}M:1", (odds / 1e6).round())
    } else if odds >= 1e3 {
        format!("{}K:1", (odds / 1e3).round())
    } else {
        format!("{odds}:1")
    }
}

/// Share of `total` as a percentage with two decimals
pub fn format_percentage(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", count as f64 / total as f64 * 100.0)
}

/// Currency amounts with `K`/`M`/`B` suffixes, `∞` for unbounded costs
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "∞".to_string();
    }
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

/// Remaining time estimate from the rate observed so far
pub fn format_eta(elapsed: Duration, completed: u64, total: u64) -> String {
    if completed == 0 || elapsed.is_zero() {
        return "Calculating...".to_string();
    }
    let rate = completed as f64 / elapsed.as_secs_f64();
    let remaining = total.saturating_sub(completed) as f64;
    let seconds = (remaining / rate).ceil() as u64;
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        format!("{}m {}s", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odds() {
        assert_eq!(format_odds(0, 100), "∞:1");
        assert_eq!(format_odds(100, 100), "1:1");
        assert_eq!(format_odds(25, 100), "4:1");
        assert_eq!(format_odds(3, 10_000), "3K:1");
        assert_eq!(format_odds(1, 2_500_000), "3M:1");
        assert_eq!(format_odds(1, 1_000_000_000), "1B:1");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(1, 3), "33.33%");
        assert_eq!(format_percentage(5, 0), "0.00%");
    }

    #[test]
    fn test_amount() {
        assert_eq!(format_amount(f64::INFINITY), "∞");
        assert_eq!(format_amount(1_500.0), "1.50K");
        assert_eq!(format_amount(42_000_000.0), "42.00M");
        assert_eq!(format_amount(999.4), "999");
    }

    #[test]
    fn test_eta() {
        assert_eq!(format_eta(Duration::from_secs(10), 0, 100), "Calculating...");
        assert_eq!(format_eta(Duration::from_secs(10), 50, 100), "10s");
        assert_eq!(format_eta(Duration::from_secs(60), 50, 200), "3m 0s");
    }
}

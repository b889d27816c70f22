use chrono::{DateTime, Duration, Utc};

// A thousand years; keeps oversized settings inside chrono's range
const MAX_HOURS: u64 = 24 * 365 * 1000;

/// Maximum age of a cache entry before it is treated as absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    max_age: Duration,
}

impl Freshness {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn hours(hours: u64) -> Self {
        Self::new(Duration::hours(hours.min(MAX_HOURS) as i64))
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Whether an entry saved at `saved_at` is still usable at `now`.
    ///
    /// Entries stamped in the future (clock skew) count as fresh.
    pub fn is_fresh(&self, saved_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(saved_at) <= self.max_age
    }
}

impl Default for Freshness {
    fn default() -> Self {
        Self::hours(24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_window() {
        let freshness = Freshness::hours(24);
        let saved = Utc::now();

        assert!(freshness.is_fresh(saved, saved));
        assert!(freshness.is_fresh(saved, saved + Duration::hours(24)));
        assert!(!freshness.is_fresh(saved, saved + Duration::hours(25)));
        assert!(freshness.is_fresh(saved, saved - Duration::hours(3)));
    }

    #[test]
    fn test_zero_window_expires_immediately() {
        let freshness = Freshness::hours(0);
        let saved = Utc::now();
        assert!(!freshness.is_fresh(saved, saved + Duration::seconds(1)));
    }
}

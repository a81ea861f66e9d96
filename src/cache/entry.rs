use chrono::{DateTime, Duration, Utc};

/// A cached value with an absolute expiration deadline.
///
/// The deadline is fixed when the entry is created and is not extended
/// by reads. A read at or past the deadline must repopulate the entry;
/// the stale value is never served.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, created_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_not_expired() {
        let now = Utc::now();
        let entry = CacheEntry::new(vec![1, 2, 3], now, Duration::minutes(15));
        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::minutes(14)));
    }

    #[test]
    fn test_entry_expired_at_deadline() {
        let now = Utc::now();
        let entry = CacheEntry::new(1, now, Duration::minutes(15));
        assert!(entry.is_expired(now + Duration::minutes(15)));
        assert!(entry.is_expired(now + Duration::hours(1)));
    }

    #[test]
    fn test_expiry_is_absolute_not_sliding() {
        let now = Utc::now();
        let entry = CacheEntry::new(1, now, Duration::minutes(15));

        // Reads before the deadline do not move it.
        assert!(!entry.is_expired(now + Duration::minutes(10)));
        assert_eq!(entry.expires_at, now + Duration::minutes(15));
        assert!(entry.is_expired(now + Duration::minutes(15)));
    }
}

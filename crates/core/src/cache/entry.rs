use chrono::{DateTime, Utc};

/// A cached value together with the time it was last successfully fetched.
///
/// The absence of a `CacheEntry` means "never successfully fetched"; there is
/// no default value to fall back on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> CacheEntry<T> {
    /// Creates an entry for a value fetched at `fetched_at`.
    pub fn fetched(value: T, fetched_at: DateTime<Utc>) -> Self {
        Self {
            value,
            fetched_at: Some(fetched_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fetched_entry_records_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let entry = CacheEntry::fetched("value", at);

        assert_eq!(entry.value, "value");
        assert_eq!(entry.fetched_at, Some(at));
    }
}

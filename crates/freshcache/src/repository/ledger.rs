//! Last successful fetch time per refresh scope.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use freshcache_core::record::RefreshScope;

pub struct FetchLedger<K> {
    entries: Mutex<HashMap<RefreshScope<K>, DateTime<Utc>>>,
}

impl<K: Eq + Hash + Clone> Default for FetchLedger<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FetchLedger<K> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn last_fetched(&self, scope: &RefreshScope<K>) -> Option<DateTime<Utc>> {
        self.lock().get(scope).copied()
    }

    /// Records a successful fetch of `scope` and of every key it returned.
    pub fn mark<I>(&self, scope: RefreshScope<K>, keys: I, at: DateTime<Utc>)
    where
        I: IntoIterator<Item = K>,
    {
        let mut entries = self.lock();
        for key in keys {
            entries.insert(RefreshScope::Key(key), at);
        }
        entries.insert(scope, at);
    }

    /// Drops per-key entries for keys not accepted by `keep`.
    pub fn retain_keys(&self, mut keep: impl FnMut(&K) -> bool) {
        self.lock().retain(|scope, _| match scope {
            RefreshScope::Key(key) => keep(key),
            _ => true,
        });
    }

    pub fn clear(&self, scope: &RefreshScope<K>) {
        self.lock().remove(scope);
    }

    pub fn clear_all(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RefreshScope<K>, DateTime<Utc>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_mark_group_marks_keys() {
        let ledger = FetchLedger::new();
        ledger.mark(
            RefreshScope::Group("9".to_string()),
            ["a".to_string(), "b".to_string()],
            at(),
        );

        assert_eq!(ledger.last_fetched(&RefreshScope::Key("a".to_string())), Some(at()));
        assert_eq!(ledger.last_fetched(&RefreshScope::Group("9".to_string())), Some(at()));
        assert_eq!(ledger.last_fetched(&RefreshScope::All), None);
    }

    #[test]
    fn test_retain_keys_keeps_collection_scopes() {
        let ledger = FetchLedger::new();
        ledger.mark(RefreshScope::All, [1u32, 2], at());

        ledger.retain_keys(|key| *key == 2);

        assert_eq!(ledger.last_fetched(&RefreshScope::Key(1)), None);
        assert_eq!(ledger.last_fetched(&RefreshScope::Key(2)), Some(at()));
        assert_eq!(ledger.last_fetched(&RefreshScope::All), Some(at()));
    }

    #[test]
    fn test_clear_all() {
        let ledger = FetchLedger::new();
        ledger.mark(RefreshScope::Key(7u32), [], at());

        ledger.clear_all();

        assert_eq!(ledger.last_fetched(&RefreshScope::Key(7)), None);
    }
}

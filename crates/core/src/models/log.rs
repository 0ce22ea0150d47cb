use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::Record;

/// A message recorded by the application logger.
///
/// Logs only live in the local store; they are never synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub id: Uuid,
    pub msg: String,
    pub timestamp: DateTime<Utc>,
}

impl Log {
    pub fn new(msg: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            msg: msg.into(),
            timestamp,
        }
    }
}

impl Record for Log {
    type Key = Uuid;
    const COLLECTION: &'static str = "logs";

    fn key(&self) -> Uuid {
        self.id
    }

    fn display_name(&self) -> String {
        self.msg.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_logs_get_distinct_ids() {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
        let first = Log::new("Interaction with 'Button 1'", at);
        let second = Log::new("Interaction with 'Button 1'", at);

        assert_ne!(first.key(), second.key());
        assert_eq!(first.display_name(), "Interaction with 'Button 1'");
    }
}

//! The record abstraction shared by stores, remote sources and repositories.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A domain entity with a stable identifying key.
///
/// A key maps to at most one current record in a local store.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The identifying key type.
    type Key: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;

    /// Name of the collection this record kind belongs to (e.g. `"plants"`).
    const COLLECTION: &'static str;

    /// Returns the key of this record.
    fn key(&self) -> Self::Key;

    /// Returns the group this record belongs to, if the kind is grouped.
    ///
    /// Groups allow refreshing a subset of a collection (plants by grow zone).
    fn group(&self) -> Option<String> {
        None
    }

    /// Name used when ordering records alphabetically.
    fn display_name(&self) -> String {
        self.key().to_string()
    }
}

/// The unit of single-flight and freshness bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefreshScope<K> {
    /// The whole collection.
    All,
    /// Every record of one group.
    Group(String),
    /// A single record.
    Key(K),
}

impl<K: Display> Display for RefreshScope<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshScope::All => f.write_str("all"),
            RefreshScope::Group(group) => write!(f, "group:{group}"),
            RefreshScope::Key(key) => write!(f, "key:{key}"),
        }
    }
}

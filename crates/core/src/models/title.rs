use serde::{Deserialize, Serialize};

use crate::record::Record;

/// The welcome title shown to the user.
///
/// There is only one current title, stored under [`Title::CURRENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    #[serde(default)]
    pub id: u32,
    pub title: String,
}

impl Title {
    /// Key of the single current title.
    pub const CURRENT: u32 = 0;

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Self::CURRENT,
            title: title.into(),
        }
    }
}

impl Record for Title {
    type Key = u32;
    const COLLECTION: &'static str = "titles";

    fn key(&self) -> u32 {
        self.id
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }
}

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into, Serialize, Deserialize,
)]
pub struct JournalId(pub i64);

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Journal {
    pub id: JournalId,
    pub path: String,
    pub sequence: f64,
    pub enabled: bool,
    pub primary_locale: String,
}

impl Journal {
    pub fn new(id: JournalId, path: String, primary_locale: String) -> Self {
        Self {
            id,
            path,
            sequence: 0.0,
            enabled: true,
            primary_locale,
        }
    }

    /// Base URL of the journal under the given site URL.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// Fields needed to create a journal row; the id is assigned on insert.
#[derive(Debug, Clone)]
pub struct NewJournal {
    pub path: String,
    pub sequence: f64,
    pub enabled: bool,
    pub primary_locale: String,
}

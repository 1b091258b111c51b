use crate::models::journal::JournalId;
use crate::models::locale::{LocaleContext, LocalizedText};
use chrono::{DateTime, Utc};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into, Serialize, Deserialize,
)]
pub struct IssueId(pub i64);

/// Who may read an issue. Stored as 1 (open) or 2 (subscription).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
pub enum AccessStatus {
    #[default]
    #[display("open")]
    Open,
    #[display("subscription")]
    Subscription,
}

impl AccessStatus {
    pub fn code(self) -> i64 {
        match self {
            AccessStatus::Open => 1,
            AccessStatus::Subscription => 2,
        }
    }

    /// Maps a stored or submitted code. Zero and unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(AccessStatus::Open),
            2 => Some(AccessStatus::Subscription),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Issue {
    pub id: Option<IssueId>,
    pub journal_id: Option<JournalId>,
    pub volume: i32,
    pub number: String,
    pub year: i32,
    pub date_published: Option<DateTime<Utc>>,
    pub access_status: AccessStatus,
    pub open_access_date: Option<DateTime<Utc>>,
    pub show_volume: bool,
    pub show_number: bool,
    pub show_year: bool,
    pub show_title: bool,
    pub published: bool,
    pub current: bool,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub cover_image: LocalizedText,
    pub cover_image_alt_text: LocalizedText,
}

impl Issue {
    pub fn localized_title(&self, ctx: &LocaleContext) -> Option<&str> {
        self.title.localized(ctx)
    }

    pub fn localized_description(&self, ctx: &LocaleContext) -> Option<&str> {
        self.description.localized(ctx)
    }

    pub fn localized_cover_image(&self, ctx: &LocaleContext) -> Option<&str> {
        self.cover_image.localized(ctx)
    }

    /// "Vol. 3 No. 2 (2024)" style label built from the visible parts only.
    pub fn identification(&self, ctx: &LocaleContext) -> String {
        let mut parts = Vec::new();
        if self.show_volume {
            parts.push(format!("Vol. {}", self.volume));
        }
        if self.show_number {
            parts.push(format!("No. {}", self.number));
        }
        if self.show_year {
            parts.push(format!("({})", self.year));
        }
        if self.show_title {
            if let Some(title) = self.localized_title(ctx) {
                parts.push(title.to_string());
            }
        }
        parts.join(" ")
    }
}

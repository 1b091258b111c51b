use derive_more::Display;
use serde_json::Value;
use std::borrow::Cow;

pub type SettingValue = Value;

/// Which header a page-header setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HeaderPrefix {
    #[display("home")]
    Home,
    #[display("page")]
    Page,
}

impl HeaderPrefix {
    pub fn for_home(home: bool) -> Self {
        if home {
            HeaderPrefix::Home
        } else {
            HeaderPrefix::Page
        }
    }
}

/// The journal settings this crate knows how to read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalSetting {
    Title,
    Initials,
    Description,
    SupportedLocales,
    SupportedFormLocales,
    SupportedSubmissionLocales,
    PublishingMode,
    EnableDelayedOpenAccess,
    HeaderTitleType(HeaderPrefix),
    HeaderTitleImage(HeaderPrefix),
    HeaderTitle(HeaderPrefix),
    HeaderLogoImage(HeaderPrefix),
    Favicon,
}

impl JournalSetting {
    /// Name of the setting in the store.
    pub fn key(&self) -> Cow<'static, str> {
        match self {
            JournalSetting::Title => Cow::Borrowed("title"),
            JournalSetting::Initials => Cow::Borrowed("initials"),
            JournalSetting::Description => Cow::Borrowed("description"),
            JournalSetting::SupportedLocales => Cow::Borrowed("supportedLocales"),
            JournalSetting::SupportedFormLocales => Cow::Borrowed("supportedFormLocales"),
            JournalSetting::SupportedSubmissionLocales => {
                Cow::Borrowed("supportedSubmissionLocales")
            }
            JournalSetting::PublishingMode => Cow::Borrowed("publishingMode"),
            JournalSetting::EnableDelayedOpenAccess => Cow::Borrowed("enableDelayedOpenAccess"),
            JournalSetting::HeaderTitleType(prefix) => {
                Cow::Owned(format!("{}HeaderTitleType", prefix))
            }
            JournalSetting::HeaderTitleImage(prefix) => {
                Cow::Owned(format!("{}HeaderTitleImage", prefix))
            }
            JournalSetting::HeaderTitle(prefix) => Cow::Owned(format!("{}HeaderTitle", prefix)),
            JournalSetting::HeaderLogoImage(prefix) => {
                Cow::Owned(format!("{}HeaderLogoImage", prefix))
            }
            JournalSetting::Favicon => Cow::Borrowed("journalFavicon"),
        }
    }
}

/// Storage type recorded next to a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SettingType {
    #[display("string")]
    String,
    #[display("int")]
    Int,
    #[display("bool")]
    Bool,
    #[display("object")]
    Object,
}

impl SettingType {
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(_) => SettingType::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => SettingType::Int,
            Value::String(_) => SettingType::String,
            _ => SettingType::Object,
        }
    }
}

/// How a journal publishes its content. Stored as 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum PublishingMode {
    #[default]
    #[display("open")]
    Open,
    #[display("subscription")]
    Subscription,
    #[display("none")]
    None,
}

impl PublishingMode {
    /// Anything other than 1 or 2, including a missing value, reads as open.
    pub fn from_setting(value: Option<&Value>) -> Self {
        match value.and_then(as_integer) {
            Some(1) => PublishingMode::Subscription,
            Some(2) => PublishingMode::None,
            _ => PublishingMode::Open,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            PublishingMode::Open => 0,
            PublishingMode::Subscription => 1,
            PublishingMode::None => 2,
        }
    }
}

/// Integer view of a value that may have been stored as a number or a numeric string.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Loose emptiness as used by legacy settings data: null, false, zero, "",
/// "0" and empty collections are all blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    !is_blank(value)
}

/// File name of an image setting. Older rows hold the bare name, newer ones an
/// object with `uploadName`.
pub fn image_reference(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(name.clone()),
        Value::Object(map) => map
            .get("uploadName")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

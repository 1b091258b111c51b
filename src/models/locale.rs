use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Locales in effect for one request. Passed explicitly to every resolver and
/// workflow call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    pub active_locale: String,
    pub primary_locale: String,
}

impl LocaleContext {
    pub fn new(active_locale: impl Into<String>, primary_locale: impl Into<String>) -> Self {
        Self {
            active_locale: active_locale.into(),
            primary_locale: primary_locale.into(),
        }
    }

    /// Candidate locales in lookup order: active first, then primary.
    pub fn fallback_chain(&self) -> [&str; 2] {
        [self.active_locale.as_str(), self.primary_locale.as_str()]
    }
}

/// A locale code paired with its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleName {
    pub code: String,
    pub display_name: String,
}

/// One text value per locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn set(&mut self, locale: impl Into<String>, value: impl Into<String>) {
        self.0.insert(locale.into(), value.into());
    }

    pub fn with(mut self, locale: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(locale, value);
        self
    }

    /// Value for the active locale, falling back to the primary locale.
    pub fn localized(&self, ctx: &LocaleContext) -> Option<&str> {
        ctx.fallback_chain()
            .into_iter()
            .find_map(|locale| self.get(locale))
    }

    /// All values concatenated in locale order.
    pub fn joined(&self) -> String {
        self.0.values().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

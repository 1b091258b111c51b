//! Locale-aware reads over journal settings.
//!
//! Every localized accessor walks the same chain: the requested (or active)
//! locale first, then the primary locale.

use crate::errors::JournalError;
use crate::models::journal::{Journal, JournalId};
use crate::models::locale::{LocaleContext, LocaleName, LocalizedText};
use crate::models::settings::{
    image_reference, is_truthy, HeaderPrefix, JournalSetting, PublishingMode, SettingType,
    SettingValue,
};
use crate::services::{LocaleNameRegistry, SettingsStore};
use log::debug;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// What a page header shows as its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageHeaderTitle {
    Image(String),
    Text(String),
}

impl PageHeaderTitle {
    pub fn as_str(&self) -> &str {
        match self {
            PageHeaderTitle::Image(name) | PageHeaderTitle::Text(name) => name,
        }
    }

    fn is_empty(&self) -> bool {
        let value = self.as_str();
        value.is_empty() || value == "0"
    }
}

fn locale_entry<'v>(value: Option<&'v Value>, locale: &str) -> Option<&'v Value> {
    value
        .and_then(|v| v.get(locale))
        .filter(|entry| !entry.is_null())
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn locale_codes(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

pub struct JournalSettingsResolver<'a> {
    store: &'a dyn SettingsStore,
    locales: &'a dyn LocaleNameRegistry,
}

impl<'a> JournalSettingsResolver<'a> {
    pub fn new(store: &'a dyn SettingsStore, locales: &'a dyn LocaleNameRegistry) -> Self {
        Self { store, locales }
    }

    pub fn get_setting(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        locale: Option<&str>,
    ) -> Result<Option<SettingValue>, JournalError> {
        self.store.get_setting(journal_id.0, &setting.key(), locale)
    }

    /// Looks up `preferred_locale` (the active locale when `None`) and falls
    /// back to the primary locale only when the first value is absent.
    pub fn get_localized_setting(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        preferred_locale: Option<&str>,
        ctx: &LocaleContext,
    ) -> Result<Option<SettingValue>, JournalError> {
        let preferred = preferred_locale.unwrap_or(ctx.active_locale.as_str());
        if let Some(value) = self.get_setting(journal_id, setting, Some(preferred))? {
            return Ok(Some(value));
        }
        debug!(
            "{} missing for locale {} on journal {}, trying {}",
            setting.key(),
            preferred,
            journal_id,
            ctx.primary_locale
        );
        self.get_setting(journal_id, setting, Some(ctx.primary_locale.as_str()))
    }

    fn localized_text(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        preferred_locale: Option<&str>,
        ctx: &LocaleContext,
    ) -> Result<Option<String>, JournalError> {
        Ok(self
            .get_localized_setting(journal_id, setting, preferred_locale, ctx)?
            .as_ref()
            .and_then(value_as_text))
    }

    fn text_for_locale(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        locale: &str,
    ) -> Result<Option<String>, JournalError> {
        Ok(self
            .get_setting(journal_id, setting, Some(locale))?
            .as_ref()
            .and_then(value_as_text))
    }

    pub fn localized_title(
        &self,
        journal_id: JournalId,
        preferred_locale: Option<&str>,
        ctx: &LocaleContext,
    ) -> Result<Option<String>, JournalError> {
        self.localized_text(journal_id, JournalSetting::Title, preferred_locale, ctx)
    }

    pub fn title(&self, journal_id: JournalId, locale: &str) -> Result<Option<String>, JournalError> {
        self.text_for_locale(journal_id, JournalSetting::Title, locale)
    }

    pub fn localized_initials(
        &self,
        journal_id: JournalId,
        ctx: &LocaleContext,
    ) -> Result<Option<String>, JournalError> {
        self.localized_text(journal_id, JournalSetting::Initials, None, ctx)
    }

    pub fn initials(
        &self,
        journal_id: JournalId,
        locale: &str,
    ) -> Result<Option<String>, JournalError> {
        self.text_for_locale(journal_id, JournalSetting::Initials, locale)
    }

    pub fn localized_description(
        &self,
        journal_id: JournalId,
        ctx: &LocaleContext,
    ) -> Result<Option<String>, JournalError> {
        self.localized_text(journal_id, JournalSetting::Description, None, ctx)
    }

    pub fn description(
        &self,
        journal_id: JournalId,
        locale: &str,
    ) -> Result<Option<String>, JournalError> {
        self.text_for_locale(journal_id, JournalSetting::Description, locale)
    }

    fn names_for(&self, codes: Vec<String>) -> Vec<LocaleName> {
        let installed = self.locales.all_locales();
        codes
            .into_iter()
            .map(|code| {
                let display_name = installed.get(&code).cloned().unwrap_or_else(|| {
                    debug!("Locale {} is not installed, using its code as name", code);
                    code.clone()
                });
                LocaleName { code, display_name }
            })
            .collect()
    }

    /// Names for the locale list stored under `setting`, in stored order. An
    /// unset or malformed list yields nothing; unknown codes are named by
    /// their code.
    pub fn supported_locale_names(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
    ) -> Result<Vec<LocaleName>, JournalError> {
        let value = self.get_setting(journal_id, setting, None)?;
        Ok(self.names_for(locale_codes(value.as_ref())))
    }

    pub fn supported_form_locale_names(
        &self,
        journal_id: JournalId,
    ) -> Result<Vec<LocaleName>, JournalError> {
        self.supported_locale_names(journal_id, JournalSetting::SupportedFormLocales)
    }

    /// Like [`Self::supported_locale_names`], but never empty: submissions
    /// fall back to the journal's primary locale.
    pub fn supported_submission_locale_names(
        &self,
        journal: &Journal,
    ) -> Result<Vec<LocaleName>, JournalError> {
        let value = self.get_setting(journal.id, JournalSetting::SupportedSubmissionLocales, None)?;
        let mut codes = locale_codes(value.as_ref());
        if codes.is_empty() {
            codes.push(journal.primary_locale.clone());
        }
        Ok(self.names_for(codes))
    }

    /// For each of [active, primary]: an image title when the title-type flag
    /// is set and an image exists, otherwise the text title. First non-empty
    /// result wins.
    pub fn localized_page_header_title(
        &self,
        journal_id: JournalId,
        home: bool,
        ctx: &LocaleContext,
    ) -> Result<Option<PageHeaderTitle>, JournalError> {
        let prefix = HeaderPrefix::for_home(home);
        let types = self.get_setting(journal_id, JournalSetting::HeaderTitleType(prefix), None)?;
        let images = self.get_setting(journal_id, JournalSetting::HeaderTitleImage(prefix), None)?;
        let titles = self.get_setting(journal_id, JournalSetting::HeaderTitle(prefix), None)?;

        let mut title: Option<PageHeaderTitle> = None;
        for locale in ctx.fallback_chain() {
            if locale_entry(types.as_ref(), locale).is_some_and(is_truthy) {
                if let Some(image) = locale_entry(images.as_ref(), locale) {
                    title = image_reference(image).map(PageHeaderTitle::Image);
                }
            }
            if title.as_ref().map_or(true, PageHeaderTitle::is_empty) {
                if let Some(text) = locale_entry(titles.as_ref(), locale) {
                    title = value_as_text(text).map(PageHeaderTitle::Text);
                }
            }
            if let Some(found) = title.as_ref().filter(|t| !t.is_empty()) {
                return Ok(Some(found.clone()));
            }
        }
        Ok(None)
    }

    fn first_image(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        ctx: &LocaleContext,
    ) -> Result<Option<String>, JournalError> {
        let images = self.get_setting(journal_id, setting, None)?;
        Ok(ctx
            .fallback_chain()
            .into_iter()
            .find_map(|locale| locale_entry(images.as_ref(), locale))
            .and_then(image_reference))
    }

    pub fn localized_page_header_logo(
        &self,
        journal_id: JournalId,
        home: bool,
        ctx: &LocaleContext,
    ) -> Result<Option<String>, JournalError> {
        let prefix = HeaderPrefix::for_home(home);
        self.first_image(journal_id, JournalSetting::HeaderLogoImage(prefix), ctx)
    }

    pub fn localized_favicon(
        &self,
        journal_id: JournalId,
        ctx: &LocaleContext,
    ) -> Result<Option<String>, JournalError> {
        self.first_image(journal_id, JournalSetting::Favicon, ctx)
    }

    pub fn publishing_mode(&self, journal_id: JournalId) -> Result<PublishingMode, JournalError> {
        let value = self.get_setting(journal_id, JournalSetting::PublishingMode, None)?;
        Ok(PublishingMode::from_setting(value.as_ref()))
    }

    pub fn delayed_open_access_enabled(&self, journal_id: JournalId) -> Result<bool, JournalError> {
        let value = self.get_setting(journal_id, JournalSetting::EnableDelayedOpenAccess, None)?;
        Ok(value.as_ref().is_some_and(is_truthy))
    }

    /// All stored settings of the journal, by store name.
    pub fn settings(&self, journal_id: JournalId) -> Result<BTreeMap<String, SettingValue>, JournalError> {
        self.store.get_settings(journal_id.0)
    }

    pub fn update_setting(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        value: &SettingValue,
        setting_type: Option<SettingType>,
        is_localized: bool,
    ) -> Result<(), JournalError> {
        self.store
            .update_setting(journal_id.0, &setting.key(), value, setting_type, is_localized)
    }

    pub fn set_localized_text(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        text: &LocalizedText,
    ) -> Result<(), JournalError> {
        let by_locale: Map<String, Value> = text
            .iter()
            .map(|(locale, value)| (locale.to_string(), Value::String(value.to_string())))
            .collect();
        self.update_setting(
            journal_id,
            setting,
            &Value::Object(by_locale),
            Some(SettingType::String),
            true,
        )
    }

    pub fn set_supported_locales(
        &self,
        journal_id: JournalId,
        setting: JournalSetting,
        codes: &[&str],
    ) -> Result<(), JournalError> {
        let list = Value::Array(codes.iter().map(|c| Value::String(c.to_string())).collect());
        self.update_setting(journal_id, setting, &list, Some(SettingType::Object), false)
    }

    pub fn set_publishing_mode(
        &self,
        journal_id: JournalId,
        mode: PublishingMode,
    ) -> Result<(), JournalError> {
        self.update_setting(
            journal_id,
            JournalSetting::PublishingMode,
            &Value::from(mode.code()),
            Some(SettingType::Int),
            false,
        )
    }
}

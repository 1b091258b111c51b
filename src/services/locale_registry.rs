use crate::services::LocaleNameRegistry;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const INSTALLED_LOCALES: &[(&str, &str)] = &[
    ("ar_IQ", "العربية"),
    ("ca_ES", "Català"),
    ("de_DE", "Deutsch"),
    ("el_GR", "ελληνικά"),
    ("en_US", "English"),
    ("es_ES", "Español (España)"),
    ("fr_CA", "Français (Canada)"),
    ("fr_FR", "Français (France)"),
    ("id_ID", "Bahasa Indonesia"),
    ("it_IT", "Italiano"),
    ("ja_JP", "日本語"),
    ("nl_NL", "Nederlands"),
    ("pt_BR", "Português (Brasil)"),
    ("pt_PT", "Português (Portugal)"),
    ("ru_RU", "Русский"),
    ("sw_KE", "Kiswahili"),
    ("tr_TR", "Türkçe"),
    ("uk_UA", "Українська"),
    ("zh_CN", "简体中文"),
];

fn locale_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}_[A-Z]{2}(@[a-z]+)?$").expect("locale pattern is valid")
    })
}

/// `en_US`, `sr_RS@latin` and the like.
pub fn is_valid_locale_code(code: &str) -> bool {
    locale_pattern().is_match(code)
}

/// Registry over a fixed table of installed locales.
#[derive(Debug, Clone)]
pub struct StaticLocaleRegistry {
    locales: BTreeMap<String, String>,
}

impl StaticLocaleRegistry {
    pub fn new() -> Self {
        Self {
            locales: INSTALLED_LOCALES
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }

    /// Adds or renames a locale. Malformed codes are ignored.
    pub fn with_locale(mut self, code: &str, display_name: &str) -> Self {
        if is_valid_locale_code(code) {
            self.locales.insert(code.to_string(), display_name.to_string());
        } else {
            log::warn!("Ignoring malformed locale code {:?}", code);
        }
        self
    }
}

impl Default for StaticLocaleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleNameRegistry for StaticLocaleRegistry {
    fn all_locales(&self) -> BTreeMap<String, String> {
        self.locales.clone()
    }
}

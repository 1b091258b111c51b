use crate::errors::JournalError;
use crate::models::settings::PublishingMode;
use crate::services::locale_registry::is_valid_locale_code;
use std::env;
use std::path::PathBuf;

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub public_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub base_url: String,
    pub active_locale: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, JournalError> {
        dotenv::dotenv().ok();

        let active_locale =
            env::var("JOURNAL_ACTIVE_LOCALE").unwrap_or_else(|_| "en_US".to_string());
        if !is_valid_locale_code(&active_locale) {
            return Err(JournalError::Config(format!(
                "JOURNAL_ACTIVE_LOCALE {:?} is not a locale code like en_US",
                active_locale
            )));
        }

        Ok(Self {
            db_path: env::var("JOURNAL_DB_PATH")
                .unwrap_or_else(|_| "./data/journal.db".to_string())
                .into(),
            public_dir: env::var("JOURNAL_PUBLIC_DIR")
                .unwrap_or_else(|_| "./data/public".to_string())
                .into(),
            temp_dir: env::var("JOURNAL_TEMP_DIR")
                .unwrap_or_else(|_| "./data/temp".to_string())
                .into(),
            base_url: env::var("JOURNAL_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            active_locale,
        })
    }
}

/// The journal seeded into an empty database.
pub struct JournalConfig {
    pub path: String,
    pub primary_locale: String,
    pub name: String,
    pub description: String,
    pub supported_locales: Vec<String>,
    pub publishing_mode: PublishingMode,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: String::from("ajet"),
            primary_locale: String::from("en_US"),
            name: String::from(
                "African Academic Union - African Journal of Educational Technology",
            ),
            description: String::from("A leading journal in educational technology..."),
            supported_locales: vec![String::from("en_US"), String::from("fr_FR")],
            publishing_mode: PublishingMode::Open,
        }
    }
}

pub fn get_journal_config() -> JournalConfig {
    JournalConfig::default()
}

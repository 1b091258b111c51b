//! Collaborator interfaces the resolver and the issue workflow call through.
//!
//! The SQLite repositories in `db` and the filesystem types here are the
//! shipped implementations; tests substitute in-memory ones.

use crate::errors::JournalError;
use crate::models::issue::{Issue, IssueId};
use crate::models::journal::JournalId;
use crate::models::settings::{SettingType, SettingValue};
use crate::models::temporary_file::TemporaryFile;
use std::collections::BTreeMap;
use std::path::Path;

pub mod locale_registry;
pub mod public_files;

/// Per-entity settings addressed by `(entity_id, name, locale)`.
pub trait SettingsStore {
    /// With `locale = None` a localized setting comes back as a map of
    /// locale → value; a non-localized one as its plain value.
    fn get_setting(
        &self,
        entity_id: i64,
        name: &str,
        locale: Option<&str>,
    ) -> Result<Option<SettingValue>, JournalError>;

    /// Replaces the stored value. A localized value must be an object keyed by locale.
    fn update_setting(
        &self,
        entity_id: i64,
        name: &str,
        value: &SettingValue,
        setting_type: Option<SettingType>,
        is_localized: bool,
    ) -> Result<(), JournalError>;

    fn get_settings(&self, entity_id: i64) -> Result<BTreeMap<String, SettingValue>, JournalError>;
}

pub trait LocaleNameRegistry {
    /// Every installed locale, code → display name.
    fn all_locales(&self) -> BTreeMap<String, String>;
}

pub trait IssueGateway {
    fn new_data_object(&self) -> Issue {
        Issue::default()
    }

    fn insert_issue(&self, issue: &Issue) -> Result<IssueId, JournalError>;

    fn update_issue(&self, issue: &Issue) -> Result<(), JournalError>;
}

pub trait TemporaryFileStore {
    /// Only returns the file when `owner_id` uploaded it.
    fn get_temporary_file(
        &self,
        file_id: i64,
        owner_id: i64,
    ) -> Result<Option<TemporaryFile>, JournalError>;
}

pub trait PublicFileManager {
    /// Extension (with leading dot) for an image MIME type, if it is one we serve.
    fn image_extension(&self, file_type: &str) -> Option<&'static str>;

    fn copy_journal_file(
        &self,
        journal_id: JournalId,
        source_path: &Path,
        dest_file_name: &str,
    ) -> Result<(), JournalError>;
}

//! In-memory collaborators for unit tests.

use crate::errors::JournalError;
use crate::models::issue::{Issue, IssueId};
use crate::models::journal::JournalId;
use crate::models::settings::{SettingType, SettingValue};
use crate::models::temporary_file::TemporaryFile;
use crate::services::public_files::image_extension_for;
use crate::services::{IssueGateway, PublicFileManager, SettingsStore, TemporaryFileStore};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct MemorySettingsStore {
    // (entity, name) -> locale ("" when not localized) -> value
    values: RefCell<HashMap<(i64, String), BTreeMap<String, Value>>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, entity_id: i64, name: &str, value: Value) {
        self.update_setting(entity_id, name, &value, None, false)
            .expect("plain settings always store");
    }

    pub fn put_localized(&self, entity_id: i64, name: &str, values: &[(&str, Value)]) {
        let by_locale: Map<String, Value> = values
            .iter()
            .map(|(locale, value)| (locale.to_string(), value.clone()))
            .collect();
        self.update_setting(entity_id, name, &Value::Object(by_locale), None, true)
            .expect("localized settings always store");
    }

    fn fold(rows: &BTreeMap<String, Value>) -> Option<Value> {
        let localized: Map<String, Value> = rows
            .iter()
            .filter(|(locale, _)| !locale.is_empty())
            .map(|(locale, value)| (locale.clone(), value.clone()))
            .collect();
        if localized.is_empty() {
            rows.get("").cloned()
        } else {
            Some(Value::Object(localized))
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_setting(
        &self,
        entity_id: i64,
        name: &str,
        locale: Option<&str>,
    ) -> Result<Option<SettingValue>, JournalError> {
        let values = self.values.borrow();
        let Some(rows) = values.get(&(entity_id, name.to_string())) else {
            return Ok(None);
        };
        Ok(match locale {
            Some(locale) => rows.get(locale).filter(|v| !v.is_null()).cloned(),
            None => Self::fold(rows),
        })
    }

    fn update_setting(
        &self,
        entity_id: i64,
        name: &str,
        value: &SettingValue,
        _setting_type: Option<SettingType>,
        is_localized: bool,
    ) -> Result<(), JournalError> {
        let mut rows = BTreeMap::new();
        if is_localized {
            let Value::Object(by_locale) = value else {
                return Err(JournalError::InvalidInput(format!(
                    "Localized setting {} must be keyed by locale",
                    name
                )));
            };
            for (locale, locale_value) in by_locale {
                rows.insert(locale.clone(), locale_value.clone());
            }
        } else {
            rows.insert(String::new(), value.clone());
        }
        self.values
            .borrow_mut()
            .insert((entity_id, name.to_string()), rows);
        Ok(())
    }

    fn get_settings(&self, entity_id: i64) -> Result<BTreeMap<String, SettingValue>, JournalError> {
        Ok(self
            .values
            .borrow()
            .iter()
            .filter(|((entity, _), _)| *entity == entity_id)
            .filter_map(|((_, name), rows)| Self::fold(rows).map(|v| (name.clone(), v)))
            .collect())
    }
}

/// One write seen by [`RecordingIssueGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum IssueWrite {
    Insert(Issue),
    Update(Issue),
}

#[derive(Default)]
pub struct RecordingIssueGateway {
    writes: RefCell<Vec<IssueWrite>>,
    last_id: RefCell<i64>,
}

impl RecordingIssueGateway {
    pub fn writes(&self) -> Vec<IssueWrite> {
        self.writes.borrow().clone()
    }

    pub fn last_written(&self) -> Option<Issue> {
        self.writes.borrow().last().map(|write| match write {
            IssueWrite::Insert(issue) | IssueWrite::Update(issue) => issue.clone(),
        })
    }
}

impl IssueGateway for RecordingIssueGateway {
    fn insert_issue(&self, issue: &Issue) -> Result<IssueId, JournalError> {
        let mut last = self.last_id.borrow_mut();
        *last += 1;
        let id = IssueId(*last);
        self.writes.borrow_mut().push(IssueWrite::Insert(issue.clone()));
        Ok(id)
    }

    fn update_issue(&self, issue: &Issue) -> Result<(), JournalError> {
        if issue.id.is_none() {
            return Err(JournalError::InvalidInput("Cannot update issue without ID".to_string()));
        }
        self.writes.borrow_mut().push(IssueWrite::Update(issue.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTemporaryFiles {
    files: Vec<TemporaryFile>,
}

impl MemoryTemporaryFiles {
    pub fn with_file(mut self, file_id: i64, owner_id: i64, file_type: &str) -> Self {
        self.files.push(TemporaryFile {
            file_id,
            owner_id,
            file_path: PathBuf::from(format!("/tmp/uploads/{}.upload", file_id)),
            file_type: file_type.to_string(),
            original_file_name: format!("upload-{}", file_id),
            file_size: 128,
            date_uploaded: None,
        });
        self
    }
}

impl TemporaryFileStore for MemoryTemporaryFiles {
    fn get_temporary_file(
        &self,
        file_id: i64,
        owner_id: i64,
    ) -> Result<Option<TemporaryFile>, JournalError> {
        Ok(self
            .files
            .iter()
            .find(|f| f.file_id == file_id && f.owner_id == owner_id)
            .cloned())
    }
}

/// Records copies instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingPublicFiles {
    pub copies: RefCell<Vec<(JournalId, PathBuf, String)>>,
}

impl PublicFileManager for RecordingPublicFiles {
    fn image_extension(&self, file_type: &str) -> Option<&'static str> {
        image_extension_for(file_type)
    }

    fn copy_journal_file(
        &self,
        journal_id: JournalId,
        source_path: &Path,
        dest_file_name: &str,
    ) -> Result<(), JournalError> {
        self.copies.borrow_mut().push((
            journal_id,
            source_path.to_path_buf(),
            dest_file_name.to_string(),
        ));
        Ok(())
    }
}

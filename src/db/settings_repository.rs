use crate::errors::JournalError;
use crate::models::settings::{SettingType, SettingValue};
use crate::services::SettingsStore;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Journal settings, one row per `(journal_id, locale, setting_name)`.
/// Non-localized settings use the empty locale.
pub struct JournalSettingsRepository {
    conn: Connection,
}

impl JournalSettingsRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    fn decode(raw: Option<String>) -> Result<Option<Value>, JournalError> {
        match raw {
            None => Ok(None),
            Some(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Null => Ok(None),
                value => Ok(Some(value)),
            },
        }
    }

    // Folds rows of one setting into either its plain value or a locale map
    fn fold_rows(rows: Vec<(String, Option<String>)>) -> Result<Option<Value>, JournalError> {
        let mut plain = None;
        let mut localized = Map::new();
        for (locale, raw) in rows {
            let Some(value) = Self::decode(raw)? else {
                continue;
            };
            if locale.is_empty() {
                plain = Some(value);
            } else {
                localized.insert(locale, value);
            }
        }

        if !localized.is_empty() {
            Ok(Some(Value::Object(localized)))
        } else {
            Ok(plain)
        }
    }
}

impl SettingsStore for JournalSettingsRepository {
    fn get_setting(
        &self,
        entity_id: i64,
        name: &str,
        locale: Option<&str>,
    ) -> Result<Option<SettingValue>, JournalError> {
        match locale {
            Some(locale) => {
                let raw: Option<Option<String>> = self
                    .conn
                    .query_row(
                        "SELECT setting_value FROM journal_settings
                         WHERE journal_id = ?1 AND setting_name = ?2 AND locale = ?3",
                        params![entity_id, name, locale],
                        |row| row.get(0),
                    )
                    .optional()?;
                Self::decode(raw.flatten())
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT locale, setting_value FROM journal_settings
                     WHERE journal_id = ?1 AND setting_name = ?2",
                )?;
                let rows = stmt
                    .query_map(params![entity_id, name], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<Result<Vec<(String, Option<String>)>, _>>()?;
                Self::fold_rows(rows)
            }
        }
    }

    fn update_setting(
        &self,
        entity_id: i64,
        name: &str,
        value: &SettingValue,
        setting_type: Option<SettingType>,
        is_localized: bool,
    ) -> Result<(), JournalError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM journal_settings WHERE journal_id = ?1 AND setting_name = ?2",
            params![entity_id, name],
        )?;

        if is_localized {
            let Value::Object(by_locale) = value else {
                return Err(JournalError::InvalidInput(format!(
                    "Localized setting {} must be keyed by locale",
                    name
                )));
            };
            for (locale, locale_value) in by_locale {
                let kind = setting_type.unwrap_or_else(|| SettingType::infer(locale_value));
                tx.execute(
                    "INSERT INTO journal_settings (journal_id, locale, setting_name, setting_value, setting_type)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        entity_id,
                        locale,
                        name,
                        serde_json::to_string(locale_value)?,
                        kind.to_string()
                    ],
                )?;
            }
        } else {
            let kind = setting_type.unwrap_or_else(|| SettingType::infer(value));
            tx.execute(
                "INSERT INTO journal_settings (journal_id, locale, setting_name, setting_value, setting_type)
                 VALUES (?1, '', ?2, ?3, ?4)",
                params![entity_id, name, serde_json::to_string(value)?, kind.to_string()],
            )?;
        }

        tx.commit()?;
        debug!("Updated setting {} for journal {}", name, entity_id);
        Ok(())
    }

    fn get_settings(&self, entity_id: i64) -> Result<BTreeMap<String, SettingValue>, JournalError> {
        let mut stmt = self.conn.prepare(
            "SELECT setting_name, locale, setting_value FROM journal_settings
             WHERE journal_id = ?1 ORDER BY setting_name, locale",
        )?;
        let rows = stmt
            .query_map(params![entity_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<(String, String, Option<String>)>, _>>()?;

        let mut grouped: BTreeMap<String, Vec<(String, Option<String>)>> = BTreeMap::new();
        for (name, locale, raw) in rows {
            grouped.entry(name).or_default().push((locale, raw));
        }

        let mut settings = BTreeMap::new();
        for (name, rows) in grouped {
            if let Some(value) = Self::fold_rows(rows)? {
                settings.insert(name, value);
            }
        }
        Ok(settings)
    }
}

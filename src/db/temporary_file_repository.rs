use crate::errors::JournalError;
use crate::models::temporary_file::TemporaryFile;
use crate::services::TemporaryFileStore;
use crate::utils;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Result as RusqliteResult};
use std::path::{Path, PathBuf};

pub struct TemporaryFileRepository {
    conn: Connection,
    temp_dir: PathBuf,
}

impl TemporaryFileRepository {
    pub fn new(conn: Connection, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            conn,
            temp_dir: temp_dir.into(),
        }
    }

    fn map_row_to_temporary_file(row: &rusqlite::Row) -> RusqliteResult<TemporaryFile> {
        let file_path: String = row.get(2)?;
        let date_uploaded_str: Option<String> = row.get(6)?;

        let date_uploaded = date_uploaded_str.and_then(|s| {
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        });

        Ok(TemporaryFile {
            file_id: row.get(0)?,
            owner_id: row.get(1)?,
            file_path: PathBuf::from(file_path),
            file_type: row.get(3)?,
            file_size: row.get(4)?,
            original_file_name: row.get(5)?,
            date_uploaded,
        })
    }

    /// Parks an upload for `owner_id` and records it.
    pub fn store_temporary_file(
        &self,
        owner_id: i64,
        original_file_name: &str,
        file_type: &str,
        bytes: &[u8],
    ) -> Result<TemporaryFile, JournalError> {
        let file_path = utils::save_bytes(&self.temp_dir, original_file_name, bytes)?;
        let path_str = path_to_str(&file_path)?;

        self.conn.execute(
            "INSERT INTO temporary_files (user_id, file_path, file_type, file_size, original_file_name)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![owner_id, path_str, file_type, bytes.len() as i64, original_file_name],
        )?;
        let file_id = self.conn.last_insert_rowid();
        info!(
            "Stored temporary file {} ({}) for user {}",
            file_id, original_file_name, owner_id
        );

        self.get_temporary_file(file_id, owner_id)?.ok_or_else(|| {
            JournalError::DatabaseError(format!("Temporary file {} vanished after insert", file_id))
        })
    }
}

fn path_to_str(path: &Path) -> Result<&str, JournalError> {
    path.to_str().ok_or_else(|| {
        JournalError::StorageError(format!("Temporary file path {:?} is not valid UTF-8", path))
    })
}

impl TemporaryFileStore for TemporaryFileRepository {
    fn get_temporary_file(
        &self,
        file_id: i64,
        owner_id: i64,
    ) -> Result<Option<TemporaryFile>, JournalError> {
        self.conn
            .query_row(
                "SELECT file_id, user_id, file_path, file_type, file_size, original_file_name, date_uploaded
                 FROM temporary_files WHERE file_id = ?1 AND user_id = ?2",
                params![file_id, owner_id],
                Self::map_row_to_temporary_file,
            )
            .optional()
            .map_err(|e| JournalError::DatabaseError(e.to_string()))
    }
}

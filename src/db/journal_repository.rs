use crate::errors::JournalError;
use crate::models::journal::{Journal, JournalId, NewJournal};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Result as RusqliteResult};

pub struct JournalRepository {
    conn: Connection,
}

impl JournalRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    fn map_row_to_journal(row: &rusqlite::Row) -> RusqliteResult<Journal> {
        Ok(Journal {
            id: JournalId(row.get(0)?),
            path: row.get(1)?,
            sequence: row.get(2)?,
            primary_locale: row.get(3)?,
            enabled: row.get(4)?,
        })
    }

    const SELECT_FIELDS: &'static str = "journal_id, path, seq, primary_locale, enabled";

    pub fn insert_journal(&self, journal: &NewJournal) -> Result<Journal, JournalError> {
        let result = self.conn.execute(
            "INSERT INTO journals (path, seq, primary_locale, enabled) VALUES (?1, ?2, ?3, ?4)",
            params![
                journal.path,
                journal.sequence,
                journal.primary_locale,
                journal.enabled,
            ],
        );

        match result {
            Ok(_) => {
                let id = JournalId(self.conn.last_insert_rowid());
                info!("Created journal {} with path {:?}", id, journal.path);
                Ok(Journal {
                    id,
                    path: journal.path.clone(),
                    sequence: journal.sequence,
                    enabled: journal.enabled,
                    primary_locale: journal.primary_locale.clone(),
                })
            }
            Err(e) => {
                if e.to_string()
                    .contains("UNIQUE constraint failed: journals.path")
                {
                    Err(JournalError::InvalidInput(format!(
                        "A journal with path {:?} already exists.",
                        journal.path
                    )))
                } else {
                    Err(JournalError::DatabaseError(e.to_string()))
                }
            }
        }
    }

    pub fn get_journal_by_id(&self, id: JournalId) -> Result<Journal, JournalError> {
        let query = format!(
            "SELECT {} FROM journals WHERE journal_id = ?1",
            Self::SELECT_FIELDS
        );
        self.conn
            .query_row(&query, params![id.0], Self::map_row_to_journal)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    JournalError::NotFound(format!("Journal with ID {} not found", id))
                }
                _ => JournalError::DatabaseError(e.to_string()),
            })
    }

    pub fn get_journal_by_path(&self, path: &str) -> Result<Option<Journal>, JournalError> {
        let query = format!("SELECT {} FROM journals WHERE path = ?1", Self::SELECT_FIELDS);
        self.conn
            .query_row(&query, params![path], Self::map_row_to_journal)
            .optional()
            .map_err(|e| JournalError::DatabaseError(e.to_string()))
    }

    // Site table of contents order
    pub fn get_enabled_journals(&self) -> Result<Vec<Journal>, JournalError> {
        let query = format!(
            "SELECT {} FROM journals WHERE enabled = 1 ORDER BY seq, journal_id",
            Self::SELECT_FIELDS
        );
        let mut stmt = self
            .conn
            .prepare(&query)
            .map_err(|e| JournalError::DatabaseError(e.to_string()))?;

        let journal_iter = stmt
            .query_map([], Self::map_row_to_journal)
            .map_err(|e| JournalError::DatabaseError(e.to_string()))?;

        journal_iter
            .collect::<Result<Vec<Journal>, _>>()
            .map_err(|e| JournalError::DatabaseError(e.to_string()))
    }
}

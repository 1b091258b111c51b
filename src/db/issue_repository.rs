use crate::errors::JournalError;
use crate::models::issue::{AccessStatus, Issue, IssueId};
use crate::models::journal::JournalId;
use crate::models::locale::LocalizedText;
use crate::services::IssueGateway;
use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, Result as RusqliteResult, Transaction};

// Localized issue fields as named in issue_settings
const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const COVER_IMAGE: &str = "coverImage";
const COVER_IMAGE_ALT_TEXT: &str = "coverImageAltText";

pub struct IssueRepository {
    conn: Connection,
}

fn to_timestamp(date: Option<DateTime<Utc>>) -> Option<i64> {
    date.map(|d| d.timestamp())
}

fn from_timestamp(timestamp: Option<i64>) -> Option<DateTime<Utc>> {
    timestamp.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
}

impl IssueRepository {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    fn map_row_to_issue(row: &rusqlite::Row) -> RusqliteResult<Issue> {
        let access_code: i64 = row.get(8)?;

        Ok(Issue {
            id: Some(IssueId(row.get(0)?)),
            journal_id: Some(JournalId(row.get(1)?)),
            volume: row.get(2)?,
            number: row.get(3)?,
            year: row.get(4)?,
            published: row.get(5)?,
            current: row.get(6)?,
            date_published: from_timestamp(row.get(7)?),
            access_status: AccessStatus::from_code(access_code).unwrap_or_default(),
            open_access_date: from_timestamp(row.get(9)?),
            show_volume: row.get(10)?,
            show_number: row.get(11)?,
            show_year: row.get(12)?,
            show_title: row.get(13)?,
            ..Issue::default()
        })
    }

    const SELECT_FIELDS: &'static str = "issue_id, journal_id, volume, number, year, published, current, \
         date_published, access_status, open_access_date, show_volume, show_number, show_year, show_title";

    fn load_settings(&self, issue: &mut Issue) -> Result<(), JournalError> {
        let Some(id) = issue.id else {
            return Ok(());
        };
        let mut stmt = self.conn.prepare(
            "SELECT setting_name, locale, setting_value FROM issue_settings WHERE issue_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![id.0], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<(String, String, String)>, _>>()?;

        for (name, locale, value) in rows {
            let field = match name.as_str() {
                TITLE => &mut issue.title,
                DESCRIPTION => &mut issue.description,
                COVER_IMAGE => &mut issue.cover_image,
                COVER_IMAGE_ALT_TEXT => &mut issue.cover_image_alt_text,
                other => {
                    debug!("Skipping unknown issue setting {} on issue {}", other, id);
                    continue;
                }
            };
            field.set(locale, value);
        }
        Ok(())
    }

    fn write_settings(tx: &Transaction, id: IssueId, issue: &Issue) -> Result<(), JournalError> {
        tx.execute("DELETE FROM issue_settings WHERE issue_id = ?1", params![id.0])?;

        let fields: [(&str, &LocalizedText); 4] = [
            (TITLE, &issue.title),
            (DESCRIPTION, &issue.description),
            (COVER_IMAGE, &issue.cover_image),
            (COVER_IMAGE_ALT_TEXT, &issue.cover_image_alt_text),
        ];
        for (name, text) in fields {
            for (locale, value) in text.iter() {
                tx.execute(
                    "INSERT INTO issue_settings (issue_id, locale, setting_name, setting_value)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id.0, locale, name, value],
                )?;
            }
        }
        Ok(())
    }

    pub fn get_issue_by_id(&self, id: IssueId) -> Result<Issue, JournalError> {
        let query = format!("SELECT {} FROM issues WHERE issue_id = ?1", Self::SELECT_FIELDS);
        let mut issue = self
            .conn
            .query_row(&query, params![id.0], Self::map_row_to_issue)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    JournalError::NotFound(format!("Issue with ID {} not found", id))
                }
                _ => JournalError::DatabaseError(e.to_string()),
            })?;
        self.load_settings(&mut issue)?;
        Ok(issue)
    }

    // Newest first, the order of the back-issue archive
    pub fn get_issues_by_journal(&self, journal_id: JournalId) -> Result<Vec<Issue>, JournalError> {
        let query = format!(
            "SELECT {} FROM issues WHERE journal_id = ?1
             ORDER BY year DESC, volume DESC, number DESC, issue_id DESC",
            Self::SELECT_FIELDS
        );
        let mut stmt = self.conn.prepare(&query)?;
        let mut issues = stmt
            .query_map(params![journal_id.0], Self::map_row_to_issue)?
            .collect::<Result<Vec<Issue>, _>>()?;

        for issue in issues.iter_mut() {
            self.load_settings(issue)?;
        }
        Ok(issues)
    }
}

impl IssueGateway for IssueRepository {
    fn insert_issue(&self, issue: &Issue) -> Result<IssueId, JournalError> {
        let journal_id = issue.journal_id.ok_or_else(|| {
            JournalError::InvalidInput("Cannot insert an issue without a journal".to_string())
        })?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO issues (journal_id, volume, number, year, published, current,
                 date_published, access_status, open_access_date,
                 show_volume, show_number, show_year, show_title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                journal_id.0,
                issue.volume,
                issue.number,
                issue.year,
                issue.published,
                issue.current,
                to_timestamp(issue.date_published),
                issue.access_status.code(),
                to_timestamp(issue.open_access_date),
                issue.show_volume,
                issue.show_number,
                issue.show_year,
                issue.show_title,
            ],
        )?;
        let id = IssueId(tx.last_insert_rowid());
        Self::write_settings(&tx, id, issue)?;
        tx.commit()?;

        info!("Inserted issue {} for journal {}", id, journal_id);
        Ok(id)
    }

    fn update_issue(&self, issue: &Issue) -> Result<(), JournalError> {
        let id = issue.id.ok_or_else(|| {
            JournalError::InvalidInput("Cannot update issue without ID".to_string())
        })?;
        let journal_id = issue.journal_id.ok_or_else(|| {
            JournalError::InvalidInput("Cannot update an issue without a journal".to_string())
        })?;

        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "UPDATE issues SET
                 journal_id = ?1, volume = ?2, number = ?3, year = ?4, published = ?5,
                 current = ?6, date_published = ?7, access_status = ?8, open_access_date = ?9,
                 show_volume = ?10, show_number = ?11, show_year = ?12, show_title = ?13
             WHERE issue_id = ?14",
            params![
                journal_id.0,
                issue.volume,
                issue.number,
                issue.year,
                issue.published,
                issue.current,
                to_timestamp(issue.date_published),
                issue.access_status.code(),
                to_timestamp(issue.open_access_date),
                issue.show_volume,
                issue.show_number,
                issue.show_year,
                issue.show_title,
                id.0,
            ],
        )?;

        if rows == 0 {
            return Err(JournalError::NotFound(format!(
                "Issue with ID {} not found for update",
                id
            )));
        }

        Self::write_settings(&tx, id, issue)?;
        tx.commit()?;

        info!("Updated issue {}", id);
        Ok(())
    }
}

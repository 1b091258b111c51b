use log::warn;
use rusqlite::Connection;
use std::path::Path;

pub fn init_db(path: &Path) -> Result<Connection, rusqlite::Error> {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Failed to create database directory {:?}: {}", parent, e);
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS journals (
            journal_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            path           TEXT NOT NULL UNIQUE,
            seq            REAL NOT NULL DEFAULT 0,
            primary_locale TEXT NOT NULL,
            enabled        INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS journal_settings (
            journal_id    INTEGER NOT NULL REFERENCES journals(journal_id) ON DELETE CASCADE,
            locale        TEXT NOT NULL DEFAULT '',
            setting_name  TEXT NOT NULL,
            setting_value TEXT,
            setting_type  TEXT NOT NULL,
            PRIMARY KEY (journal_id, locale, setting_name)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS issues (
            issue_id         INTEGER PRIMARY KEY AUTOINCREMENT,
            journal_id       INTEGER NOT NULL REFERENCES journals(journal_id) ON DELETE CASCADE,
            volume           INTEGER NOT NULL DEFAULT 0,
            number           TEXT NOT NULL DEFAULT '0',
            year             INTEGER NOT NULL DEFAULT 0,
            published        INTEGER NOT NULL DEFAULT 0,
            current          INTEGER NOT NULL DEFAULT 0,
            date_published   INTEGER,
            access_status    INTEGER NOT NULL DEFAULT 1,
            open_access_date INTEGER,
            show_volume      INTEGER NOT NULL DEFAULT 0,
            show_number      INTEGER NOT NULL DEFAULT 0,
            show_year        INTEGER NOT NULL DEFAULT 0,
            show_title       INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS issue_settings (
            issue_id      INTEGER NOT NULL REFERENCES issues(issue_id) ON DELETE CASCADE,
            locale        TEXT NOT NULL,
            setting_name  TEXT NOT NULL,
            setting_value TEXT NOT NULL,
            PRIMARY KEY (issue_id, locale, setting_name)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS temporary_files (
            file_id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id            INTEGER NOT NULL,
            file_path          TEXT NOT NULL,
            file_type          TEXT NOT NULL,
            file_size          INTEGER NOT NULL,
            original_file_name TEXT NOT NULL,
            date_uploaded      DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    Ok(conn)
}

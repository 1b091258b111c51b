use crate::models::validation::FieldError;
use std::fmt;

#[derive(Debug)]
pub enum JournalError {
    DatabaseError(String),
    StorageError(String),
    NotFound(String),
    Validation(Vec<FieldError>),
    InvalidInput(String),
    Config(String),
}

// Display stays manual so validation lists render as one line
impl fmt::Display for JournalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JournalError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            JournalError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            JournalError::NotFound(msg) => write!(f, "Not found error: {}", msg),
            JournalError::Validation(errors) => {
                let message = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message_key))
                    .collect::<Vec<String>>()
                    .join("; ");
                write!(f, "Validation error: {}", message)
            }
            JournalError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            JournalError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for JournalError {}

impl JournalError {
    /// Field errors carried by a validation failure, empty for every other kind.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            JournalError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<Vec<FieldError>> for JournalError {
    fn from(errors: Vec<FieldError>) -> Self {
        JournalError::Validation(errors)
    }
}

impl From<rusqlite::Error> for JournalError {
    fn from(err: rusqlite::Error) -> Self {
        JournalError::DatabaseError(err.to_string())
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::DatabaseError(format!("Malformed setting value: {}", err))
    }
}

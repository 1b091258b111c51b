use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An upload parked in temporary storage until a form is saved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TemporaryFile {
    pub file_id: i64,
    pub owner_id: i64,
    pub file_path: PathBuf,
    pub file_type: String,
    pub original_file_name: String,
    pub file_size: i64,
    pub date_uploaded: Option<DateTime<Utc>>,
}

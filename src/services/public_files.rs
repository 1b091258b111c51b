use crate::errors::JournalError;
use crate::models::journal::JournalId;
use crate::services::PublicFileManager;
use crate::utils;
use log::info;
use std::path::{Path, PathBuf};

/// Public (web-served) files stored under `<root>/journals/<journal_id>/`.
#[derive(Debug, Clone)]
pub struct FsPublicFileManager {
    root: PathBuf,
}

impl FsPublicFileManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn journal_files_path(&self, journal_id: JournalId) -> PathBuf {
        self.root.join("journals").join(journal_id.to_string())
    }
}

pub fn image_extension_for(file_type: &str) -> Option<&'static str> {
    match file_type {
        "image/gif" => Some(".gif"),
        "image/jpeg" | "image/pjpeg" => Some(".jpg"),
        "image/png" | "image/x-png" => Some(".png"),
        "image/vnd.microsoft.icon" | "image/x-icon" | "image/x-ico" | "image/ico" => Some(".ico"),
        "application/x-shockwave-flash" => Some(".swf"),
        "image/svg+xml" => Some(".svg"),
        _ => None,
    }
}

impl PublicFileManager for FsPublicFileManager {
    fn image_extension(&self, file_type: &str) -> Option<&'static str> {
        image_extension_for(file_type)
    }

    fn copy_journal_file(
        &self,
        journal_id: JournalId,
        source_path: &Path,
        dest_file_name: &str,
    ) -> Result<(), JournalError> {
        let dest = utils::copy_into(
            &self.journal_files_path(journal_id),
            source_path,
            dest_file_name,
        )?;
        info!("Copied {:?} into public storage at {:?}", source_path, dest);
        Ok(())
    }
}

pub mod issue_repository;
pub mod journal_repository;
pub mod schema;
pub mod settings_repository;
pub mod temporary_file_repository;

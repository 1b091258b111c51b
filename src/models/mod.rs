pub mod issue;
pub mod journal;
pub mod locale;
pub mod settings;
pub mod temporary_file;
pub mod validation;

//! Journal settings resolution and issue editing for an academic journal
//! publishing system.

pub mod config;
pub mod db;
pub mod errors;
pub mod issue_form;
pub mod journal_settings;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;

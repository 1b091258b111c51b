use serde::Serialize;

/// A user-correctable problem with one form field. `message_key` is a
/// translation key, not rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message_key: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message_key: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message_key: message_key.into(),
        }
    }
}

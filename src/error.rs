use crate::field::FieldId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Failed to parse JSON Schema: {0}")]
    ParseError(String),

    #[error("Failed to parse model: {0}")]
    ModelError(String),

    #[error("Invalid form options: {0}")]
    ConfigError(String),

    #[error("No field with id {0}")]
    FieldNotFound(FieldId),

    #[error("Field {0} is not an item list")]
    NotAnArray(FieldId),

    #[error("Array {field} cannot {action}: {reason}")]
    ArrayLimit {
        field: FieldId,
        action: &'static str,
        reason: String,
    },

    #[error("Array {0} has no schema for new items")]
    NoItemSchema(FieldId),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

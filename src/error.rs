use thiserror::Error;

/// Errors surfaced by the grid core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// No items were supplied, or every supplied item was rejected.
    #[error("no image data supplied")]
    MissingData,

    /// An item cannot be laid out. The controller skips it and keeps going.
    #[error("invalid item {id:?}: {reason}")]
    InvalidItem { id: String, reason: String },

    /// A setting holds a value the layout cannot work with.
    #[error("invalid configuration: {field} = {value}")]
    Configuration { field: &'static str, value: String },
}

impl GridError {
    pub(crate) fn invalid_item(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidItem {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(field: &'static str, value: impl ToString) -> Self {
        Self::Configuration {
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;

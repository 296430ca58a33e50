//! Error types for FleetUI.
//!
//! Domain operations (validation, sessions, list mutations, configuration)
//! return [`Error`]. The binary edges (`main`, `run`, command handlers) wrap
//! these in `anyhow` with context, the same way the rest of the app does.

use thiserror::Error;

/// The main error type for FleetUI domain operations.
#[derive(Error, Debug)]
pub enum Error {
    // === User input ===
    /// One or more form fields failed validation.
    #[error("invalid data: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Wrong email/password pair. Deliberately generic.
    #[error("Invalid credentials")]
    Authentication,

    /// A record id was not present in its list.
    #[error("{entity} #{id} not found")]
    NotFound {
        /// Entity name, e.g. "vehicle".
        entity: &'static str,
        /// The missing id.
        id: u32,
    },

    /// A domain rule rejected an otherwise well-formed request.
    #[error("{0}")]
    BusinessRule(String),

    // === Configuration ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O and serialization ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A specialized Result type for FleetUI operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a business-rule error.
    #[must_use]
    pub fn business(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    /// Create a single-message validation error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// The per-field messages of a validation error, or the display string
    /// for every other variant.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Headline used for the error toast.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Invalid data",
            Self::Authentication => "Authentication error",
            Self::NotFound { .. } => "Not found",
            Self::BusinessRule(_) => "Not allowed",
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => "Configuration error",
            Self::Io(_) | Self::Json(_) | Self::Csv(_) => "Unexpected error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_joins_messages() {
        let err = Error::Validation(vec!["Plate is required".into(), "Model is required".into()]);
        assert_eq!(
            err.to_string(),
            "invalid data: Plate is required, Model is required"
        );
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_authentication_is_generic() {
        assert_eq!(Error::Authentication.to_string(), "Invalid credentials");
        assert_eq!(Error::Authentication.title(), "Authentication error");
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            entity: "vehicle",
            id: 7,
        };
        assert_eq!(err.to_string(), "vehicle #7 not found");
    }

    #[test]
    fn test_messages_for_non_validation() {
        let err = Error::business("payment exceeds remaining amount");
        assert_eq!(err.messages(), vec!["payment exceeds remaining amount"]);
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }
}

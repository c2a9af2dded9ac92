//! Error types for Horizon Trellis widgets.

use horizon_trellis_core::DomError;

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by widget operations.
///
/// Every error is reported synchronously to the caller of the failing
/// operation. Failures of caller-supplied search functions are never
/// surfaced here; the searcher recovers from them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bound element cannot back this widget (wrong element kind or a
    /// missing capability). No widget is produced.
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// The `data-options` attribute of the bound element is not valid JSON
    /// for the widget's options.
    #[error("Invalid widget options: {source}")]
    InvalidOptions {
        #[source]
        source: serde_json::Error,
    },

    /// A value-keyed operation referenced a value with no option.
    #[error("No option with value '{value}'")]
    NotFound { value: String },

    /// The operation needs the rendered widget but `initialize()` has not run.
    #[error("Widget has not been initialized")]
    NotInitialized,

    /// A document tree operation failed.
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl Error {
    /// Create a configuration error.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(value: impl Into<String>) -> Self {
        Self::NotFound {
            value: value.into(),
        }
    }

    /// Whether this is a construction/configuration contract violation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::InvalidOptions { .. })
    }

    /// Whether this reports an unknown option value.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Error returned by a caller-supplied search function.
///
/// The searcher treats it as "no results" and logs it; it never reaches the
/// application through widget operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("search function failed: {message}")]
pub struct SearchFunctionError {
    message: String,
}

impl SearchFunctionError {
    /// Create a search function error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::configuration("not a select").is_configuration());
        assert!(Error::not_found("kiwi").is_not_found());
        assert!(!Error::NotInitialized.is_configuration());

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(Error::InvalidOptions { source: json_err }.is_configuration());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::not_found("kiwi").to_string(),
            "No option with value 'kiwi'"
        );
        assert_eq!(
            SearchFunctionError::new("backend offline").to_string(),
            "search function failed: backend offline"
        );
    }
}

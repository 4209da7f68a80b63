use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("View '{name}' not found")]
    QueryNotFound { name: String },

    #[error("View '{name}' could not be loaded: {reason}")]
    MalformedQuery { name: String, reason: String },

    #[error("Display '{display}' not found in view '{view}'")]
    DisplayNotFound { view: String, display: String },

    #[error("View execution failed: {message}")]
    ExecutionError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Resolution,
    Execution,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    High,
    Critical,
}

impl ListingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ListingError::ConfigError { .. }
            | ListingError::ConfigValidationError { .. }
            | ListingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ListingError::QueryNotFound { .. }
            | ListingError::MalformedQuery { .. }
            | ListingError::DisplayNotFound { .. } => ErrorCategory::Resolution,
            ListingError::SerializationError(_)
            | ListingError::CsvError(_)
            | ListingError::ExecutionError { .. } => ErrorCategory::Execution,
            ListingError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 解析失敗會被降級為空結果
            ErrorCategory::Resolution => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Execution => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Faults the executor absorbs into an empty listing.
    pub fn is_resolution_fault(&self) -> bool {
        self.category() == ErrorCategory::Resolution
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ListingError::QueryNotFound { .. } => {
                "Check the view name and that its definition exists in the views directory"
            }
            ListingError::MalformedQuery { .. } => {
                "Fix the view definition file (displays, items_per_page, TOML syntax)"
            }
            ListingError::DisplayNotFound { .. } => {
                "Check the display id against the displays declared by the view"
            }
            ListingError::ConfigError { .. }
            | ListingError::ConfigValidationError { .. }
            | ListingError::InvalidConfigValueError { .. } => {
                "Review the listing configuration file and command line flags"
            }
            ListingError::CsvError(_) => "Make sure the view dataset is a valid CSV file",
            ListingError::IoError(_) => "Check that the referenced files exist and are readable",
            ListingError::SerializationError(_) | ListingError::ExecutionError { .. } => {
                "Inspect the view dataset and retry with --verbose for details"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Resolution => format!("Listing unavailable: {}", self),
            ErrorCategory::Execution => format!("Listing failed: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;

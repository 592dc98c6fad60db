use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid rating '{value}' for '{question}'")]
    InvalidRating { question: String, value: String },

    #[error("Template '{name}' is malformed: expected a string, found {found}")]
    MalformedTemplate { name: String, found: String },

    #[error("Backend returned HTTP {status}: {body}")]
    TransportError { status: u16, body: String },

    #[error("Unexpected backend response: {message}")]
    ResponseFormatError { message: String },

    #[error("Survey was not sent ({cause}) and could not be backed up: {backup}")]
    BackupFailed { cause: String, backup: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Storage,
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SurveyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SurveyError::HttpError(_)
            | SurveyError::TransportError { .. }
            | SurveyError::ResponseFormatError { .. } => ErrorCategory::Network,
            SurveyError::ZipError(_)
            | SurveyError::CsvError(_)
            | SurveyError::IoError(_)
            | SurveyError::SerializationError(_)
            | SurveyError::BackupFailed { .. } => ErrorCategory::Storage,
            SurveyError::ConfigValidationError { .. }
            | SurveyError::InvalidConfigValueError { .. }
            | SurveyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SurveyError::ValidationError { .. } | SurveyError::InvalidRating { .. } => {
                ErrorCategory::Input
            }
            SurveyError::MalformedTemplate { .. } => ErrorCategory::Template,
        }
    }

    /// Submission failures are recoverable from the backup log, so they rank
    /// below configuration and template problems.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Template => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SurveyError::HttpError(_) | SurveyError::TransportError { .. } => {
                "Check that the Apps Script web app URL is correct and deployed with 'Anyone' access; the response was kept in the backup log"
            }
            SurveyError::ResponseFormatError { .. } => {
                "Test the Apps Script directly in a browser and check that it returns JSON with \"success\": true"
            }
            SurveyError::ValidationError { .. } => "Rate at least one aspect of the museum",
            SurveyError::InvalidRating { .. } => {
                "Use question=value pairs such as overall-satisfaction=4 with values from 1 to 5"
            }
            SurveyError::MalformedTemplate { .. } => {
                "Every entry of the extra templates table must be a string"
            }
            SurveyError::ConfigValidationError { .. }
            | SurveyError::InvalidConfigValueError { .. }
            | SurveyError::MissingConfigError { .. } => {
                "Fix the museum configuration file and try again"
            }
            SurveyError::ZipError(_) | SurveyError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            SurveyError::BackupFailed { .. } => {
                "The response is lost; check that the backup directory is writable before collecting more surveys"
            }
            SurveyError::CsvError(_) | SurveyError::SerializationError(_) => {
                "The backup log may be corrupted; inspect museumSurveyBackup.json manually"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Survey could not be sent: {}", self),
            ErrorCategory::Input => format!("Survey is incomplete: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Template => format!("Template problem: {}", self),
            ErrorCategory::Storage => format!("File operation failed: {}", self),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SurveyError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

impl From<toml::de::Error> for SurveyError {
    fn from(e: toml::de::Error) -> Self {
        SurveyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_medium_severity() {
        let err = SurveyError::TransportError {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("HTTP 500"));
    }

    #[test]
    fn test_not_found_detection() {
        let err = SurveyError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(err.is_not_found());
        assert!(!SurveyError::ValidationError {
            message: "x".to_string()
        }
        .is_not_found());
    }
}

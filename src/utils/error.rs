use thiserror::Error;

/// 上傳檔案無法辨識副檔名時顯示給使用者的訊息
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Unsupported file type";

/// 上傳檔案解析失敗時顯示給使用者的訊息
pub const PROCESSING_FAILED_MESSAGE: &str = "There was an error processing this file.";

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Unsupported file type: {filename}")]
    UnsupportedFileType { filename: String },

    #[error("Malformed upload: {message}")]
    MalformedUpload { message: String },

    #[error("Base64 decoding failed: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet processing error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Missing required column '{column}' (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("XLSX writing error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Transform,
    Output,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TransformError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedFileType { .. }
            | Self::MalformedUpload { .. }
            | Self::Base64Error(_)
            | Self::CsvError(_)
            | Self::SpreadsheetError(_)
            | Self::ParseError { .. } => ErrorCategory::Input,
            Self::MissingColumn { .. } => ErrorCategory::Transform,
            Self::XlsxError(_) | Self::NotFound { .. } | Self::InvalidPath { .. } => {
                ErrorCategory::Output
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Transform => ErrorSeverity::Medium,
            ErrorCategory::Output | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 解碼階段的錯誤只回傳訊息給使用者，不視為請求失敗
    pub fn is_rejection(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::UnsupportedFileType { .. } => UNSUPPORTED_FILE_MESSAGE.to_string(),
            e if e.is_rejection() => PROCESSING_FAILED_MESSAGE.to_string(),
            Self::MissingColumn { column, .. } => {
                format!("The uploaded file has no '{}' column.", column)
            }
            Self::NotFound { .. } => "The requested file does not exist yet.".to_string(),
            Self::InvalidPath { .. } => "The requested path is not allowed.".to_string(),
            Self::XlsxError(_) => "The transformed workbook could not be written.".to_string(),
            Self::IoError(_) => "A file system error occurred.".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType { .. } => "Upload a .csv, .xls or .xlsx file",
            Self::MissingColumn { .. } => {
                "Check that the file has groupid_pickup, groupid_delivery and tags columns"
            }
            e if e.is_rejection() => "Check that the file is not corrupt and re-export it",
            Self::NotFound { .. } => "Submit a file first, then download the result",
            Self::InvalidPath { .. } => "Use the download link returned by the upload",
            Self::XlsxError(_) | Self::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            _ => "Check the configuration file and command line arguments",
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_are_rejections() {
        let unsupported = TransformError::UnsupportedFileType {
            filename: "notes.txt".to_string(),
        };
        assert!(unsupported.is_rejection());
        assert_eq!(unsupported.user_friendly_message(), "Unsupported file type");

        let parse = TransformError::ParseError {
            message: "No columns to parse from file".to_string(),
        };
        assert!(parse.is_rejection());
        assert_eq!(
            parse.user_friendly_message(),
            "There was an error processing this file."
        );
    }

    #[test]
    fn test_missing_column_is_not_a_rejection() {
        let err = TransformError::MissingColumn {
            column: "tags".to_string(),
            available: vec!["groupid_pickup".to_string(), "groupid_delivery".to_string()],
        };
        assert!(!err.is_rejection());
        assert_eq!(err.category(), ErrorCategory::Transform);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(
            err.to_string(),
            "Missing required column 'tags' (available: groupid_pickup, groupid_delivery)"
        );
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = TransformError::from(std::io::Error::other("disk full"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}

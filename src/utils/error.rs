use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("XML write error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Worksheet '{name}' not found (available: {})", available.join(", "))]
    MissingSheet { name: String, available: Vec<String> },

    #[error("Worksheet '{sheet}' row {row} has {width} cells but the header has {expected}")]
    RowTooShort {
        sheet: String,
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("{} detail row group(s) match no invoice: {}", keys.len(), keys.join(", "))]
    UnmatchedDetails { keys: Vec<String> },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Workbook,
    Data,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::WorkbookError(_) | EtlError::MissingSheet { .. } => {
                ErrorCategory::Workbook
            }
            EtlError::RowTooShort { .. } | EtlError::UnmatchedDetails { .. } => {
                ErrorCategory::Data
            }
            EtlError::XmlError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Workbook | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io | ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::IoError(_) => {
                "Check that the input file exists and the output folder is writable".to_string()
            }
            EtlError::WorkbookError(_) => {
                "Open the file in Excel and save it again as .xlsx".to_string()
            }
            EtlError::MissingSheet { name, .. } => format!(
                "Use the DJP CoreTax template; it must contain a sheet named '{}'",
                name
            ),
            EtlError::RowTooShort { sheet, row, .. } => format!(
                "Fill or clear row {} of sheet '{}' so it spans every header column",
                row, sheet
            ),
            EtlError::UnmatchedDetails { .. } => {
                "Fix the 'Baris' values in DetailFaktur or rerun with --unmatched ignore"
                    .to_string()
            }
            EtlError::XmlError(_) | EtlError::SerializationError(_) => {
                "Retry the conversion; if it persists, report the input workbook".to_string()
            }
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Review the '{}' setting in the configuration file", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read or write a file: {}", self),
            ErrorCategory::Workbook => format!("The workbook could not be read: {}", self),
            ErrorCategory::Data => format!("The workbook data is inconsistent: {}", self),
            ErrorCategory::Output => format!("The XML could not be produced: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

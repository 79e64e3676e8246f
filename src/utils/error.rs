use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Search provider error: {message}")]
    SearchProviderError { message: String },

    #[error("Extraction provider authentication failed")]
    ExtractionAuthError,

    #[error("Extraction provider error: {message}")]
    ExtractionProviderError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Source,
    Search,
    Extraction,
    Output,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EnrichError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EnrichError::ApiError(_) => ErrorCategory::Network,
            EnrichError::CsvError(_) | EnrichError::SourceUnavailable { .. } => {
                ErrorCategory::Source
            }
            EnrichError::IoError(_) | EnrichError::SerializationError(_) => ErrorCategory::Output,
            EnrichError::SearchProviderError { .. } => ErrorCategory::Search,
            EnrichError::ExtractionAuthError | EnrichError::ExtractionProviderError { .. } => {
                ErrorCategory::Extraction
            }
            EnrichError::TemplateError { .. }
            | EnrichError::MissingConfigError { .. }
            | EnrichError::InvalidConfigValueError { .. }
            | EnrichError::ConfigValidationError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 缺少必要密鑰時直接中止，見 Secrets::from_env
            EnrichError::MissingConfigError { .. } => ErrorSeverity::Critical,
            EnrichError::SourceUnavailable { .. }
            | EnrichError::CsvError(_)
            | EnrichError::IoError(_)
            | EnrichError::SerializationError(_)
            | EnrichError::InvalidConfigValueError { .. }
            | EnrichError::ConfigValidationError { .. }
            | EnrichError::TemplateError { .. } => ErrorSeverity::High,
            EnrichError::ApiError(_) | EnrichError::SearchProviderError { .. } => {
                ErrorSeverity::Medium
            }
            // 擷取失敗會內嵌在結果列中，不會中斷整個流程
            EnrichError::ExtractionAuthError | EnrichError::ExtractionProviderError { .. } => {
                ErrorSeverity::Low
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EnrichError::ApiError(_) => {
                "Check network connectivity and the provider base URL".to_string()
            }
            EnrichError::CsvError(_) => {
                "Check that the input file is valid delimited text with a header row".to_string()
            }
            EnrichError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            EnrichError::SerializationError(_) => {
                "The provider returned an unexpected payload; rerun with --verbose to inspect it"
                    .to_string()
            }
            EnrichError::SourceUnavailable { .. } => {
                "Check the sheet URL and the service-account credentials file".to_string()
            }
            EnrichError::TemplateError { .. } => {
                "Include the {entity} placeholder in the query template".to_string()
            }
            EnrichError::SearchProviderError { .. } => {
                "Check SERPAPI_API_KEY and the provider status page".to_string()
            }
            EnrichError::ExtractionAuthError => {
                "Check OPENAI_API_KEY in the environment".to_string()
            }
            EnrichError::ExtractionProviderError { .. } => {
                "Rerun with --verbose to inspect the provider response".to_string()
            }
            EnrichError::MissingConfigError { field } => {
                format!("Set {} before starting a run", field)
            }
            EnrichError::InvalidConfigValueError { field, .. }
            | EnrichError::ConfigValidationError { field, .. } => {
                format!("Fix the value of {} and retry", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EnrichError::ApiError(e) => format!("A network request failed: {}", e),
            EnrichError::SourceUnavailable { message } => {
                format!("Could not read the data source: {}", message)
            }
            EnrichError::SearchProviderError { message } => {
                format!("The search provider rejected the request: {}", message)
            }
            EnrichError::MissingConfigError { field } => format!("{} is not set", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Template not found: {path}")]
    TemplateNotFound { path: String },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("No products found in {source_name}")]
    NoProducts { source_name: String },

    #[error("API returned HTTP {status} for {url}: {body}")]
    ApiStatusError {
        status: u16,
        url: String,
        body: String,
    },

    #[error("API still returned HTTP {status} for {url} after {attempts} attempts")]
    RetriesExhausted {
        status: u16,
        url: String,
        attempts: u32,
    },

    #[error("Invalid API response: {message}")]
    InvalidResponse { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Output,
}

impl GeneratorError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TemplateNotFound { .. } => ErrorCategory::Configuration,
            Self::InputNotFound { .. } | Self::NoProducts { .. } | Self::SerializationError(_) => {
                ErrorCategory::Input
            }
            Self::HttpError(_)
            | Self::ApiStatusError { .. }
            | Self::RetriesExhausted { .. }
            | Self::InvalidResponse { .. } => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::TemplateNotFound { .. } => "Check --template or run from the site root",
            Self::InputNotFound { .. } => "Check --input or switch to --source api",
            Self::NoProducts { .. } => {
                "Verify the input holds a product array (top level, data, products or items)"
            }
            Self::MissingConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the flag, environment variable or config file entry named above"
            }
            Self::ConfigError { .. } => "Review the command line flags and config file",
            Self::RetriesExhausted { .. } => {
                "The API is unavailable; retry later or raise --retries / --retry-delay-ms"
            }
            Self::ApiStatusError { status: 401, .. } | Self::ApiStatusError { status: 403, .. } => {
                "Check LANDING_PAGE_TOKEN / --api-token"
            }
            Self::ApiStatusError { .. } | Self::InvalidResponse { .. } => {
                "Check --api-base-url and --api-path"
            }
            Self::HttpError(_) => "Check network connectivity and the API base URL",
            Self::SerializationError(_) => "Make sure the input is valid JSON",
            Self::IoError(_) => "Check that the output directory is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("ChannelError: {0}")]
    Channel(#[from] ChannelError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Server URL is not configured")]
    MissingUrl { hint: String },
}

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Authentication failed")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Timeout { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Unauthorized { endpoint, .. } => endpoint,
        }
    }

    /// Worth another attempt: timeouts, 5xx, and transport failures (status 0)
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Timeout { .. } => true,
            ApiError::Http { status, .. } => *status == 0 || *status >= 500,
            ApiError::Unauthorized { .. } => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

/// Failures of the persistent error slot.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Error channel I/O failed at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Error channel at {path} holds an unreadable record: {message}")]
    Corrupt { path: String, message: String },
    #[error("Failed to serialize error details: {0}")]
    Serialize(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::High => "error",
            ErrorSeverity::Medium => "warning",
            ErrorSeverity::Low => "info",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Channel(ChannelError::Corrupt { .. }) => ErrorSeverity::Low,
            AppError::Channel(_) => ErrorSeverity::Medium,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => {
                "The server rejected the API key".to_string()
            }
            AppError::Cli(CliError::MissingUrl { .. }) => "Server URL is not configured".to_string(),
            AppError::Channel(ChannelError::Corrupt { .. }) => {
                "Stored connection error could not be read".to_string()
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => {
                Some("Set AIRWEAVE_API_KEY or pass --api-key".to_string())
            }
            AppError::Api(ApiError::Timeout { .. }) => {
                Some("Check your connection to the Airweave server and try again".to_string())
            }
            AppError::Cli(CliError::MissingUrl { hint }) => Some(hint.clone()),
            AppError::Channel(ChannelError::Corrupt { .. }) => {
                Some("'airweave-dash error clear' discards the stored record".to_string())
            }
            _ => None,
        }
    }
}

//! Error types for weight-signup.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Signup API error: {0}")]
    Api(#[from] ApiError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from the external signup endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

/// Errors raised while routing events into a form session.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown document: {0}")]
    UnknownDocument(String),

    #[error("Signup session {0} not found")]
    SessionNotFound(uuid::Uuid),
}

/// Failures registering or rendering the page templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to register template {name}: {reason}")]
    Register { name: &'static str, reason: String },

    #[error("Failed to render template {name}: {reason}")]
    Render { name: &'static str, reason: String },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

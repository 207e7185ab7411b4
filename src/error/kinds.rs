use std::{fmt, io};

/// Crate-wide `Result` type using [`TokenBoxError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, TokenBoxError>;

/// Top-level error type for tokenbox operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum TokenBoxError {
    /// Configuration errors.
    Config(ConfigError),

    /// Candidate source errors.
    Source(SourceError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
///
/// All of these surface at load time, before an engine is constructed.
/// A bad delimiter kind or match mode is never a recoverable runtime
/// condition.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Candidate-source-specific errors.
#[derive(Debug)]
pub enum SourceError {
    /// Candidate file not found.
    FileNotFound(String),

    /// Candidate file could not be parsed.
    InvalidFormat(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for TokenBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenBoxError::Config(e) => write!(f, "Configuration error: {e}"),
            TokenBoxError::Source(e) => write!(f, "Candidate source error: {e}"),
            TokenBoxError::Io(e) => write!(f, "I/O error: {e}"),
            TokenBoxError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::FileNotFound(path) => write!(f, "Candidate file not found: {path}"),
            SourceError::InvalidFormat(msg) => write!(f, "Invalid candidate file: {msg}"),
        }
    }
}

impl std::error::Error for TokenBoxError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for SourceError {}

/* ========================= Conversions to TokenBoxError ========================= */

impl From<io::Error> for TokenBoxError {
    fn from(err: io::Error) -> Self {
        TokenBoxError::Io(err)
    }
}

impl From<ConfigError> for TokenBoxError {
    fn from(err: ConfigError) -> Self {
        TokenBoxError::Config(err)
    }
}

impl From<SourceError> for TokenBoxError {
    fn from(err: SourceError) -> Self {
        TokenBoxError::Source(err)
    }
}

impl From<String> for TokenBoxError {
    fn from(msg: String) -> Self {
        TokenBoxError::Generic(msg)
    }
}

impl From<&str> for TokenBoxError {
    fn from(msg: &str) -> Self {
        TokenBoxError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "delimiter.kind".to_string(),
            value: "colon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'colon' for field 'delimiter.kind'"
        );
    }

    #[test]
    fn test_wrapped_display() {
        let err: TokenBoxError =
            ConfigError::MissingField("delimiter.separator".to_string()).into();
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: TokenBoxError = io_err.into();
        assert!(matches!(err, TokenBoxError::Io(_)));
    }
}

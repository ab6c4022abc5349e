// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS, TLS...).
    Transport(String),
    /// The server answered with an error status.
    HttpStatus { status: u16, message: String },
    /// The caller passed nothing to work on, or the file lacks a required link.
    Validation(String),
    /// The response body did not match its declared content type.
    Parse(String),
    /// An internal computation produced an unusable value (e.g. a NaN scale).
    Configuration(String),
    /// An injected capability (such as the scanner bridge) is not present.
    CapabilityUnavailable(String),
    Io(String),
    Config(String),
}

impl Error {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Transport(_) => "error-transport",
            Error::HttpStatus { .. } => "error-http-status",
            Error::Validation(_) => "error-validation",
            Error::Parse(_) => "error-parse",
            Error::Configuration(_) => "error-configuration",
            Error::CapabilityUnavailable(_) => "error-capability-unavailable",
            Error::Io(_) => "error-io",
            Error::Config(_) => "error-config",
        }
    }

    /// Builds the error for a failed HTTP status, matching the
    /// `"{status}: {text}"` shape the file service clients expect.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Error::HttpStatus {
            status,
            message: message.into(),
        }
    }

    /// Prefixes the message with the source that failed, used when one step
    /// of a batch aborts the whole batch.
    #[must_use]
    pub fn with_source(self, source: &str) -> Self {
        match self {
            Error::Transport(msg) => Error::Transport(format!("{source}: {msg}")),
            Error::HttpStatus { status, message } => Error::HttpStatus {
                status,
                message: format!("{source}: {message}"),
            },
            Error::Validation(msg) => Error::Validation(format!("{source}: {msg}")),
            Error::Parse(msg) => Error::Parse(format!("{source}: {msg}")),
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "FETCH ERROR: {}", e),
            Error::HttpStatus { status, message } => write!(f, "{}: {}", status, message),
            Error::Validation(e) => write!(f, "{}", e),
            Error::Parse(e) => write!(f, "Parse Error: {}", e),
            Error::Configuration(e) => write!(f, "Configuration Error: {}", e),
            Error::CapabilityUnavailable(e) => write!(f, "Unavailable: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::http(status.as_u16(), err.to_string()),
            None => Error::Transport(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

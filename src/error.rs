use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Zabbix(#[from] ZbxError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("a request is already in flight; wait for it to finish")]
    Busy,
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Failures below the JSON-RPC layer: the request never produced an envelope.
#[derive(Debug, Error)]
pub enum ZbxError {
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: reqwest::StatusCode },
    #[error("invalid JSON payload: {message}")]
    Json { message: String },
}

/// Bad values typed by the user before anything is sent upstream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid date/time {value:?}: expected YYYY-MM-DDTHH:MM[:SS]")]
    DateTime { value: String },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("environment variable {var} is not set")]
    MissingEnv { var: String },
}

impl From<reqwest::Error> for ZbxError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_status() {
            if let Some(status) = source.status() {
                return Self::HttpStatus { status };
            }
        }
        Self::Request { source }
    }
}

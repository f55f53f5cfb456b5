use crate::models::gate::GateCheck;
use derive_more::Display;
use strum::IntoStaticStr;

#[derive(Debug, Display, IntoStaticStr)]
pub enum SError {
    #[display("io error: {_0}")]
    IOError(String),
    /// I/O cancelled because its thread or the application went away.
    #[display("io aborted: {_0}")]
    IOAborted(String),
    #[display("parse error: {_0}")]
    ParseError(String),
    #[display("config error: {_0}")]
    ConfigError(String),
    #[display("network error: {_0}")]
    NetworkError(String),
    #[display("async runtime error: {_0}")]
    AsyncRuntimeError(String),
    #[display("{check} check failed: {message}")]
    GateFailed { check: GateCheck, message: String },
    #[display("failed to launch {_0}")]
    LaunchError(String),
}

impl std::error::Error for SError {}

#[cfg(windows)]
const ERROR_OPERATION_ABORTED: i32 = 995;

fn is_io_abort(e: &std::io::Error) -> bool {
    #[cfg(windows)]
    if e.raw_os_error() == Some(ERROR_OPERATION_ABORTED) {
        return true;
    }
    e.kind() == std::io::ErrorKind::ConnectionAborted
}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        if is_io_abort(&e) {
            SError::IOAborted(e.to_string())
        } else {
            SError::IOError(e.to_string())
        }
    }
}

impl From<confy::ConfyError> for SError {
    fn from(e: confy::ConfyError) -> Self {
        SError::ConfigError(e.to_string())
    }
}

impl From<toml::de::Error> for SError {
    fn from(e: toml::de::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<semver::Error> for SError {
    fn from(e: semver::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<reqwest::Error> for SError {
    fn from(e: reqwest::Error) -> Self {
        SError::NetworkError(e.to_string())
    }
}

impl From<tokio::task::JoinError> for SError {
    fn from(e: tokio::task::JoinError) -> Self {
        SError::AsyncRuntimeError(e.to_string())
    }
}

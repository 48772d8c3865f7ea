use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    Configuration(&'static str),
    #[error("{service} returned HTTP {status}: {message}")]
    UpstreamHttp {
        service: &'static str,
        status: u16,
        message: String,
    },
    #[error("{service} returned an unexpected response: {detail}")]
    ResponseShape {
        service: &'static str,
        detail: String,
    },
    #[error("{service} is unreachable: {detail}")]
    Network {
        service: &'static str,
        detail: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    UpstreamHttp,
    ResponseShape,
    Network,
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::UpstreamHttp => "upstream_http",
            ErrorKind::ResponseShape => "response_shape",
            ErrorKind::Network => "network",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Configuration(_) => ErrorKind::Configuration,
            ServiceError::UpstreamHttp { .. } => ErrorKind::UpstreamHttp,
            ServiceError::ResponseShape { .. } => ErrorKind::ResponseShape,
            ServiceError::Network { .. } => ErrorKind::Network,
            ServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

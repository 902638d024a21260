use thiserror::Error;

use super::Endpoint;

/// Outcome of a failed remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP client initialization failed: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered HTTP {status}{}", detail_suffix(.details))]
    Status {
        endpoint: Endpoint,
        status: u16,
        details: Option<String>,
    },
    #[error("{endpoint} returned an unexpected body: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub(crate) fn client_build(source: reqwest::Error) -> Self {
        Self::ClientBuild { source }
    }

    /// The request URL is stripped from `source`; the endpoint is enough to
    /// locate the failure.
    pub(crate) fn transport(endpoint: Endpoint, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint,
            source: source.without_url(),
        }
    }

    pub(crate) fn status(endpoint: Endpoint, status: u16, details: Option<String>) -> Self {
        Self::Status {
            endpoint,
            status,
            details,
        }
    }

    pub(crate) fn decode(endpoint: Endpoint, source: serde_json::Error) -> Self {
        Self::Decode { endpoint, source }
    }

    /// True when the request hit the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    /// HTTP status code, when the service answered with an error status.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn detail_suffix(details: &Option<String>) -> String {
    details
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

use thiserror::Error;

use crate::types::MovieList;

/// Failure of a catalog fetch. Delivered as a value on the feed outputs; the
/// feed keeps running after one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Network unreachable, connection reset, TLS failure, ...
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    /// The catalog answered with a non-2xx status.
    #[error("catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Payload did not match the expected shape.
    #[error("failed to decode catalog response: {0}")]
    Decode(String),

    #[error("invalid catalog request: {0}")]
    InvalidRequest(String),

    /// One or more of the joined movie lists failed.
    #[error("movie lists failed: {}", describe_failures(.0))]
    Aggregate(Vec<(MovieList, FetchError)>),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status { status: status.as_u16(), body: String::new() }
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self { FetchError::Decode(e.to_string()) }
}

fn describe_failures(failures: &[(MovieList, FetchError)]) -> String {
    failures
        .iter()
        .map(|(list, e)| format!("{}: {}", list, e))
        .collect::<Vec<_>>()
        .join("; ")
}
